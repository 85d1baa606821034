// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

#[derive(Clone)]
enum MockResponse {
    Reply(u16, String),
    /// Never answers, for exercising cancellation and deadlines
    Hang,
}

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone, Default)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), MockResponse>>>,
    requests: Arc<Mutex<HashMap<String, usize>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.insert("GET", path, MockResponse::Reply(status, body.to_string()))
    }

    /// Accept GET requests on the path but never respond
    pub fn hang_on_get(self, path: &str) -> Self {
        self.insert("GET", path, MockResponse::Hang)
    }

    /// Number of requests received for the path, any method
    pub fn request_count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Build a kube Client from this mock service
    pub fn client(&self) -> Client {
        Client::new(self.clone(), "default")
    }

    fn insert(self, method: &str, path: &str, response: MockResponse) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), response);
        self
    }

    fn find_response(&self, method: &str, path: &str) -> Option<MockResponse> {
        *self
            .requests
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default() += 1;

        // Exact matches only: discovery registers "/apis", which must not shadow resource paths
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let response = self.find_response(&method, &path);

        Box::pin(async move {
            let (status, body) = match response {
                Some(MockResponse::Reply(status, body)) => (status, body),
                Some(MockResponse::Hang) => std::future::pending().await,
                None => (404, not_found_json("", &path)),
            };
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Path of a namespaced analysis resource
pub fn namespaced_path(plural: &str, namespace: &str, name: &str) -> String {
    format!("/apis/argoproj.io/v1alpha1/namespaces/{}/{}/{}", namespace, plural, name)
}

/// Path of a cluster-scoped analysis resource
pub fn cluster_path(plural: &str, name: &str) -> String {
    format!("/apis/argoproj.io/v1alpha1/{}/{}", plural, name)
}

pub fn analysis_template_json(namespace: &str, name: &str) -> String {
    serde_json::json!({
        "apiVersion": "argoproj.io/v1alpha1",
        "kind": "AnalysisTemplate",
        "metadata": {"name": name, "namespace": namespace, "uid": "test-uid"},
        "spec": {
            "args": [{"name": "service-name"}],
            "metrics": [{
                "name": "success-rate",
                "interval": "1m",
                "successCondition": "result[0] >= 0.95",
                "provider": {"prometheus": {"address": "http://prometheus:9090", "query": "up"}}
            }]
        }
    })
    .to_string()
}

pub fn cluster_analysis_template_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "argoproj.io/v1alpha1",
        "kind": "ClusterAnalysisTemplate",
        "metadata": {"name": name, "uid": "test-uid"},
        "spec": {
            "metrics": [{
                "name": "error-rate",
                "failureCondition": "result > 0.01",
                "provider": {"datadog": {"query": "errors"}}
            }]
        }
    })
    .to_string()
}

pub fn analysis_run_json(namespace: &str, name: &str) -> String {
    serde_json::json!({
        "apiVersion": "argoproj.io/v1alpha1",
        "kind": "AnalysisRun",
        "metadata": {"name": name, "namespace": namespace, "uid": "test-uid"},
        "spec": {
            "args": [{"name": "service-name", "value": "checkout"}],
            "metrics": [{"name": "success-rate", "provider": {"prometheus": {"query": "up"}}}]
        },
        "status": {
            "phase": "Successful",
            "runSummary": {"count": 1, "successful": 1},
            "metricResults": [{"name": "success-rate", "phase": "Successful", "count": 1, "successful": 1}]
        }
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

/// Create a 403 forbidden response
pub fn forbidden_json(resource: &str, name: &str, namespace: &str) -> String {
    status_json(
        403,
        "Forbidden",
        &format!(
            "{} \"{}\" is forbidden: User \"system:serviceaccount:{}:default\" cannot get resource",
            resource, name, namespace
        ),
    )
}

pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Discovery document listing only the argoproj.io group
pub fn api_groups_json() -> String {
    serde_json::json!({
        "kind": "APIGroupList",
        "apiVersion": "v1",
        "groups": [{
            "name": "argoproj.io",
            "versions": [{"groupVersion": "argoproj.io/v1alpha1", "version": "v1alpha1"}],
            "preferredVersion": {"groupVersion": "argoproj.io/v1alpha1", "version": "v1alpha1"}
        }]
    })
    .to_string()
}

/// Resource list for argoproj.io/v1alpha1 serving the given kinds
pub fn api_resources_json(kinds: &[(&str, &str, bool)]) -> String {
    let resources: Vec<_> = kinds
        .iter()
        .map(|(kind, plural, namespaced)| {
            serde_json::json!({
                "name": plural,
                "singularName": kind.to_lowercase(),
                "namespaced": namespaced,
                "kind": kind,
                "verbs": ["get", "list", "watch"]
            })
        })
        .collect();

    serde_json::json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": "argoproj.io/v1alpha1",
        "resources": resources
    })
    .to_string()
}
