// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Point reads of analysis resources.
//!
//! Every fetch issues a single GET. A not-found answer becomes `Ok(None)`;
//! any other failure is returned with the kind and identifier attached.

pub mod context;

use crate::error::{GetError, Result, RolloutsError};
use crate::types::{AnalysisRun, AnalysisTemplate, ClusterAnalysisTemplate};
use context::FetchContext;
use k8s_openapi::{ClusterResourceScope, NamespaceResourceScope};
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::{debug, instrument};

/// Identifier of a namespaced object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacedName {
    pub namespace: String,
    pub name: String,
}

impl NamespacedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Get the AnalysisTemplate identified by `key`, or `None` if it does not exist
pub async fn get_analysis_template(
    ctx: &FetchContext,
    client: &Client,
    key: &NamespacedName,
) -> Result<Option<AnalysisTemplate>> {
    get_namespaced(ctx, client, key).await
}

/// Get the ClusterAnalysisTemplate called `name`, or `None` if it does not exist
pub async fn get_cluster_analysis_template(
    ctx: &FetchContext,
    client: &Client,
    name: &str,
) -> Result<Option<ClusterAnalysisTemplate>> {
    get_cluster_scoped(ctx, client, name).await
}

/// Get the AnalysisRun identified by `key`, or `None` if it does not exist
pub async fn get_analysis_run(
    ctx: &FetchContext,
    client: &Client,
    key: &NamespacedName,
) -> Result<Option<AnalysisRun>> {
    get_namespaced(ctx, client, key).await
}

/// Get any namespaced object by namespace and name
#[instrument(skip(ctx, client), fields(kind = %K::kind(&()), key = %key))]
pub async fn get_namespaced<K>(
    ctx: &FetchContext,
    client: &Client,
    key: &NamespacedName,
) -> Result<Option<K>>
where
    K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + Clone
        + DeserializeOwned
        + fmt::Debug,
{
    let lookup = async {
        if key.namespace.is_empty() {
            return Err(GetError::InvalidIdentifier("namespace must not be empty".to_string()));
        }
        let api: Api<K> = Api::namespaced(client.clone(), &key.namespace);
        get_opt(ctx, &api, &key.name).await
    };

    lookup.await.map_err(|source| RolloutsError::GetNamespaced {
        kind: K::kind(&()).to_string(),
        name: key.name.clone(),
        namespace: key.namespace.clone(),
        source,
    })
}

/// Get any cluster-scoped object by name
#[instrument(skip(ctx, client), fields(kind = %K::kind(&())))]
pub async fn get_cluster_scoped<K>(
    ctx: &FetchContext,
    client: &Client,
    name: &str,
) -> Result<Option<K>>
where
    K: Resource<Scope = ClusterResourceScope, DynamicType = ()>
        + Clone
        + DeserializeOwned
        + fmt::Debug,
{
    let api: Api<K> = Api::all(client.clone());

    get_opt(ctx, &api, name)
        .await
        .map_err(|source| RolloutsError::GetClusterScoped {
            kind: K::kind(&()).to_string(),
            name: name.to_string(),
            source,
        })
}

async fn get_opt<K>(
    ctx: &FetchContext,
    api: &Api<K>,
    name: &str,
) -> std::result::Result<Option<K>, GetError>
where
    K: Resource + Clone + DeserializeOwned + fmt::Debug,
{
    if name.is_empty() {
        return Err(GetError::InvalidIdentifier("name must not be empty".to_string()));
    }

    match ctx.run(api.get(name)).await? {
        Ok(obj) => {
            debug!("Found {}", name);
            Ok(Some(obj))
        }
        Err(e) if is_not_found(&e) => {
            debug!("{} does not exist", name);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Whether the API server reported the object as missing
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 404 || resp.reason == "NotFound")
}
