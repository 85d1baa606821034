// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Schema pieces shared by templates and runs, plus argument helpers.

use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Provider name mapped to its opaque configuration, e.g. `prometheus: {query: ...}`
pub type MetricProvider = BTreeMap<String, Value>;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_delay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<IntOrString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_limit: Option<IntOrString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inconclusive_limit: Option<IntOrString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consecutive_error_limit: Option<IntOrString>,
    #[serde(default)]
    pub provider: MetricProvider,
}

impl Metric {
    /// Name of the configured provider (`prometheus`, `datadog`, ...)
    pub fn provider_name(&self) -> Option<&str> {
        self.provider.keys().next().map(String::as_str)
    }

    /// Provider queries with `{{ args.NAME }}` placeholders resolved.
    ///
    /// `None` for providers without a displayable query (kayenta, web, job, plugin).
    pub fn queries(&self, args: &[Argument]) -> Option<Vec<String>> {
        let name = self.provider_name()?;
        let config = self.provider.get(name)?;

        match name {
            "prometheus" | "wavefront" | "newRelic" | "graphite" | "influxdb" | "skywalking" => {
                Some(interpolated(config.get("query").and_then(Value::as_str), args))
            }
            "datadog" => Some(datadog_queries(config, args)),
            "cloudWatch" => config
                .get("metricDataQueries")
                .and_then(Value::as_array)
                .map(|queries| queries.iter().map(Value::to_string).collect()),
            _ => None,
        }
    }
}

fn interpolated(query: Option<&str>, args: &[Argument]) -> Vec<String> {
    match query {
        Some(q) if !q.is_empty() => vec![interpolate_query(q, args)],
        _ => Vec::new(),
    }
}

fn datadog_queries(config: &Value, args: &[Argument]) -> Vec<String> {
    let api_version = config
        .get("apiVersion")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase();
    let query = config
        .get("query")
        .and_then(Value::as_str)
        .filter(|q| !q.is_empty());
    let formula = config.get("formula").and_then(Value::as_str);

    match api_version.as_str() {
        "v1" => interpolated(query, args),
        "v2" => {
            if let Some(q) = query {
                return match formula {
                    Some(f) => vec![format!("query: {}, formula: {}", interpolate_query(q, args), f)],
                    None => interpolated(Some(q), args),
                };
            }
            let Some(queries) = config.get("queries").and_then(Value::as_object) else {
                return Vec::new();
            };
            let resolved: serde_json::Map<String, Value> = queries
                .iter()
                .filter_map(|(key, q)| q.as_str().filter(|q| !q.is_empty()).map(|q| (key, q)))
                .map(|(key, q)| (key.clone(), Value::String(interpolate_query(q, args))))
                .collect();
            match formula {
                Some(f) => vec![format!("queries: {}, formula: {}", Value::Object(resolved), f)],
                None => resolved
                    .into_iter()
                    .filter_map(|(_, q)| q.as_str().map(str::to_string))
                    .collect(),
            }
        }
        _ => Vec::new(),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_from: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DryRun {
    pub metric_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRetention {
    pub metric_name: String,
    pub limit: i32,
}

/// Look up the value of a named argument
pub fn arg_value<'a>(args: &'a [Argument], name: &str) -> Option<&'a str> {
    args.iter()
        .find(|arg| arg.name == name)
        .and_then(|arg| arg.value.as_deref())
}

static ARG_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{.*?\}\}").expect("placeholder pattern is valid"));

/// Replace every `{{ args.NAME }}` placeholder with the argument's value.
///
/// Placeholders naming a missing or valueless argument are left untouched.
pub fn interpolate_query(query: &str, args: &[Argument]) -> String {
    if args.is_empty() {
        return query.to_string();
    }

    ARG_PLACEHOLDER
        .replace_all(query, |caps: &regex::Captures| {
            let placeholder = &caps[0];
            let stripped: String = placeholder
                .chars()
                .filter(|c| !matches!(c, '{' | '}' | ' '))
                .collect();
            stripped
                .split('.')
                .nth(1)
                .and_then(|name| arg_value(args, name))
                .unwrap_or(placeholder)
                .to_string()
        })
        .into_owned()
}
