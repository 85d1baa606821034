// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{env as vars, DEFAULT_REQUEST_TIMEOUT_SECS};
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Fetcher configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace for namespaced lookups; the client default applies when unset
    pub default_namespace: Option<String>,
    pub request_timeout: Duration,
    pub kube_context: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_namespace: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            kube_context: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout = match non_empty(vars::REQUEST_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().with_context(|| {
                    format!("{} must be a whole number of seconds, got {:?}", vars::REQUEST_TIMEOUT_SECS, raw)
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(Config {
            default_namespace: non_empty(vars::NAMESPACE),
            request_timeout,
            kube_context: non_empty(vars::KUBE_CONTEXT),
        })
    }
}
