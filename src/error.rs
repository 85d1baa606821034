// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::fetch::context::Interrupted;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RolloutsError {
    #[error("error getting {kind} {name:?} in namespace {namespace:?}: {source}")]
    GetNamespaced {
        kind: String,
        name: String,
        namespace: String,
        #[source]
        source: GetError,
    },

    #[error("error getting {kind} {name:?}: {source}")]
    GetClusterScoped {
        kind: String,
        name: String,
        #[source]
        source: GetError,
    },

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Failed to load kubeconfig: {0}")]
    Kubeconfig(String),
}

/// Cause of a failed single-object lookup.
#[derive(Error, Debug)]
pub enum GetError {
    #[error(transparent)]
    Kube(#[from] kube::Error),

    #[error(transparent)]
    Interrupted(#[from] Interrupted),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

impl RolloutsError {
    /// The API error behind a failed lookup, if the server answered at all.
    pub fn kube_error(&self) -> Option<&kube::Error> {
        match self {
            RolloutsError::GetNamespaced { source, .. }
            | RolloutsError::GetClusterScoped { source, .. } => match source {
                GetError::Kube(e) => Some(e),
                _ => None,
            },
            RolloutsError::Kube(e) => Some(e),
            RolloutsError::Kubeconfig(_) => None,
        }
    }

    /// Whether the lookup was abandoned because its context was cancelled or expired.
    pub fn interrupted(&self) -> Option<Interrupted> {
        match self {
            RolloutsError::GetNamespaced { source, .. }
            | RolloutsError::GetClusterScoped { source, .. } => match source {
                GetError::Interrupted(i) => Some(*i),
                _ => None,
            },
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RolloutsError>;
