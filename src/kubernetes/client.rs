// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation

use crate::config::Config;
use crate::error::{Result, RolloutsError};
use kube::{config::KubeConfigOptions, Client, Config as KConfig};
use tracing::{debug, instrument};

/// Create a Kubernetes client, honouring an explicit kubeconfig context when configured
#[instrument(skip(config), fields(context = ?config.kube_context))]
pub async fn create_client(config: &Config) -> Result<Client> {
    let mut client_config = match &config.kube_context {
        Some(context) => {
            let options = KubeConfigOptions {
                context: Some(context.clone()),
                ..Default::default()
            };
            KConfig::from_kubeconfig(&options).await.map_err(|e| {
                RolloutsError::Kubeconfig(format!(
                    "Failed to load kubeconfig context {}: {}",
                    context, e
                ))
            })?
        }
        None => KConfig::infer()
            .await
            .map_err(|e| RolloutsError::Kubeconfig(format!("Failed to infer config: {}", e)))?,
    };

    if let Some(namespace) = &config.default_namespace {
        debug!("Overriding default namespace with {}", namespace);
        client_config.default_namespace = namespace.clone();
    }

    Client::try_from(client_config)
        .map_err(|e| RolloutsError::Kubeconfig(format!("Failed to create client: {}", e)))
}
