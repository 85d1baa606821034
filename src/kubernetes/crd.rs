// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Analysis CRD availability check

use crate::constants::{ANALYSIS_KINDS, API_GROUP, API_VERSION};
use crate::error::{GetError, Result, RolloutsError};
use crate::fetch::context::FetchContext;
use kube::{discovery::Discovery, Client};
use std::collections::HashSet;
use tracing::{info, instrument};

/// Check once whether all analysis kinds are served under argoproj.io/v1alpha1.
#[instrument(skip(ctx, client))]
pub async fn analysis_crds_available(ctx: &FetchContext, client: &Client) -> Result<bool> {
    let discovery = ctx
        .run(Discovery::new(client.clone()).filter(&[API_GROUP]).run())
        .await
        .map_err(|e| RolloutsError::GetClusterScoped {
            kind: "APIGroup".to_string(),
            name: API_GROUP.to_string(),
            source: GetError::Interrupted(e),
        })??;

    let mut served = HashSet::new();
    for group in discovery.groups() {
        if group.name() != API_GROUP {
            continue;
        }
        for (ar, _) in group.versioned_resources(API_VERSION) {
            served.insert(ar.kind);
        }
    }

    let missing: Vec<&str> = ANALYSIS_KINDS
        .iter()
        .copied()
        .filter(|kind| !served.contains(*kind))
        .collect();

    if missing.is_empty() {
        info!("Analysis CRDs ({}/{}) are available", API_GROUP, API_VERSION);
        Ok(true)
    } else {
        info!(
            "Analysis CRDs ({}/{}) not available, missing: {}",
            API_GROUP,
            API_VERSION,
            missing.join(", ")
        );
        Ok(false)
    }
}
