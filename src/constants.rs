// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// API group serving the analysis resources
pub const API_GROUP: &str = "argoproj.io";

/// API version of the analysis resources
pub const API_VERSION: &str = "v1alpha1";

/// Kinds that must be served for the fetchers to be usable
pub const ANALYSIS_KINDS: [&str; 3] = ["AnalysisTemplate", "ClusterAnalysisTemplate", "AnalysisRun"];

/// Environment variables read by the configuration
pub mod env {
    /// Default namespace for namespaced lookups (optional)
    pub const NAMESPACE: &str = "ROLLOUTS_NAMESPACE";
    /// Per-fetch deadline in seconds
    pub const REQUEST_TIMEOUT_SECS: &str = "ROLLOUTS_REQUEST_TIMEOUT_SECS";
    /// Kubeconfig context to use instead of the inferred one (optional)
    pub const KUBE_CONTEXT: &str = "KUBE_CONTEXT";
}

/// Default per-fetch deadline in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
