// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod kubernetes;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use fetch::context::{FetchContext, Interrupted};
pub use fetch::{
    get_analysis_run, get_analysis_template, get_cluster_analysis_template, NamespacedName,
};
