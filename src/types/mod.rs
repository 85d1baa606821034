// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Argo Rollouts analysis resources (argoproj.io/v1alpha1).

pub mod analysis;
pub mod analysis_run;
pub mod analysis_template;

pub use analysis::{arg_value, interpolate_query, Argument, Metric, MetricProvider};
pub use analysis_run::{
    status_label, substatus, AnalysisPhase, AnalysisRun, AnalysisRunSpec, AnalysisRunStatus,
    Measurement, MetricResult, RunSummary, Substatus, Tally,
};
pub use analysis_template::{
    AnalysisTemplate, AnalysisTemplateSpec, ClusterAnalysisTemplate, ClusterAnalysisTemplateSpec,
};
