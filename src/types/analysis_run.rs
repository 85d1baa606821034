// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::analysis::{arg_value, Argument, DryRun, MeasurementRetention, Metric};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "argoproj.io", version = "v1alpha1", kind = "AnalysisRun")]
#[kube(namespaced)]
#[kube(status = "AnalysisRunStatus")]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRunSpec {
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Argument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<Vec<DryRun>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_retention: Option<Vec<MeasurementRetention>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRunStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<AnalysisPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metric_results: Vec<MetricResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_summary: Option<RunSummary>,
}

/// Aggregated metric counters of a run
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RunSummary {
    pub count: i32,
    pub successful: i32,
    pub failed: i32,
    pub inconclusive: i32,
    pub error: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricResult {
    pub name: String,
    #[serde(default)]
    pub phase: AnalysisPhase,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measurements: Vec<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub count: i32,
    #[serde(default)]
    pub successful: i32,
    #[serde(default)]
    pub failed: i32,
    #[serde(default)]
    pub inconclusive: i32,
    #[serde(default)]
    pub error: i32,
    #[serde(default)]
    pub consecutive_error: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    #[serde(default)]
    pub phase: AnalysisPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_at: Option<Time>,
}

/// Phase of a run, metric, or single measurement
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, schemars::JsonSchema)]
pub enum AnalysisPhase {
    Pending,
    Running,
    Successful,
    Failed,
    Error,
    Inconclusive,
    #[default]
    #[serde(other)]
    Unknown,
}

impl AnalysisPhase {
    /// Errored analyses are reported as failed
    pub fn adjusted(self) -> Self {
        match self {
            AnalysisPhase::Error => AnalysisPhase::Failed,
            other => other,
        }
    }
}

impl fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnalysisPhase::Pending => "Pending",
            AnalysisPhase::Running => "Running",
            AnalysisPhase::Successful => "Successful",
            AnalysisPhase::Failed => "Failed",
            AnalysisPhase::Error => "Error",
            AnalysisPhase::Inconclusive => "Inconclusive",
            AnalysisPhase::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Secondary signal for analyses that are running or passed despite bad measurements
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Substatus {
    Error,
    Warning,
}

/// Measurement counters feeding the status label and substatus
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub failed: i32,
    pub error: i32,
    pub inconclusive: i32,
}

/// Human readable label for an analysis phase and its measurement counters
pub fn status_label(phase: AnalysisPhase, tally: Tally) -> String {
    match phase {
        AnalysisPhase::Unknown => "Analysis status unknown".to_string(),
        AnalysisPhase::Pending => "Analysis pending".to_string(),
        AnalysisPhase::Running => "Analysis in progress".to_string(),
        AnalysisPhase::Failed => "Analysis failed".to_string(),
        AnalysisPhase::Inconclusive => "Analysis inconclusive".to_string(),
        AnalysisPhase::Error => "Analysis errored".to_string(),
        AnalysisPhase::Successful => {
            let issues = [tally.failed > 0, tally.error > 0, tally.inconclusive > 0];
            let details = match issues {
                [false, false, false] => return "Analysis passed".to_string(),
                [true, false, false] => "with measurement failures",
                [false, true, false] => "with measurement errors",
                [false, false, true] => "with inconclusive measurements",
                _ => "with multiple issues",
            };
            format!("Analysis passed {}", details)
        }
    }
}

/// Error when measurements failed, warning on errors or inconclusive results.
/// Only running and successful analyses carry a substatus.
pub fn substatus(phase: AnalysisPhase, tally: Tally) -> Option<Substatus> {
    match phase {
        AnalysisPhase::Running | AnalysisPhase::Successful => {
            if tally.failed > 0 {
                Some(Substatus::Error)
            } else if tally.error > 0 || tally.inconclusive > 0 {
                Some(Substatus::Warning)
            } else {
                None
            }
        }
        _ => None,
    }
}

impl MetricResult {
    pub fn tally(&self) -> Tally {
        Tally {
            failed: self.failed,
            error: self.error,
            inconclusive: self.inconclusive,
        }
    }

    pub fn adjusted_phase(&self) -> AnalysisPhase {
        self.phase.adjusted()
    }

    pub fn status_label(&self) -> String {
        status_label(self.phase, self.tally())
    }

    pub fn substatus(&self) -> Option<Substatus> {
        substatus(self.phase, self.tally())
    }
}

impl AnalysisRun {
    pub fn phase(&self) -> AnalysisPhase {
        self.status
            .as_ref()
            .and_then(|s| s.phase)
            .unwrap_or_default()
    }

    /// Counters from the run summary, zero when the run has not reported one
    pub fn tally(&self) -> Tally {
        self.status
            .as_ref()
            .and_then(|s| s.run_summary.as_ref())
            .map(|summary| Tally {
                failed: summary.failed,
                error: summary.error,
                inconclusive: summary.inconclusive,
            })
            .unwrap_or_default()
    }

    pub fn status_label(&self) -> String {
        status_label(self.phase(), self.tally())
    }

    /// None for runs without a status at all
    pub fn substatus(&self) -> Option<Substatus> {
        self.status.as_ref()?;
        substatus(self.phase(), self.tally())
    }

    pub fn metric_results(&self) -> &[MetricResult] {
        self.status
            .as_ref()
            .map(|s| s.metric_results.as_slice())
            .unwrap_or_default()
    }

    /// Latest measurement finish time across all metrics, ignoring unset (epoch) times
    pub fn end_time(&self) -> Option<Time> {
        self.metric_results()
            .iter()
            .flat_map(|result| result.measurements.iter())
            .filter_map(|measurement| measurement.finished_at.clone())
            .filter(|time| time.0.timestamp() > 0)
            .max_by_key(|time| time.0)
    }

    pub fn arg_value(&self, name: &str) -> Option<&str> {
        arg_value(&self.spec.args, name)
    }
}
