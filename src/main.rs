// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rollouts_analysis::config::Config;
use rollouts_analysis::kubernetes::{analysis_crds_available, create_client};
use rollouts_analysis::types::AnalysisRun;
use rollouts_analysis::{
    get_analysis_run, get_analysis_template, get_cluster_analysis_template, FetchContext,
    NamespacedName,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch Argo Rollouts analysis resources", long_about = None)]
struct Args {
    /// Namespace for namespaced resources
    #[arg(short, long)]
    namespace: Option<String>,

    /// Kubeconfig context to use
    #[arg(long)]
    context: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[arg(short, long, value_enum, default_value_t = Output::Yaml)]
    output: Output,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Get an AnalysisTemplate
    Template { name: String },
    /// Get a ClusterAnalysisTemplate
    ClusterTemplate { name: String },
    /// Get an AnalysisRun
    Run {
        name: String,
        /// Print a status summary instead of the full resource
        #[arg(long)]
        summary: bool,
    },
    /// Check that the analysis CRDs are served by the cluster
    Check,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Output {
    Yaml,
    Json,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(namespace) = args.namespace {
        config.default_namespace = Some(namespace);
    }
    if let Some(context) = args.context {
        config.kube_context = Some(context);
    }
    if let Some(secs) = args.timeout {
        config.request_timeout = Duration::from_secs(secs);
    }

    let client = create_client(&config).await?;
    let namespace = client.default_namespace().to_string();
    info!("Connected to Kubernetes cluster, namespace {}", namespace);

    // Ctrl-C abandons the in-flight request
    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling request");
                token.cancel();
            }
        });
    }
    let ctx = FetchContext::new()
        .with_cancellation(token)
        .with_timeout(config.request_timeout);

    let found = match args.command {
        Command::Template { name } => {
            let key = NamespacedName::new(namespace, name);
            let template = get_analysis_template(&ctx, &client, &key).await?;
            print_or_report(template.as_ref(), args.output, || {
                format!("AnalysisTemplate {:?} not found in namespace {:?}", key.name, key.namespace)
            })?
        }
        Command::ClusterTemplate { name } => {
            let template = get_cluster_analysis_template(&ctx, &client, &name).await?;
            print_or_report(template.as_ref(), args.output, || {
                format!("ClusterAnalysisTemplate {:?} not found", name)
            })?
        }
        Command::Run { name, summary } => {
            let key = NamespacedName::new(namespace, name);
            let run = get_analysis_run(&ctx, &client, &key).await?;
            match (run, summary) {
                (Some(run), true) => {
                    print_summary(&run);
                    true
                }
                (run, _) => print_or_report(run.as_ref(), args.output, || {
                    format!("AnalysisRun {:?} not found in namespace {:?}", key.name, key.namespace)
                })?,
            }
        }
        Command::Check => {
            let available = analysis_crds_available(&ctx, &client).await?;
            if available {
                println!("Analysis CRDs are available");
            } else {
                eprintln!("Analysis CRDs are not available");
            }
            available
        }
    };

    Ok(if found { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn print_or_report<T: Serialize>(
    resource: Option<&T>,
    output: Output,
    not_found: impl FnOnce() -> String,
) -> Result<bool> {
    let Some(resource) = resource else {
        eprintln!("{}", not_found());
        return Ok(false);
    };

    let rendered = match output {
        Output::Yaml => serde_yaml::to_string(resource)?,
        Output::Json => serde_json::to_string_pretty(resource)?,
    };
    println!("{}", rendered.trim_end());
    Ok(true)
}

fn print_summary(run: &AnalysisRun) {
    match run.substatus() {
        Some(sub) => println!("{} ({:?})", run.status_label(), sub),
        None => println!("{}", run.status_label()),
    }
    for result in run.metric_results() {
        println!(
            "  {}: {} - {}",
            result.name,
            result.adjusted_phase(),
            result.status_label()
        );
    }
    for metric in &run.spec.metrics {
        let Some(queries) = metric.queries(&run.spec.args) else {
            continue;
        };
        for query in queries {
            println!("  {} query: {}", metric.name, query);
        }
    }
    if let Some(end) = run.end_time() {
        println!("Finished at {}", end.0.to_rfc3339());
    }
}
