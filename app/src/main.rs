mod config;
mod infrastructure;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use domain::{model::vo::Submission, service::ExecutionPlanService};

use self::config::{build_config, PlannerConfig};
use self::infrastructure::{
    ioc::Container, service::LocalStagingFolder, telemetry::init_telemetry,
};

/// Prepares a VASP calculation for submission to a batch computer.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Planner configuration (YAML).
    #[arg(short, long, default_value = "cusp.yaml")]
    config: PathBuf,

    /// Submission request (YAML or JSON).
    #[arg(short, long)]
    request: PathBuf,

    /// Local staging folder mirrored into the new working directory.
    #[arg(short, long)]
    staging: PathBuf,

    /// Where to write the execution plan. Defaults to the calculation info
    /// file inside the staging folder.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = build_config(&args.config).with_context(|| "Failed to build config".red())?;
    let planner_config: PlannerConfig = config.try_deserialize()?;

    init_telemetry(&planner_config.log).with_context(|| "Failed to initialize logger".red())?;

    let container =
        Container::new(&planner_config).with_context(|| "Cannot build IOC container".red())?;

    let request = tokio::fs::read_to_string(&args.request)
        .await
        .with_context(|| format!("Cannot read {}", args.request.display()).red())?;
    // YAML parsing accepts JSON requests as well.
    let submission: Submission =
        serde_yaml::from_str(&request).with_context(|| "Malformed submission request".red())?;

    let staging = LocalStagingFolder::create(&args.staging).await?;
    let plan = container
        .prepare(&submission, &staging)
        .await
        .with_context(|| format!("Cannot prepare calculation {}", submission.uuid).red())?;

    let output = args
        .output
        .unwrap_or_else(|| args.staging.join(&planner_config.defaults.calc_info_name));
    tokio::fs::write(&output, serde_json::to_vec_pretty(&plan)?)
        .await
        .with_context(|| format!("Cannot write {}", output.display()).red())?;
    tracing::info!(calc = %plan.uuid, output = %output.display(), "Plan written");

    Ok(())
}
