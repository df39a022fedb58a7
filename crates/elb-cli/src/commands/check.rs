use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use elb_audit::AuditReport;
use elb_core::{AuditConfig, Inventory, SnapshotInventory};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Inventory snapshot (JSON) to audit
    #[arg(short, long)]
    pub inventory: String,
    /// Configuration file (elb-sanity.toml)
    #[arg(short, long)]
    pub config: Option<String>,
    /// Region to check, repeatable [default: <all>]
    #[arg(short, long = "region", value_name = "REGION")]
    pub regions: Vec<String>,
    /// Load balancer name to check, repeatable [default: <all>]
    #[arg(short, long = "name", value_name = "NAME")]
    pub names: Vec<String>,
    /// Security group the load balancers reach instances from
    #[arg(long)]
    pub lb_group_id: Option<String>,
    /// Output format: text or json
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
    /// Exit with status 1 when any ERROR finding is reported
    #[arg(long)]
    pub fail_on_error: bool,
}

pub fn check(args: &CheckArgs) -> Result<ExitCode> {
    let report = run(args)?;
    println!("{}", render(&report, &args.format)?);

    if fails_run(args, &report) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn fails_run(args: &CheckArgs, report: &AuditReport) -> bool {
    args.fail_on_error && report.has_errors()
}

pub fn run(args: &CheckArgs) -> Result<AuditReport> {
    let config = load_config(args)?;
    let inventory = SnapshotInventory::from_file(Path::new(&args.inventory))
        .with_context(|| format!("loading inventory {}", args.inventory))?;
    tracing::info!(regions = ?inventory.list_regions()?, "Regions in inventory");

    elb_audit::audit_inventory(&inventory, &config).context("collecting load balancer topology")
}

/// Config file (or defaults) with command-line overrides applied.
pub fn load_config(args: &CheckArgs) -> Result<AuditConfig> {
    let mut config = match &args.config {
        Some(path) => AuditConfig::from_file(Path::new(path))
            .with_context(|| format!("loading config {path}"))?,
        None => AuditConfig::default(),
    };

    if !args.regions.is_empty() {
        config.regions = args.regions.clone();
    }
    if !args.names.is_empty() {
        config.names = args.names.clone();
    }
    if let Some(group) = &args.lb_group_id {
        config.load_balancer_group_id = Some(group.clone());
    }

    Ok(config)
}

pub fn render(report: &AuditReport, format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(report)?),
        _ => Ok(elb_audit::report::format_report(report)),
    }
}
