use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "elb-sanity",
    about = "Sanity checks for classic load balancers",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Log progress through each check
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Log the reasoning behind every decision (implies --verbose)
    #[arg(short, long, global = true)]
    debug: bool,
    /// Write logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit load balancers from an inventory snapshot.
    ///
    /// Runs the security group, health check and availability zone checks
    /// over every selected load balancer and prints one line per problem.
    Check(commands::check::CheckArgs),
    /// Manage the elb-sanity.toml configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a configuration scaffold with every setting spelled out
    Init {
        #[arg(short, long, default_value = "elb-sanity.toml")]
        path: String,
        /// Security group the load balancers reach instances from
        #[arg(long)]
        lb_group_id: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug, cli.log_json);

    match cli.command {
        Commands::Check(args) => commands::check::check(&args),
        Commands::Config { action } => match action {
            ConfigAction::Init { path, lb_group_id, force } => {
                commands::config::init(&path, lb_group_id.as_deref(), force)?;
                Ok(ExitCode::SUCCESS)
            }
        },
    }
}

/// Logs go to stderr so the report on stdout stays machine-readable.
/// `RUST_LOG` takes precedence over the flags.
fn init_logging(verbose: bool, debug: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, debug)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn default_level(verbose: bool, debug: bool) -> &'static str {
    if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(default_level(false, false), "warn");
        assert_eq!(default_level(true, false), "info");
        assert_eq!(default_level(false, true), "debug");
        assert_eq!(default_level(true, true), "debug");
    }

    #[test]
    fn test_check_flags_parse() {
        let cli = Cli::try_parse_from([
            "elb-sanity",
            "-v",
            "check",
            "--inventory",
            "snapshot.json",
            "--region",
            "us-east-1",
            "--region",
            "eu-west-1",
            "--name",
            "web",
            "--format",
            "json",
            "--fail-on-error",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.regions, vec!["us-east-1", "eu-west-1"]);
        assert_eq!(args.names, vec!["web"]);
        assert_eq!(args.format, "json");
        assert!(args.fail_on_error);
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = Cli::try_parse_from(["elb-sanity", "check", "-i", "x.json", "--format", "xml"]);
        assert!(result.is_err());
    }
}
