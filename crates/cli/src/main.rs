mod bootstrap;
mod commands;
mod di;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use proxyforge_domain::config::CliOverrides;
use proxyforge_domain::errors::DomainError;
use tracing::error;

use crate::bootstrap::init_logging;
use crate::di::AppContext;

#[derive(Parser)]
#[command(name = "proxyforge")]
#[command(about = "Discovers, validates, and serves open network proxies")]
struct Cli {
    /// Path to a TOML config file. Falls back to built-in defaults.
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// Override `database.path`.
    #[arg(long = "database-path")]
    database_path: Option<String>,

    /// Override `rotation.listen_addr`.
    #[arg(long = "listen-addr")]
    listen_addr: Option<String>,

    /// Override `logging.level`.
    #[arg(long = "log-level")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import candidate ip:port pairs and run them through the validation pipeline.
    Validate {
        /// Path to a file of candidates (ip:port lines, masscan `open tcp` lines, or a JSON array).
        #[arg(long)]
        input: PathBuf,
    },
    /// Run the lifecycle engine: re-verify stored proxies and evict dead ones.
    Lifecycle {
        /// Run a single sweep and exit instead of looping on an interval.
        #[arg(long)]
        once: bool,
    },
    /// Serve the rotating forward-proxy gateway.
    ServeGateway,
    /// Print a scan specification derived from subnet intelligence.
    SmartConfig {
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        database_path: cli.database_path.clone(),
        listen_addr: cli.listen_addr.clone(),
        log_level: cli.log_level.clone(),
    };

    let ctx = match AppContext::bootstrap(cli.config.as_deref(), overrides).await {
        Ok(ctx) => ctx,
        Err(err) => {
            return match err.downcast_ref::<DomainError>() {
                Some(DomainError::ConfigInvalid(_)) => {
                    eprintln!("configuration error: {err}");
                    ExitCode::from(2)
                }
                Some(DomainError::StorageUnavailable(_)) => {
                    eprintln!("storage error: {err}");
                    ExitCode::from(3)
                }
                _ => {
                    eprintln!("startup error: {err}");
                    ExitCode::FAILURE
                }
            };
        }
    };

    init_logging(&ctx.config);

    let result = match cli.command {
        Command::Validate { input } => commands::validate::run(&ctx, input).await,
        Command::Lifecycle { once } => commands::lifecycle::run(&ctx, once).await,
        Command::ServeGateway => commands::serve_gateway::run(&ctx).await,
        Command::SmartConfig { limit } => commands::smart_config::run(&ctx, limit).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");
            match err.downcast_ref::<DomainError>() {
                Some(DomainError::ConfigInvalid(_)) => ExitCode::from(2),
                Some(DomainError::StorageUnavailable(_)) => ExitCode::from(3),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
