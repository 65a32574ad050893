//! GasMate command-line interface.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use gasmate_api::{GasmateConfig, HmacIdentityVerifier};
use gasmate_core::config::defaults;
use gasmate_core::Thresholds;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gasmate")]
#[command(author, version, about = "Gas leak alerts and notifications", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to a gasmate.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Start the notification API server
    Serve {
        /// Address to listen on, overrides the config file
        #[arg(short, long)]
        bind: Option<String>,

        /// Directory for the alert, settings and reading databases
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Issue an ID token for an account
    Token {
        /// Account the token identifies
        #[arg(short, long)]
        account: String,

        /// Token lifetime in seconds
        #[arg(long, default_value_t = 3600)]
        ttl: i64,
    },

    /// Classify a concentration in PPM
    Classify {
        /// Concentration in PPM
        value: f64,

        /// Critical threshold in PPM
        #[arg(long, default_value_t = defaults::CRITICAL_PPM)]
        critical: f64,

        /// Danger threshold in PPM
        #[arg(long, default_value_t = defaults::DANGER_PPM)]
        danger: f64,
    },
}

fn init_logging(verbose: bool) {
    let json_logs = std::env::var("GASMATE_LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);

    let default_filter = if verbose { "gasmate=debug" } else { "gasmate=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .compact()
            .with_level(false)
            .init();
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Serve { bind, data_dir } => {
            let mut config = GasmateConfig::load(args.config.as_deref())?;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(data_dir) = data_dir {
                config.server.data_dir = data_dir;
            }
            gasmate_api::run(config).await
        }
        Command::Token { account, ttl } => {
            let config = GasmateConfig::load(args.config.as_deref())?;
            let Some(secret) = config.identity.secret.as_deref() else {
                bail!("No identity secret configured; set GASMATE_IDENTITY_SECRET or [identity].secret");
            };
            if account.trim().is_empty() {
                bail!("Account must not be empty");
            }
            if ttl <= 0 {
                bail!("Token lifetime must be positive");
            }
            let Some(ttl) = chrono::Duration::try_seconds(ttl) else {
                bail!("Token lifetime of {} seconds is out of range", ttl);
            };
            let verifier = HmacIdentityVerifier::new(secret);
            let token = verifier.issue(account.trim(), ttl)?;
            println!("{}", token);
            Ok(())
        }
        Command::Classify {
            value,
            critical,
            danger,
        } => {
            let thresholds = Thresholds::new(critical, danger);
            println!("{}", thresholds.classify(value));
            Ok(())
        }
    }
}
