use std::io;
use std::time::Duration;

use clap::Parser;
use config::{
    Settings, DEFAULT_API_BASE_URL, DEFAULT_DROPLET_ID, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_WAIT_TIMEOUT_SECS,
};
use errors::DdResult;
use ops::{destroy, Ops};
use prompt::TerminalPrompt;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub mod auth;
pub mod config;
pub mod do_rust;
pub mod errors;
pub mod ops;
pub mod prompt;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

pub fn version() -> String {
    let commit_hash =
        option_env!("DROPLET_DESTROY_GIT_INFO").unwrap_or(env!("CARGO_PKG_VERSION"));

    format!(
        "\
{commit_hash}

Token: read from ${}, otherwise prompted for.",
        config::TOKEN_ENV_VAR
    )
}

#[derive(Parser, Debug)]
#[command(
    version = version(),
    about = "Destroy a DigitalOcean droplet and wait for the destroy action to finish"
)]
struct Args {
    /// Id of the droplet to destroy
    #[arg(long, default_value_t = DEFAULT_DROPLET_ID)]
    droplet_id: u64,
    /// Seconds between status checks of the destroy action
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval: u64,
    /// Seconds to wait for the destroy action before giving up
    #[arg(long, default_value_t = DEFAULT_WAIT_TIMEOUT_SECS)]
    wait_timeout: u64,
    #[arg(long, default_value = DEFAULT_API_BASE_URL, hide = true)]
    api_base_url: String,
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        Settings {
            api_base_url: args.api_base_url,
            droplet_id: args.droplet_id,
            poll_interval: Duration::from_secs(args.poll_interval),
            wait_timeout: Duration::from_secs(args.wait_timeout),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> DdResult<()> {
    let settings = Settings::from(Args::parse());
    color_eyre::install()?;
    init_tracing();

    let access_token = auth::read_access_token(auth::token_from_env()?, &mut TerminalPrompt)?;
    let ops = Ops::new(&settings, access_token)?;

    let cancellation_token = CancellationToken::new();
    let ctrl_c_token = cancellation_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping before the destroy request or abandoning the wait.");
            ctrl_c_token.cancel();
        }
    });

    let mut stdout = io::stdout().lock();
    let report = destroy::run(&ops, &settings, &cancellation_token, &mut stdout).await?;
    info!(
        "Run finished: destroyed={}, wait={:?}, {} actions listed.",
        report.destroyed,
        report.wait.map(|wait| wait.outcome),
        report.actions.len()
    );
    Ok(())
}
