//! # Rosterline Main Entry Point

use anyhow::Result;
use rosterline::{cmd_args::CommandLineArgs, AppController};
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

const NOISY_CRATES: &[&str] = &["reqwest", "hyper", "hyper_util", "rustls", "tokio", "h2"];

#[tokio::main]
async fn main() -> Result<()> {
    let cmd_args = CommandLineArgs::parse();
    init_tracing_subscriber(cmd_args.verbose());

    let mut app = AppController::new(cmd_args)?;
    app.run().await
}

fn init_tracing_subscriber(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_var = format!("{}_LOG_LEVEL", env!("CARGO_PKG_NAME").to_uppercase());
    let mut filter =
        EnvFilter::try_from_env(&env_var).unwrap_or_else(|_| EnvFilter::new(default_level));
    for name in NOISY_CRATES {
        if let Ok(directive) = format!("{name}=warn").parse() {
            filter = filter.add_directive(directive);
        }
    }

    // Ignore a second init, e.g. from tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .try_init();
}
