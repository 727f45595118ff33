//! Business intake over real HTTP transports.
//!
//! Run with: cargo run --example business_intake -- intake.toml
//!
//! Transport credentials come from the optional TOML file and the
//! `INTAKE_*` environment variables. `RUST_LOG=intake=debug` shows the
//! wizard transitions.

use std::path::PathBuf;
use std::sync::Arc;

use example_questionnaires::business_intake;
use intake::{IntakeConfig, Session};
use intake_transport_http::http_transports;
use intake_wizard_dialoguer::{ClearScreen, DialoguerShell};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = IntakeConfig::load_or_default(path.as_deref())?;

    let mut session = Session::new(
        Arc::new(business_intake()),
        http_transports(reqwest::Client::new()),
        config.transport,
        config.delivery,
    )?
    .with_viewport(ClearScreen);

    match DialoguerShell::new().run(&mut session).await {
        Err(err) if err.is_cancelled() => {
            println!("Cancelled.");
            Ok(())
        }
        other => Ok(other?),
    }
}
