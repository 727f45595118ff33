//! Offline demo. Run with: cargo run --example demo
//!
//! Submissions go to an in-memory relay that prints the payload.

use std::sync::Arc;

use example_questionnaires::demo;
use intake::{
    DeliverySettings, Session, TestTransport, TransportConfig, TransportKind, TransportSet,
};
use intake_wizard_dialoguer::DialoguerShell;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let relay = TestTransport::new(TransportKind::FormRelay);
    let config = TransportConfig {
        destination: Some("demo@example.com".into()),
        ..Default::default()
    };
    let mut session = Session::new(
        Arc::new(demo()),
        TransportSet::new().with(relay.clone()),
        config,
        DeliverySettings::default(),
    )?;

    if let Err(err) = DialoguerShell::plain().run(&mut session).await {
        if err.is_cancelled() {
            return Ok(());
        }
        return Err(err.into());
    }

    if let Some(payload) = relay.last_payload() {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }
    Ok(())
}
