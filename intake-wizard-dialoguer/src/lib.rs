//! # intake-wizard-dialoguer
//!
//! Dialoguer shell for intake questionnaires.
//!
//! This crate renders any `Questionnaire` as a command-line wizard using the
//! `dialoguer` library: an intro screen, one screen per question step and a
//! summary with a submit action. Navigation and validation are left to the
//! `Session`, so the shell holds no wizard logic of its own.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use intake::{IntakeConfig, Session};
//! use intake_wizard_dialoguer::{ClearScreen, DialoguerShell};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = IntakeConfig::load_or_default(None)?;
//!     let transports = intake_transport_http::http_transports(reqwest::Client::new());
//!     let mut session = Session::new(Arc::new(questionnaire()), transports, config.transport, config.delivery)?
//!         .with_viewport(ClearScreen);
//!     DialoguerShell::new().run(&mut session).await?;
//!     Ok(())
//! }
//! ```

mod shell;

pub use shell::{ClearScreen, DialoguerShell, ShellError};
