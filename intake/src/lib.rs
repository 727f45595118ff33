//! # intake
//!
//! Multi-step intake questionnaires. Presentation-agnostic.
//!
//! A [`Questionnaire`] declares ordered steps of questions. A [`Session`]
//! walks one respondent through it: answers live in an [`AnswerStore`],
//! every forward step passes a validation gate, and the summary step submits
//! the normalized answers through the first configured [`Transport`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use intake::{IntakeConfig, Session, TestTransport, TransportKind, TransportSet};
//!
//! let config = IntakeConfig::load_or_default(None)?;
//! let transports = TransportSet::new().with(TestTransport::new(TransportKind::Webhook));
//! let mut session = Session::new(Arc::new(questionnaire), transports, config.transport, config.delivery)?;
//!
//! session.advance();
//! session.edit_field("contactName", "Dana");
//! session.advance();
//! // ...
//! session.submit_and_wait().await;
//! ```
//!
//! ## Steps
//!
//! Step `0` is the introduction and step `total_steps()` is the summary. The
//! steps in between are the questionnaire's question steps, in order.
//!
//! ## Transports
//!
//! Concrete transports live in separate crates:
//! - `intake-transport-http` - transactional email API, webhook and form relay over HTTP

// Re-export all types from intake-types
pub use intake_types::*;

pub mod locale;

mod validation;
pub use validation::{
    Problem, Rule, ValidationReport, Violation, rules, validate_all, validate_step,
};

mod submission;
pub use submission::{Payload, SubmissionState, SubmitError, normalize, render_table, timestamp};

mod transport;
pub use transport::{
    DEFAULT_TIMEOUT, DeliveryJob, DeliveryResult, EmailCredentials, Transport, TransportConfig,
    TransportKind, TransportSet,
};

mod wizard;
pub use wizard::{
    Action, ActionError, Effect, IgnoreReason, LastError, Outcome, Transition, WizardOptions,
    WizardState, transition,
};

mod session;
pub use session::{Clock, Dispatched, FixedClock, NoopViewport, Session, SystemClock, Viewport};

mod config;
pub use config::{
    ConfigError, DeliverySettings, ENV_DESTINATION, ENV_PUBLIC_KEY, ENV_SERVICE_ID,
    ENV_TEMPLATE_ID, ENV_WEBHOOK_URL, IntakeConfig,
};

// Test transport for driving sessions without a network
mod test_transport;
pub use test_transport::TestTransport;

// Re-exported for transport implementations
pub use async_trait::async_trait;
