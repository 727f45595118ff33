//! Delivery transports and their selection.
//!
//! A `Transport` is one external delivery mechanism. Which one is used is
//! decided by configuration alone, in a fixed priority order:
//!
//! 1. transactional email (service id, template id and public key all set)
//! 2. webhook (URL set)
//! 3. form relay (destination address set)
//!
//! The first configured kind is used exclusively; a failure there is final
//! for the attempt and never falls through to a lower-priority kind.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::Instrument;

use crate::locale;
use crate::submission::{Payload, SubmitError};

/// Deadline for one delivery attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// The delivery mechanisms, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransportKind {
    TransactionalEmail,
    Webhook,
    FormRelay,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TransactionalEmail => "transactional email",
            Self::Webhook => "webhook",
            Self::FormRelay => "form relay",
        };
        f.write_str(name)
    }
}

/// Transport settings read from the hosting environment.
///
/// Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransportConfig {
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub public_key: Option<String>,
    pub webhook_url: Option<String>,
    /// Recipient address of the report.
    pub destination: Option<String>,
}

impl TransportConfig {
    /// Decide which transport kind this configuration selects.
    pub fn select(&self) -> Result<TransportKind, SubmitError> {
        if self.email_credentials().is_some() {
            Ok(TransportKind::TransactionalEmail)
        } else if self.webhook_url().is_some() {
            Ok(TransportKind::Webhook)
        } else if self.destination().is_some() {
            Ok(TransportKind::FormRelay)
        } else {
            Err(SubmitError::Configuration(locale::NO_DESTINATION.to_string()))
        }
    }

    /// Service id, template id and public key, when all three are set.
    pub fn email_credentials(&self) -> Option<EmailCredentials<'_>> {
        Some(EmailCredentials {
            service_id: present(&self.service_id)?,
            template_id: present(&self.template_id)?,
            public_key: present(&self.public_key)?,
        })
    }

    pub fn webhook_url(&self) -> Option<&str> {
        present(&self.webhook_url)
    }

    pub fn destination(&self) -> Option<&str> {
        present(&self.destination)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Credentials of the transactional email service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailCredentials<'a> {
    pub service_id: &'a str,
    pub template_id: &'a str,
    pub public_key: &'a str,
}

/// What a transport reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    Success,
    Failure(String),
}

impl DeliveryResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// An external delivery mechanism.
///
/// Implementations decide themselves what counts as success for their
/// provider and report it as a `DeliveryResult`; they never panic or
/// return transport-specific errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Which configuration slot this transport serves.
    fn kind(&self) -> TransportKind;

    /// Deliver the payload.
    async fn submit(&self, payload: &Payload, config: &TransportConfig) -> DeliveryResult;
}

/// At most one transport per kind.
#[derive(Clone, Default)]
pub struct TransportSet {
    transports: Vec<Arc<dyn Transport>>,
}

impl TransportSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transport, replacing any earlier one of the same kind.
    pub fn with(mut self, transport: impl Transport + 'static) -> Self {
        self.insert(Arc::new(transport));
        self
    }

    /// Register a shared transport, replacing any earlier one of the same kind.
    pub fn insert(&mut self, transport: Arc<dyn Transport>) {
        self.transports.retain(|t| t.kind() != transport.kind());
        self.transports.push(transport);
    }

    pub fn get(&self, kind: TransportKind) -> Option<Arc<dyn Transport>> {
        self.transports.iter().find(|t| t.kind() == kind).cloned()
    }

    /// Pick the transport the configuration selects.
    pub fn resolve(
        &self,
        config: &TransportConfig,
    ) -> Result<(TransportKind, Arc<dyn Transport>), SubmitError> {
        let kind = config.select()?;
        let transport = self.get(kind).ok_or_else(|| {
            SubmitError::Configuration(format!("No {kind} transport is available"))
        })?;
        Ok((kind, transport))
    }

    pub fn kinds(&self) -> Vec<TransportKind> {
        let mut kinds: Vec<_> = self.transports.iter().map(|t| t.kind()).collect();
        kinds.sort();
        kinds
    }
}

impl fmt::Debug for TransportSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportSet")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// One delivery attempt, ready to run.
///
/// Owns everything it needs, so the host can run it on its event loop while
/// the session keeps accepting edits.
pub struct DeliveryJob {
    kind: TransportKind,
    payload: Payload,
    config: TransportConfig,
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl DeliveryJob {
    pub fn new(
        kind: TransportKind,
        payload: Payload,
        config: TransportConfig,
        transport: Arc<dyn Transport>,
        timeout: Duration,
    ) -> Self {
        Self {
            kind,
            payload,
            config,
            transport,
            timeout,
        }
    }

    pub fn kind(&self) -> TransportKind {
        self.kind
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Run the transport against the deadline.
    pub async fn run(self) -> Result<(), SubmitError> {
        let span = tracing::info_span!("deliver", transport = %self.kind);
        self.deliver().instrument(span).await
    }

    async fn deliver(self) -> Result<(), SubmitError> {
        tracing::info!(timeout = ?self.timeout, "delivering submission");

        let attempt = self.transport.submit(&self.payload, &self.config);
        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(DeliveryResult::Success) => {
                tracing::info!("submission delivered");
                Ok(())
            }
            Ok(DeliveryResult::Failure(reason)) => {
                tracing::error!(%reason, "transport reported failure");
                Err(SubmitError::Transport(reason))
            }
            Err(_) => {
                tracing::error!("delivery timed out");
                Err(SubmitError::Timeout(self.timeout))
            }
        }
    }
}

impl fmt::Debug for DeliveryJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryJob")
            .field("kind", &self.kind)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
