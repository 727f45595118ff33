//! Test transport for driving sessions without a network.
//!
//! `TestTransport` answers every delivery with a pre-configured result and
//! records what it was sent. Clones share the recording, so a test can keep
//! one handle while the session owns another.
//!
//! # Example
//!
//! ```rust,ignore
//! use intake::{TestTransport, TransportKind, TransportSet};
//!
//! let email = TestTransport::new(TransportKind::TransactionalEmail);
//! let transports = TransportSet::new().with(email.clone());
//! // ... run a session ...
//! assert_eq!(email.calls(), 1);
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::submission::Payload;
use crate::transport::{DeliveryResult, Transport, TransportConfig, TransportKind};

/// A transport that returns a scripted result and records its payloads.
#[derive(Debug, Clone)]
pub struct TestTransport {
    kind: TransportKind,
    result: DeliveryResult,
    delay: Option<Duration>,
    sent: Arc<Mutex<Vec<Payload>>>,
}

impl TestTransport {
    /// A transport of the given kind that always succeeds.
    pub fn new(kind: TransportKind) -> Self {
        Self {
            kind,
            result: DeliveryResult::Success,
            delay: None,
            sent: Arc::default(),
        }
    }

    /// Report this failure for every delivery.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.result = DeliveryResult::Failure(message.into());
        self
    }

    /// Wait this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of deliveries started.
    pub fn calls(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or_default()
    }

    /// Every payload received so far.
    pub fn payloads(&self) -> Vec<Payload> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    pub fn last_payload(&self) -> Option<Payload> {
        self.payloads().pop()
    }
}

#[async_trait]
impl Transport for TestTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    async fn submit(&self, payload: &Payload, _config: &TransportConfig) -> DeliveryResult {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(payload.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}
