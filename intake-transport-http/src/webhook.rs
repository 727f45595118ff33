//! Webhook delivery, e.g. to a spreadsheet script.
//!
//! Webhook endpoints often answer in ways that cannot be read back (redirect
//! chains to a login page, refused or dropped connections, broken bodies).
//! Any such answer counts as delivered; only a readable non-2xx status, or a
//! request that could not even be built, is a failure.

use async_trait::async_trait;
use intake::{DeliveryResult, Payload, Transport, TransportConfig, TransportKind};
use reqwest::{Client, StatusCode};

/// Posts the payload as JSON to the configured URL.
#[derive(Debug, Clone)]
pub struct WebhookTransport {
    client: Client,
}

impl WebhookTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// What came back from the webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookResponse {
    /// A response with a readable status.
    Status(StatusCode),
    /// The request could not be built, so nothing was sent.
    Invalid(String),
    /// No readable answer came back.
    Unreadable(String),
}

impl WebhookResponse {
    fn from_error(err: &reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Invalid(err.to_string())
        } else {
            Self::Unreadable(err.to_string())
        }
    }

    pub fn verdict(&self) -> DeliveryResult {
        match self {
            Self::Status(status) if status.is_success() => DeliveryResult::Success,
            Self::Status(status) => {
                DeliveryResult::Failure(format!("Webhook error (HTTP {status})"))
            }
            Self::Invalid(reason) => {
                DeliveryResult::Failure(format!("Webhook request invalid: {reason}"))
            }
            Self::Unreadable(reason) => {
                tracing::warn!(%reason, "webhook response unreadable, assuming delivered");
                DeliveryResult::Success
            }
        }
    }
}

#[async_trait]
impl Transport for WebhookTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Webhook
    }

    async fn submit(&self, payload: &Payload, config: &TransportConfig) -> DeliveryResult {
        let Some(url) = config.webhook_url() else {
            return DeliveryResult::Failure("Webhook URL is not configured".to_string());
        };

        let response = match self.client.post(url).json(payload).send().await {
            Ok(response) => WebhookResponse::Status(response.status()),
            Err(err) => WebhookResponse::from_error(&err),
        };
        response.verdict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_statuses() {
        for code in [200, 201, 204] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(WebhookResponse::Status(status).verdict().is_success());
        }
    }

    #[test]
    fn readable_error_status_fails() {
        let verdict = WebhookResponse::Status(StatusCode::INTERNAL_SERVER_ERROR).verdict();
        assert!(matches!(verdict, DeliveryResult::Failure(msg) if msg.contains("500")));
    }

    #[test]
    fn unreadable_answer_counts_as_delivered() {
        let verdict = WebhookResponse::Unreadable("too many redirects".into()).verdict();
        assert_eq!(verdict, DeliveryResult::Success);
    }

    #[test]
    fn refused_connection_counts_as_delivered() {
        let verdict = WebhookResponse::Unreadable("connection refused".into()).verdict();
        assert_eq!(verdict, DeliveryResult::Success);
    }

    #[test]
    fn invalid_request_fails() {
        let verdict = WebhookResponse::Invalid("relative URL without a base".into()).verdict();
        assert!(!verdict.is_success());
    }
}
