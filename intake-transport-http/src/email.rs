//! Transactional email through the EmailJS REST API.

use async_trait::async_trait;
use intake::{DeliveryResult, Payload, Transport, TransportConfig, TransportKind};
use reqwest::{Client, StatusCode};
use serde_json::json;

/// The public EmailJS send endpoint.
pub const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Sends the payload as template parameters of an EmailJS template.
///
/// Only a `200 OK` counts as delivered.
#[derive(Debug, Clone)]
pub struct EmailJsTransport {
    client: Client,
    endpoint: String,
}

impl EmailJsTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: EMAILJS_ENDPOINT.to_string(),
        }
    }

    /// Post somewhere else, e.g. a mock server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Transport for EmailJsTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::TransactionalEmail
    }

    async fn submit(&self, payload: &Payload, config: &TransportConfig) -> DeliveryResult {
        let Some(credentials) = config.email_credentials() else {
            return DeliveryResult::Failure("EmailJS credentials are incomplete".to_string());
        };

        let body = json!({
            "service_id": credentials.service_id,
            "template_id": credentials.template_id,
            "user_id": credentials.public_key,
            "template_params": payload,
        });

        let response = match self.client.post(&self.endpoint).json(&body).send().await {
            Ok(response) => response,
            Err(err) => return DeliveryResult::Failure(format!("EmailJS request failed: {err}")),
        };

        let status = response.status();
        if status == StatusCode::OK {
            return DeliveryResult::Success;
        }
        let text = response.text().await.unwrap_or_default();
        DeliveryResult::Failure(format!("EmailJS error (HTTP {status}): {text}"))
    }
}
