//! Form relay through FormSubmit's AJAX endpoint.

use async_trait::async_trait;
use intake::{DeliveryResult, Payload, Transport, TransportConfig, TransportKind};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde_json::{Map, Value};

/// The public FormSubmit host.
pub const FORMSUBMIT_BASE_URL: &str = "https://formsubmit.co";

/// Posts the normalized fields to `{base}/ajax/{destination}`.
///
/// Delivered only when the status is 2xx and the JSON body says
/// `"success": true` (or `"true"`).
#[derive(Debug, Clone)]
pub struct FormRelayTransport {
    client: Client,
    base_url: String,
}

impl FormRelayTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: FORMSUBMIT_BASE_URL.to_string(),
        }
    }

    /// Post to another host, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, destination: &str) -> String {
        format!("{}/ajax/{}", self.base_url.trim_end_matches('/'), destination)
    }
}

/// The relay's control fields followed by every normalized answer.
fn relay_body(payload: &Payload) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("_subject".into(), payload.subject.clone().into());
    body.insert("_replyto".into(), payload.reply_to.clone().into());
    body.insert("_template".into(), "table".into());
    body.insert("_captcha".into(), "false".into());
    for (key, value) in &payload.fields {
        body.insert(key.clone(), value.clone().into());
    }
    body
}

fn reports_success(body: &Value) -> bool {
    match body.get("success") {
        Some(Value::Bool(success)) => *success,
        Some(Value::String(success)) => success == "true",
        _ => false,
    }
}

#[async_trait]
impl Transport for FormRelayTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::FormRelay
    }

    async fn submit(&self, payload: &Payload, config: &TransportConfig) -> DeliveryResult {
        let Some(destination) = config.destination() else {
            return DeliveryResult::Failure("Destination address is not configured".to_string());
        };

        let response = match self
            .client
            .post(self.endpoint(destination))
            .header(ACCEPT, "application/json")
            .json(&relay_body(payload))
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return DeliveryResult::Failure(format!("Form relay request failed: {err}")),
        };

        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                return DeliveryResult::Failure(format!(
                    "Form relay answered HTTP {status} without JSON: {err}"
                ));
            }
        };

        if status.is_success() && reports_success(&body) {
            DeliveryResult::Success
        } else {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Form relay rejected the submission (HTTP {status})"));
            DeliveryResult::Failure(message)
        }
    }
}
