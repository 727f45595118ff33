//! # intake-transport-http
//!
//! HTTP transports for intake sessions, one per delivery kind:
//! - [`EmailJsTransport`] - transactional email via the EmailJS REST API
//! - [`WebhookTransport`] - JSON post to a webhook URL
//! - [`FormRelayTransport`] - FormSubmit AJAX relay to a destination address
//!
//! Which one runs is decided by the session's `TransportConfig`; register all
//! three with [`http_transports`] and let configuration choose.

mod email;
pub use email::{EMAILJS_ENDPOINT, EmailJsTransport};

mod webhook;
pub use webhook::{WebhookResponse, WebhookTransport};

mod form_relay;
pub use form_relay::{FORMSUBMIT_BASE_URL, FormRelayTransport};

use intake::TransportSet;
use reqwest::Client;

/// Every HTTP transport, sharing one client.
pub fn http_transports(client: Client) -> TransportSet {
    TransportSet::new()
        .with(EmailJsTransport::new(client.clone()))
        .with(WebhookTransport::new(client.clone()))
        .with(FormRelayTransport::new(client))
}
