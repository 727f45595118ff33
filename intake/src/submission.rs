//! Turning answers into a transport-agnostic payload.

use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use intake_types::{Answer, FieldKey, QuestionKind, Questionnaire, Snapshot, TextFormat};
use serde::Serialize;

use crate::locale;

/// Where a submission stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(SubmitError),
}

impl SubmissionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    pub fn error(&self) -> Option<&SubmitError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Why a submission failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// No usable transport is configured. Needs operator action, not a retry.
    #[error("{0}")]
    Configuration(String),

    /// The active transport reported a failure.
    #[error("Delivery failed: {0}")]
    Transport(String),

    /// The transport did not settle before the deadline.
    #[error("Delivery timed out after {0:?}")]
    Timeout(Duration),
}

impl SubmitError {
    /// The text shown to the respondent.
    ///
    /// Configuration errors are shown verbatim; transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration(message) => message.clone(),
            Self::Transport(_) => locale::SEND_FAILED.to_string(),
            Self::Timeout(_) => locale::SEND_TIMED_OUT.to_string(),
        }
    }

    /// Whether resubmitting without changing configuration can help.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Configuration(_))
    }
}

/// The normalized submission handed to a transport.
///
/// Serializes to one flat JSON object: the metadata fields followed by
/// every normalized answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    pub subject: String,
    pub reply_to: String,
    pub to_email: String,
    pub submitted_at: String,
    pub table_html: String,
    #[serde(flatten)]
    pub fields: IndexMap<String, String>,
}

impl Payload {
    /// Build the payload for a snapshot.
    ///
    /// `destination` is the configured recipient address; it doubles as the
    /// reply-to fallback when the respondent left no email.
    pub fn build(
        questionnaire: &Questionnaire,
        snapshot: &Snapshot,
        subject: &str,
        destination: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        let fields = normalize(questionnaire, snapshot);
        let table_html = render_table(questionnaire, &fields);
        let destination = destination.map(str::trim).unwrap_or_default();

        let reply_to = respondent_email(questionnaire, snapshot)
            .unwrap_or(destination)
            .to_string();

        Self {
            subject: subject.to_string(),
            reply_to,
            to_email: destination.to_string(),
            submitted_at: timestamp(now),
            table_html,
            fields,
        }
    }
}

/// The first non-empty email-formatted answer, or the `email` field.
fn respondent_email<'a>(questionnaire: &Questionnaire, snapshot: &'a Snapshot) -> Option<&'a str> {
    let email_keys = questionnaire
        .questions()
        .filter(|q| matches!(q.kind(), QuestionKind::Text(t) if t.format == TextFormat::Email))
        .map(|q| q.key().clone())
        .chain(std::iter::once(FieldKey::new("email")));

    for key in email_keys {
        if let Ok(email) = snapshot.text(&key).map(str::trim)
            && !email.is_empty()
        {
            return Some(email);
        }
    }
    None
}

/// Flatten every answer to a string, in schema order.
///
/// - multi choice: `", "`-joined selected values
/// - flag: yes/no, an unanswered flag counts as no
/// - rating: one `"statement: score/5"` line per rated statement
pub fn normalize(questionnaire: &Questionnaire, snapshot: &Snapshot) -> IndexMap<String, String> {
    let mut fields = IndexMap::new();
    for question in questionnaire.questions() {
        let Some(answer) = snapshot.get(question.key()) else {
            continue;
        };
        let value = match (question.kind(), answer) {
            (_, Answer::Text(text)) => text.clone(),
            (_, Answer::MultiChoice(choices)) => choices.join(", "),
            (_, Answer::Flag(flag)) => {
                if flag.unwrap_or(false) {
                    locale::YES.to_string()
                } else {
                    locale::NO.to_string()
                }
            }
            (QuestionKind::Rating(rating), Answer::Rating(scores)) => rating
                .statements
                .iter()
                .filter_map(|statement| {
                    scores
                        .get(&statement.id)
                        .map(|score| format!("{}: {}/5", statement.text, score))
                })
                .collect::<Vec<_>>()
                .join("\n"),
            (_, Answer::Rating(_)) => String::new(),
        };
        fields.insert(question.key().to_string(), value);
    }
    fields
}

/// Render normalized fields as an HTML table for rich-content transports.
pub fn render_table(questionnaire: &Questionnaire, fields: &IndexMap<String, String>) -> String {
    let rows = fields
        .iter()
        .map(|(key, value)| {
            let key = FieldKey::new(key.as_str());
            let label = questionnaire
                .question(&key)
                .map(|q| q.label())
                .unwrap_or_else(|| key.humanize());
            format!(
                "<tr><th style=\"text-align:start;padding:6px;border:1px solid #e5e7eb;background:#f8fafc;\">{}</th>\
                 <td style=\"padding:6px;border:1px solid #e5e7eb;white-space:pre-line;\">{}</td></tr>",
                escape_html(&label),
                escape_html(value)
            )
        })
        .collect::<String>();
    format!(
        "<table dir=\"{}\" style=\"border-collapse:collapse;width:100%;font-family:Arial,sans-serif;font-size:14px;\">{rows}</table>",
        locale::TABLE_DIRECTION
    )
}

/// RFC 3339 in UTC with milliseconds, e.g. `2026-03-01T09:30:00.000Z`.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
