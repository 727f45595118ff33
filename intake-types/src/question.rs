use std::collections::HashMap;
use std::fmt;

use crate::{Answer, FieldKey};

/// A single question in a questionnaire.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// The key of this question's answer in the `AnswerStore`.
    key: FieldKey,

    /// The prompt text shown to the user.
    ask: String,

    /// The kind of question (determines the answer type).
    kind: QuestionKind,

    /// Whether the step gate requires an answer.
    required: bool,

    /// Hint text shown inside empty inputs.
    placeholder: Option<String>,

    /// Only shown (and validated) while this flag is answered "yes".
    shown_when: Option<FieldKey>,
}

impl Question {
    /// Create a new optional question.
    pub fn new(key: impl Into<FieldKey>, ask: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            key: key.into(),
            ask: ask.into(),
            kind,
            required: false,
            placeholder: None,
            shown_when: None,
        }
    }

    /// Free text input.
    pub fn text(key: impl Into<FieldKey>, ask: impl Into<String>) -> Self {
        Self::new(key, ask, QuestionKind::Text(TextQuestion::default()))
    }

    /// Multi-line free text input.
    pub fn multiline(key: impl Into<FieldKey>, ask: impl Into<String>) -> Self {
        Self::new(key, ask, QuestionKind::Text(TextQuestion::multiline()))
    }

    /// Text input with a format constraint.
    pub fn formatted(key: impl Into<FieldKey>, ask: impl Into<String>, format: TextFormat) -> Self {
        Self::new(key, ask, QuestionKind::Text(TextQuestion::with_format(format)))
    }

    /// Pick exactly one option (radio buttons). Stored as the option value.
    pub fn single_choice(
        key: impl Into<FieldKey>,
        ask: impl Into<String>,
        options: Vec<Choice>,
    ) -> Self {
        Self::new(key, ask, QuestionKind::SingleChoice(ChoiceQuestion::new(options)))
    }

    /// Pick any number of options (checkboxes).
    pub fn multi_choice(
        key: impl Into<FieldKey>,
        ask: impl Into<String>,
        options: Vec<Choice>,
    ) -> Self {
        Self::new(key, ask, QuestionKind::MultiChoice(ChoiceQuestion::new(options)))
    }

    /// Rate each statement on a 1-5 scale.
    pub fn rating(
        key: impl Into<FieldKey>,
        ask: impl Into<String>,
        statements: Vec<RatingStatement>,
    ) -> Self {
        Self::new(key, ask, QuestionKind::Rating(RatingQuestion::new(statements)))
    }

    /// Yes/no question.
    pub fn flag(key: impl Into<FieldKey>, ask: impl Into<String>) -> Self {
        Self::new(key, ask, QuestionKind::Flag(FlagQuestion::default()))
    }

    /// Mark the question as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the placeholder text.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Only show this question while the given flag is answered "yes".
    pub fn shown_when(mut self, flag: impl Into<FieldKey>) -> Self {
        self.shown_when = Some(flag.into());
        self
    }

    /// Get the key for this question.
    pub fn key(&self) -> &FieldKey {
        &self.key
    }

    /// Get the prompt text.
    pub fn ask(&self) -> &str {
        &self.ask
    }

    /// The prompt, or a humanized key when no prompt was given.
    pub fn label(&self) -> String {
        if self.ask.is_empty() {
            self.key.humanize()
        } else {
            self.ask.clone()
        }
    }

    /// Get the question kind.
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// The flag controlling visibility, if any.
    pub fn condition(&self) -> Option<&FieldKey> {
        self.shown_when.as_ref()
    }

    /// The value a fresh store holds for this question.
    pub fn default_answer(&self) -> Answer {
        self.kind.default_answer()
    }
}

/// The kind of question, determining the answer type.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    /// Free text input, optionally constrained to a format.
    Text(TextQuestion),

    /// Choose one option. Answered as `Answer::Text` holding the option value.
    SingleChoice(ChoiceQuestion),

    /// Choose any number of options.
    MultiChoice(ChoiceQuestion),

    /// Score a list of statements from 1 to 5.
    Rating(RatingQuestion),

    /// Yes/no with an explicit "not answered" state.
    Flag(FlagQuestion),
}

impl QuestionKind {
    pub fn default_answer(&self) -> Answer {
        match self {
            Self::Text(_) | Self::SingleChoice(_) => Answer::Text(String::new()),
            Self::MultiChoice(_) => Answer::MultiChoice(Vec::new()),
            Self::Rating(_) => Answer::Rating(HashMap::new()),
            Self::Flag(_) => Answer::Flag(None),
        }
    }

    /// The options of a choice question.
    pub fn choices(&self) -> Option<&[Choice]> {
        match self {
            Self::SingleChoice(q) | Self::MultiChoice(q) => Some(&q.options),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::SingleChoice(_) => "SingleChoice",
            Self::MultiChoice(_) => "MultiChoice",
            Self::Rating(_) => "Rating",
            Self::Flag(_) => "Flag",
        }
    }
}

/// Format constraint for text answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextFormat {
    #[default]
    Plain,
    /// `local@domain.tld`
    Email,
    /// Digits with `+ - ( ) .` and spaces, at least 7 digits.
    Phone,
    /// `http://` or `https://` followed by a dotted host.
    Url,
}

impl TextFormat {
    /// Check a non-empty value against the format.
    pub fn accepts(&self, value: &str) -> bool {
        let value = value.trim();
        match self {
            Self::Plain => true,
            Self::Email => is_email(value),
            Self::Phone => is_phone(value),
            Self::Url => is_url(value),
        }
    }

    /// Example value used in error messages.
    pub fn example(&self) -> Option<&'static str> {
        match self {
            Self::Plain => None,
            Self::Email => Some("you@example.com"),
            Self::Phone => Some("050-123-4567"),
            Self::Url => Some("https://example.com"),
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Plain => "text",
            Self::Email => "email address",
            Self::Phone => "phone number",
            Self::Url => "web address",
        };
        f.write_str(name)
    }
}

fn is_email(value: &str) -> bool {
    if !value.is_ascii() || value.chars().any(|c| c.is_whitespace()) {
        return false;
    }
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

fn is_phone(value: &str) -> bool {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | '.' | ' ');
    value.chars().all(allowed) && value.chars().filter(char::is_ascii_digit).count() >= 7
}

fn is_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    let Some(rest) = rest else {
        return false;
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    !value.chars().any(char::is_whitespace)
        && host.contains('.')
        && host.split('.').all(|label| !label.is_empty())
}

/// Configuration for a text question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextQuestion {
    pub format: TextFormat,

    /// Rendered as a text area.
    pub multiline: bool,
}

impl TextQuestion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn multiline() -> Self {
        Self {
            format: TextFormat::Plain,
            multiline: true,
        }
    }

    pub fn with_format(format: TextFormat) -> Self {
        Self {
            format,
            multiline: false,
        }
    }
}

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// The value stored in the answer.
    pub value: String,

    /// The text shown to the user.
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Configuration for single and multi choice questions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoiceQuestion {
    pub options: Vec<Choice>,
}

impl ChoiceQuestion {
    pub fn new(options: Vec<Choice>) -> Self {
        Self { options }
    }

    /// Check whether `value` is one of the declared options.
    pub fn offers(&self, value: &str) -> bool {
        self.options.iter().any(|choice| choice.value == value)
    }

    /// The label of the option with the given value.
    pub fn label_of(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|choice| choice.value == value)
            .map(|choice| choice.label.as_str())
    }
}

/// A statement scored in a rating question.
///
/// Scores are keyed by `id`, so the wording can change without
/// orphaning stored answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingStatement {
    pub id: String,
    pub text: String,
}

impl RatingStatement {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Configuration for a 1-5 rating question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingQuestion {
    pub statements: Vec<RatingStatement>,
}

impl RatingQuestion {
    /// Lowest accepted score.
    pub const MIN: u8 = 1;
    /// Highest accepted score.
    pub const MAX: u8 = 5;

    pub fn new(statements: Vec<RatingStatement>) -> Self {
        Self { statements }
    }

    pub fn statement(&self, id: &str) -> Option<&RatingStatement> {
        self.statements.iter().find(|s| s.id == id)
    }
}

/// Configuration for a yes/no question.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagQuestion {
    pub yes_label: String,
    pub no_label: String,
}

impl FlagQuestion {
    pub fn with_labels(yes_label: impl Into<String>, no_label: impl Into<String>) -> Self {
        Self {
            yes_label: yes_label.into(),
            no_label: no_label.into(),
        }
    }
}

impl Default for FlagQuestion {
    fn default() -> Self {
        Self::with_labels("Yes", "No")
    }
}
