use std::collections::HashMap;

/// The current value of a single question.
///
/// This is the value stored in `AnswerStore` for each question key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Free text, emails, phone numbers and single choices (stored as the option value).
    Text(String),

    /// Selected options of a checkbox-style question.
    ///
    /// Insertion order is kept for display, but only membership matters.
    MultiChoice(Vec<String>),

    /// Scores per rating statement id. A missing statement is unrated, not zero.
    Rating(HashMap<String, u8>),

    /// A yes/no answer that distinguishes "not answered yet" (`None`) from "no".
    Flag(Option<bool>),
}

impl Answer {
    /// Try to get this value as a string slice.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as the selected options.
    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::MultiChoice(choices) => Some(choices),
            _ => None,
        }
    }

    /// Try to get this value as a rating map.
    pub fn as_ratings(&self) -> Option<&HashMap<String, u8>> {
        match self {
            Self::Rating(scores) => Some(scores),
            _ => None,
        }
    }

    /// Try to get this value as a flag.
    pub fn as_flag(&self) -> Option<Option<bool>> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Whether the answer carries no information yet.
    ///
    /// Whitespace-only text counts as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::MultiChoice(choices) => choices.is_empty(),
            Self::Rating(scores) => scores.is_empty(),
            Self::Flag(flag) => flag.is_none(),
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::MultiChoice(_) => "MultiChoice",
            Self::Rating(_) => "Rating",
            Self::Flag(_) => "Flag",
        }
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for Answer {
    fn from(b: bool) -> Self {
        Self::Flag(Some(b))
    }
}

impl From<Vec<String>> for Answer {
    fn from(choices: Vec<String>) -> Self {
        Self::MultiChoice(choices)
    }
}
