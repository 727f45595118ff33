use crate::FieldKey;

/// Error type for answer store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("No question with key '{0}'")]
    UnknownKey(FieldKey),

    #[error("Type mismatch at '{key}': expected {expected}, got {actual}")]
    TypeMismatch {
        key: FieldKey,
        expected: &'static str,
        actual: &'static str,
    },

    /// The score is outside the 1-5 scale.
    #[error("Rating for '{key}' must be between 1 and 5, got {score}")]
    RatingOutOfRange { key: FieldKey, score: u8 },

    #[error("'{key}' has no option '{option}'")]
    UnknownOption { key: FieldKey, option: String },

    #[error("'{key}' has no rating statement '{statement}'")]
    UnknownStatement { key: FieldKey, statement: String },
}

impl StoreError {
    /// Check if this error is a rating range violation.
    pub fn is_range_error(&self) -> bool {
        matches!(self, Self::RatingOutOfRange { .. })
    }
}

/// Error type for malformed questionnaire schemas.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Question key must not be empty")]
    EmptyKey,

    #[error("Question key '{0}' is used more than once")]
    DuplicateKey(FieldKey),

    #[error("Question '{key}' declares option '{option}' more than once")]
    DuplicateOption { key: FieldKey, option: String },

    #[error("Rating question '{0}' has no statements")]
    NoStatements(FieldKey),

    #[error("Question '{key}' depends on '{flag}', which is not a yes/no question")]
    BadCondition { key: FieldKey, flag: FieldKey },
}
