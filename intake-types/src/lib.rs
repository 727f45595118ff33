//! Core types for the intake crate.
//!
//! This crate provides the foundational types for defining questionnaires:
//! - `Questionnaire` and `Step` - The ordered screens of a wizard
//! - `Question` and `QuestionKind` - Individual questions and their answer types
//! - `AnswerStore` and `FieldKey` - Per-session answers keyed by question

mod field_key;
pub use field_key::FieldKey;

mod answer;
pub use answer::Answer;

mod answer_store;
pub use answer_store::{AnswerStore, Snapshot};

mod question;
pub use question::{
    Choice, ChoiceQuestion, FlagQuestion, Question, QuestionKind, RatingQuestion,
    RatingStatement, TextFormat, TextQuestion,
};

mod questionnaire;
pub use questionnaire::{Questionnaire, Step, StepView};

mod error;
pub use error::{SchemaError, StoreError};
