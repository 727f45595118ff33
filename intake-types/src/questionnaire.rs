use std::collections::HashSet;

use crate::{FieldKey, Question, QuestionKind, SchemaError};

/// One screen of questions.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub title: String,

    /// Optional text shown under the title.
    pub description: Option<String>,

    pub questions: Vec<Question>,
}

impl Step {
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            title: title.into(),
            description: None,
            questions,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

/// What the wizard shows at a given step index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepView<'a> {
    /// Step 0: introduction, no data entry.
    Intro,
    /// Steps `1..total_steps`: a screen of questions.
    Questions(&'a Step),
    /// Step `total_steps`: review and submit.
    Summary,
}

/// The top-level structure containing all steps and metadata for a questionnaire.
///
/// Presentation-agnostic: the wizard engine and any frontend consume the same
/// declarative schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Questionnaire {
    pub title: String,

    /// Message shown on the introduction step.
    pub intro: Option<String>,

    /// Question steps, in order. Step `i` of this list is wizard step `i + 1`.
    pub steps: Vec<Step>,

    /// Message shown on the summary step.
    pub outro: Option<String>,
}

impl Questionnaire {
    pub fn new(title: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            title: title.into(),
            intro: None,
            steps,
            outro: None,
        }
    }

    /// Set the introduction message.
    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = Some(intro.into());
        self
    }

    /// Set the summary message.
    pub fn with_outro(mut self, outro: impl Into<String>) -> Self {
        self.outro = Some(outro.into());
        self
    }

    /// Index of the summary step. The intro is step 0, so this is one past the last question step.
    pub fn total_steps(&self) -> usize {
        self.steps.len() + 1
    }

    /// What to show at the given wizard step.
    pub fn step_at(&self, index: usize) -> Option<StepView<'_>> {
        match index {
            0 => Some(StepView::Intro),
            i if i == self.total_steps() => Some(StepView::Summary),
            i => self.steps.get(i - 1).map(StepView::Questions),
        }
    }

    /// The question step at the given wizard step, if it is one.
    pub fn question_step(&self, index: usize) -> Option<&Step> {
        match self.step_at(index) {
            Some(StepView::Questions(step)) => Some(step),
            _ => None,
        }
    }

    /// All questions in schema order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.steps.iter().flat_map(|step| step.questions.iter())
    }

    /// Look up a question by key.
    pub fn question(&self, key: &FieldKey) -> Option<&Question> {
        self.questions().find(|q| q.key() == key)
    }

    /// Check that the schema is well formed.
    ///
    /// Keys must be unique, choice values unique within a question, rating
    /// questions must have statements with unique ids, and `shown_when` must
    /// name a flag question.
    pub fn check(&self) -> Result<(), SchemaError> {
        let mut keys = HashSet::new();
        for question in self.questions() {
            if question.key().is_empty() {
                return Err(SchemaError::EmptyKey);
            }
            if !keys.insert(question.key()) {
                return Err(SchemaError::DuplicateKey(question.key().clone()));
            }

            match question.kind() {
                QuestionKind::SingleChoice(choice) | QuestionKind::MultiChoice(choice) => {
                    let mut seen = HashSet::new();
                    for option in &choice.options {
                        if !seen.insert(option.value.as_str()) {
                            return Err(SchemaError::DuplicateOption {
                                key: question.key().clone(),
                                option: option.value.clone(),
                            });
                        }
                    }
                }
                QuestionKind::Rating(rating) => {
                    if rating.statements.is_empty() {
                        return Err(SchemaError::NoStatements(question.key().clone()));
                    }
                    let mut seen = HashSet::new();
                    for statement in &rating.statements {
                        if !seen.insert(statement.id.as_str()) {
                            return Err(SchemaError::DuplicateOption {
                                key: question.key().clone(),
                                option: statement.id.clone(),
                            });
                        }
                    }
                }
                QuestionKind::Text(_) | QuestionKind::Flag(_) => {}
            }
        }

        for question in self.questions() {
            if let Some(flag) = question.condition() {
                match self.question(flag).map(Question::kind) {
                    Some(QuestionKind::Flag(_)) => {}
                    _ => {
                        return Err(SchemaError::BadCondition {
                            key: question.key().clone(),
                            flag: flag.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Choice, RatingStatement};

    fn two_steps() -> Questionnaire {
        Questionnaire::new(
            "Test",
            vec![
                Step::new("Contact", vec![Question::text("name", "Name")]),
                Step::new("Extra", vec![Question::flag("agree", "Agree?")]),
            ],
        )
    }

    #[test]
    fn step_indices() {
        let q = two_steps();
        assert_eq!(q.total_steps(), 3);
        assert_eq!(q.step_at(0), Some(StepView::Intro));
        assert!(matches!(q.step_at(1), Some(StepView::Questions(s)) if s.title == "Contact"));
        assert!(matches!(q.step_at(2), Some(StepView::Questions(s)) if s.title == "Extra"));
        assert_eq!(q.step_at(3), Some(StepView::Summary));
        assert_eq!(q.step_at(4), None);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let q = Questionnaire::new(
            "Dup",
            vec![Step::new(
                "One",
                vec![Question::text("name", "A"), Question::text("name", "B")],
            )],
        );
        assert!(matches!(q.check(), Err(SchemaError::DuplicateKey(k)) if k.as_str() == "name"));
    }

    #[test]
    fn duplicate_options_are_rejected() {
        let q = Questionnaire::new(
            "Dup",
            vec![Step::new(
                "One",
                vec![Question::multi_choice(
                    "goals",
                    "Goals",
                    vec![Choice::new("a", "A"), Choice::new("a", "Again")],
                )],
            )],
        );
        assert!(matches!(q.check(), Err(SchemaError::DuplicateOption { .. })));
    }

    #[test]
    fn rating_needs_statements() {
        let q = Questionnaire::new(
            "Rating",
            vec![Step::new("One", vec![Question::rating("fit", "Fit", vec![])])],
        );
        assert!(matches!(q.check(), Err(SchemaError::NoStatements(_))));

        let ok = Questionnaire::new(
            "Rating",
            vec![Step::new(
                "One",
                vec![Question::rating(
                    "fit",
                    "Fit",
                    vec![RatingStatement::new("speed", "Speed matters")],
                )],
            )],
        );
        assert!(ok.check().is_ok());
    }

    #[test]
    fn condition_must_name_a_flag() {
        let q = Questionnaire::new(
            "Cond",
            vec![Step::new(
                "One",
                vec![
                    Question::text("name", "Name"),
                    Question::text("details", "Details").shown_when("name"),
                ],
            )],
        );
        assert!(matches!(q.check(), Err(SchemaError::BadCondition { .. })));
    }
}
