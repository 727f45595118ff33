//! Step validation gate.
//!
//! Each question step derives its rules from its question descriptors:
//! `required` questions must be answered and formatted text questions must
//! match their format when filled in. All rules of a step are evaluated
//! before reporting so the user sees every problem at once.

use std::fmt;

use intake_types::{
    Answer, AnswerStore, FieldKey, Question, QuestionKind, Questionnaire, Step, TextFormat,
};

use crate::locale;

/// A single check applied by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// The question must be answered.
    Required(FieldKey),
    /// A non-empty text answer must match the format.
    Format(FieldKey, TextFormat),
}

impl Rule {
    pub fn key(&self) -> &FieldKey {
        match self {
            Self::Required(key) | Self::Format(key, _) => key,
        }
    }
}

/// The rules a step declares, in question order.
pub fn rules(step: &Step) -> Vec<Rule> {
    let mut rules = Vec::new();
    for question in step.questions() {
        if question.is_required() {
            rules.push(Rule::Required(question.key().clone()));
        }
        if let QuestionKind::Text(text) = question.kind()
            && text.format != TextFormat::Plain
        {
            rules.push(Rule::Format(question.key().clone(), text.format));
        }
    }
    rules
}

/// What is wrong with an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    Missing,
    InvalidFormat(TextFormat),
}

/// One unmet rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub key: FieldKey,

    /// The question label, used in the message.
    pub label: String,

    pub problem: Problem,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            Problem::Missing => write!(f, "{} is required", self.label),
            Problem::InvalidFormat(format) => match format.example() {
                Some(example) => write!(
                    f,
                    "{} must be a valid {format} (e.g. {example})",
                    self.label
                ),
                None => write!(f, "{} must be a valid {format}", self.label),
            },
        }
    }
}

/// Every unmet rule of one step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.message())]
pub struct ValidationReport {
    pub step: usize,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// All violation descriptions joined into one message.
    pub fn message(&self) -> String {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(locale::ERROR_SEPARATOR)
    }

    /// Keys with at least one violation.
    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.violations.iter().map(|v| &v.key)
    }

    /// Drop the violations tied to `key`.
    pub fn forget(&mut self, key: &FieldKey) {
        self.violations.retain(|v| &v.key != key);
    }
}

/// Run the gate for wizard step `index`.
///
/// The intro and summary steps have no rules and always pass.
pub fn validate_step(
    questionnaire: &Questionnaire,
    index: usize,
    answers: &AnswerStore,
) -> Result<(), ValidationReport> {
    let Some(step) = questionnaire.question_step(index) else {
        return Ok(());
    };

    let mut violations = Vec::new();
    for rule in rules(step) {
        let Some(question) = step.questions().iter().find(|q| q.key() == rule.key()) else {
            continue;
        };
        if !answers.is_visible(question) {
            continue;
        }
        if let Some(problem) = check(&rule, question, answers) {
            violations.push(Violation {
                key: question.key().clone(),
                label: question.label(),
                problem,
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationReport {
            step: index,
            violations,
        })
    }
}

/// Run the gate for every question step, collecting the failing ones.
pub fn validate_all(questionnaire: &Questionnaire, answers: &AnswerStore) -> Vec<ValidationReport> {
    (1..questionnaire.total_steps())
        .filter_map(|index| validate_step(questionnaire, index, answers).err())
        .collect()
}

fn check(rule: &Rule, question: &Question, answers: &AnswerStore) -> Option<Problem> {
    let answer = answers.get(question.key())?;
    match rule {
        Rule::Required(_) => {
            let missing = match (question.kind(), answer) {
                (QuestionKind::Rating(rating), Answer::Rating(scores)) => rating
                    .statements
                    .iter()
                    .any(|statement| !scores.contains_key(&statement.id)),
                _ => answer.is_blank(),
            };
            missing.then_some(Problem::Missing)
        }
        Rule::Format(_, format) => match answer {
            Answer::Text(text) if !text.trim().is_empty() && !format.accepts(text) => {
                Some(Problem::InvalidFormat(*format))
            }
            _ => None,
        },
    }
}
