use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use crate::{Answer, FieldKey, Question, QuestionKind, Questionnaire, RatingQuestion, StoreError};

/// Current answers of one questionnaire session.
///
/// Every key of the schema holds a value from construction on (empty text,
/// empty selection, empty rating map or unanswered flag), so lookups of schema
/// keys never miss. Edits are key-scoped: changing one answer never touches
/// another.
#[derive(Debug, Clone)]
pub struct AnswerStore {
    values: HashMap<FieldKey, Answer>,
    kinds: Arc<HashMap<FieldKey, QuestionKind>>,
}

impl AnswerStore {
    /// Create a store holding the default answer for every question.
    pub fn new(questionnaire: &Questionnaire) -> Self {
        let kinds: HashMap<FieldKey, QuestionKind> = questionnaire
            .questions()
            .map(|q| (q.key().clone(), q.kind().clone()))
            .collect();
        let values = questionnaire
            .questions()
            .map(|q| (q.key().clone(), q.default_answer()))
            .collect();
        Self {
            values,
            kinds: Arc::new(kinds),
        }
    }

    /// Put every answer back to its default.
    pub fn reset(&mut self) {
        for (key, kind) in self.kinds.iter() {
            self.values.insert(key.clone(), kind.default_answer());
        }
    }

    /// Get the answer for a key. Always `Some` for keys of the schema.
    pub fn get(&self, key: &FieldKey) -> Option<&Answer> {
        self.values.get(key)
    }

    /// Check if the schema has a question with this key.
    pub fn contains(&self, key: &FieldKey) -> bool {
        self.values.contains_key(key)
    }

    /// Get an iterator over all key-answer pairs (unordered).
    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &Answer)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Take an immutable copy for submission.
    ///
    /// Later edits to this store do not show up in the snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(Arc::new(self.clone()))
    }

    // === Typed accessors ===

    /// Get a text (or single choice) answer.
    pub fn text(&self, key: &FieldKey) -> Result<&str, StoreError> {
        match self.get(key) {
            Some(Answer::Text(s)) => Ok(s),
            Some(other) => Err(mismatch(key, "Text", other)),
            None => Err(StoreError::UnknownKey(key.clone())),
        }
    }

    /// Get the selected options of a multi choice answer.
    pub fn choices(&self, key: &FieldKey) -> Result<&[String], StoreError> {
        match self.get(key) {
            Some(Answer::MultiChoice(choices)) => Ok(choices),
            Some(other) => Err(mismatch(key, "MultiChoice", other)),
            None => Err(StoreError::UnknownKey(key.clone())),
        }
    }

    /// Get the scores of a rating answer, keyed by statement id.
    pub fn ratings(&self, key: &FieldKey) -> Result<&HashMap<String, u8>, StoreError> {
        match self.get(key) {
            Some(Answer::Rating(scores)) => Ok(scores),
            Some(other) => Err(mismatch(key, "Rating", other)),
            None => Err(StoreError::UnknownKey(key.clone())),
        }
    }

    /// Get a flag answer; `None` means not answered yet.
    pub fn flag(&self, key: &FieldKey) -> Result<Option<bool>, StoreError> {
        match self.get(key) {
            Some(Answer::Flag(flag)) => Ok(*flag),
            Some(other) => Err(mismatch(key, "Flag", other)),
            None => Err(StoreError::UnknownKey(key.clone())),
        }
    }

    /// Whether a question is currently visible.
    ///
    /// Questions with a `shown_when` flag are visible only while that flag is "yes".
    pub fn is_visible(&self, question: &Question) -> bool {
        match question.condition() {
            Some(flag) => matches!(self.flag(flag), Ok(Some(true))),
            None => true,
        }
    }

    // === Mutations ===

    /// Replace a text or single choice answer.
    ///
    /// Single choice answers accept a declared option value or the empty string.
    pub fn set_text(
        &mut self,
        key: impl Into<FieldKey>,
        value: impl Into<String>,
    ) -> Result<(), StoreError> {
        let key = key.into();
        let value = value.into();
        match self.kinds.get(&key) {
            Some(QuestionKind::Text(_)) => {}
            Some(QuestionKind::SingleChoice(choice)) => {
                if !value.is_empty() && !choice.offers(&value) {
                    return Err(StoreError::UnknownOption { key, option: value });
                }
            }
            Some(other) => {
                return Err(StoreError::TypeMismatch {
                    key,
                    expected: other.name(),
                    actual: "Text",
                });
            }
            None => return Err(StoreError::UnknownKey(key)),
        }
        self.values.insert(key, Answer::Text(value));
        Ok(())
    }

    /// Replace a flag answer. `None` marks it unanswered again.
    pub fn set_flag(
        &mut self,
        key: impl Into<FieldKey>,
        value: Option<bool>,
    ) -> Result<(), StoreError> {
        let key = key.into();
        match self.kinds.get(&key) {
            Some(QuestionKind::Flag(_)) => {}
            Some(other) => {
                return Err(StoreError::TypeMismatch {
                    key,
                    expected: other.name(),
                    actual: "Flag",
                });
            }
            None => return Err(StoreError::UnknownKey(key)),
        }
        self.values.insert(key, Answer::Flag(value));
        Ok(())
    }

    /// Replace a scalar answer (`Text` or `Flag`).
    pub fn set_scalar(&mut self, key: impl Into<FieldKey>, value: Answer) -> Result<(), StoreError> {
        let key = key.into();
        match value {
            Answer::Text(text) => self.set_text(key, text),
            Answer::Flag(flag) => self.set_flag(key, flag),
            other => Err(StoreError::TypeMismatch {
                key,
                expected: "Text or Flag",
                actual: other.type_name(),
            }),
        }
    }

    /// Select `option` if it is not selected, deselect it otherwise.
    ///
    /// Returns whether the selection changed. Unknown keys, keys of other
    /// kinds and undeclared options leave the store untouched.
    pub fn toggle_choice(&mut self, key: &FieldKey, option: &str) -> bool {
        let Some(QuestionKind::MultiChoice(choice)) = self.kinds.get(key) else {
            return false;
        };
        if !choice.offers(option) {
            return false;
        }
        let Some(Answer::MultiChoice(selected)) = self.values.get_mut(key) else {
            return false;
        };

        if let Some(pos) = selected.iter().position(|s| s == option) {
            selected.remove(pos);
        } else {
            selected.push(option.to_string());
        }
        true
    }

    /// Score one statement of a rating question.
    pub fn set_rating(
        &mut self,
        key: &FieldKey,
        statement: &str,
        score: u8,
    ) -> Result<(), StoreError> {
        let rating = self.rating_question(key)?;
        if !(RatingQuestion::MIN..=RatingQuestion::MAX).contains(&score) {
            return Err(StoreError::RatingOutOfRange {
                key: key.clone(),
                score,
            });
        }
        if rating.statement(statement).is_none() {
            return Err(StoreError::UnknownStatement {
                key: key.clone(),
                statement: statement.to_string(),
            });
        }

        if let Some(Answer::Rating(scores)) = self.values.get_mut(key) {
            scores.insert(statement.to_string(), score);
        }
        Ok(())
    }

    /// Remove the score of one statement. Returns whether it was rated.
    pub fn clear_rating(&mut self, key: &FieldKey, statement: &str) -> Result<bool, StoreError> {
        self.rating_question(key)?;
        match self.values.get_mut(key) {
            Some(Answer::Rating(scores)) => Ok(scores.remove(statement).is_some()),
            _ => Ok(false),
        }
    }

    fn rating_question(&self, key: &FieldKey) -> Result<&RatingQuestion, StoreError> {
        match self.kinds.get(key) {
            Some(QuestionKind::Rating(rating)) => Ok(rating),
            Some(other) => Err(StoreError::TypeMismatch {
                key: key.clone(),
                expected: other.name(),
                actual: "Rating",
            }),
            None => Err(StoreError::UnknownKey(key.clone())),
        }
    }
}

impl PartialEq for AnswerStore {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

fn mismatch(key: &FieldKey, expected: &'static str, actual: &Answer) -> StoreError {
    StoreError::TypeMismatch {
        key: key.clone(),
        expected,
        actual: actual.type_name(),
    }
}

/// Read-only copy of an `AnswerStore`, taken at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Arc<AnswerStore>);

impl Deref for Snapshot {
    type Target = AnswerStore;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Choice, RatingStatement, Step};

    fn schema() -> Questionnaire {
        Questionnaire::new(
            "Test",
            vec![
                Step::new(
                    "Contact",
                    vec![
                        Question::text("contactName", "Name"),
                        Question::single_choice(
                            "preferredContact",
                            "Contact by",
                            vec![Choice::new("email", "Email"), Choice::new("phone", "Phone")],
                        ),
                    ],
                ),
                Step::new(
                    "Goals",
                    vec![
                        Question::multi_choice(
                            "leadGoals",
                            "Goals",
                            vec![
                                Choice::new("increase-sales", "More sales"),
                                Choice::new("automation", "Automation"),
                            ],
                        ),
                        Question::rating(
                            "priorities",
                            "Priorities",
                            vec![
                                RatingStatement::new("speed", "Fast replies"),
                                RatingStatement::new("tone", "Friendly tone"),
                            ],
                        ),
                        Question::flag("hasKPIs", "KPIs?"),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn every_key_has_a_default() {
        let q = schema();
        let store = AnswerStore::new(&q);
        assert_eq!(store.len(), 5);
        for question in q.questions() {
            assert_eq!(store.get(question.key()), Some(&question.default_answer()));
        }
    }

    #[test]
    fn set_text_and_read_back() {
        let mut store = AnswerStore::new(&schema());
        store.set_text("contactName", "Dana").unwrap();
        assert_eq!(store.text(&"contactName".into()).unwrap(), "Dana");
    }

    #[test]
    fn single_choice_accepts_only_declared_options() {
        let mut store = AnswerStore::new(&schema());
        store.set_text("preferredContact", "phone").unwrap();
        assert!(matches!(
            store.set_text("preferredContact", "pigeon"),
            Err(StoreError::UnknownOption { .. })
        ));
        assert_eq!(store.text(&"preferredContact".into()).unwrap(), "phone");
        store.set_text("preferredContact", "").unwrap();
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut store = AnswerStore::new(&schema());
        let key = FieldKey::new("leadGoals");
        assert!(store.toggle_choice(&key, "automation"));
        assert!(store.toggle_choice(&key, "increase-sales"));
        assert_eq!(
            store.choices(&key).unwrap(),
            &["automation".to_string(), "increase-sales".to_string()]
        );
        assert!(store.toggle_choice(&key, "automation"));
        assert_eq!(store.choices(&key).unwrap(), &["increase-sales".to_string()]);
    }

    #[test]
    fn toggle_on_unknown_key_or_option_is_noop() {
        let mut store = AnswerStore::new(&schema());
        let before = store.clone();
        assert!(!store.toggle_choice(&"nope".into(), "automation"));
        assert!(!store.toggle_choice(&"leadGoals".into(), "world-domination"));
        assert!(!store.toggle_choice(&"contactName".into(), "automation"));
        assert_eq!(store, before);
    }

    #[test]
    fn rating_range_is_enforced() {
        let mut store = AnswerStore::new(&schema());
        let key = FieldKey::new("priorities");
        store.set_rating(&key, "speed", 5).unwrap();
        store.set_rating(&key, "speed", 1).unwrap();

        let err = store.set_rating(&key, "speed", 6).unwrap_err();
        assert!(err.is_range_error());
        let err = store.set_rating(&key, "speed", 0).unwrap_err();
        assert!(err.is_range_error());

        assert_eq!(store.ratings(&key).unwrap().get("speed"), Some(&1));
        assert_eq!(store.ratings(&key).unwrap().get("tone"), None);
    }

    #[test]
    fn rating_rejects_unknown_statement() {
        let mut store = AnswerStore::new(&schema());
        let err = store
            .set_rating(&"priorities".into(), "price", 3)
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownStatement { .. }));
    }

    #[test]
    fn clear_rating_unrates() {
        let mut store = AnswerStore::new(&schema());
        let key = FieldKey::new("priorities");
        store.set_rating(&key, "tone", 4).unwrap();
        assert!(store.clear_rating(&key, "tone").unwrap());
        assert!(!store.clear_rating(&key, "tone").unwrap());
        assert!(store.ratings(&key).unwrap().is_empty());
    }

    #[test]
    fn flag_is_tri_state() {
        let mut store = AnswerStore::new(&schema());
        let key = FieldKey::new("hasKPIs");
        assert_eq!(store.flag(&key).unwrap(), None);
        store.set_flag("hasKPIs", Some(false)).unwrap();
        assert_eq!(store.flag(&key).unwrap(), Some(false));
        store.set_scalar("hasKPIs", Answer::Flag(Some(true))).unwrap();
        assert_eq!(store.flag(&key).unwrap(), Some(true));
    }

    #[test]
    fn type_mismatch_error() {
        let mut store = AnswerStore::new(&schema());
        assert!(matches!(
            store.set_text("hasKPIs", "yes"),
            Err(StoreError::TypeMismatch { .. })
        ));
        assert!(matches!(
            store.text(&"leadGoals".into()),
            Err(StoreError::TypeMismatch { .. })
        ));
        assert!(matches!(
            store.set_text("missing", "x"),
            Err(StoreError::UnknownKey(_))
        ));
    }

    #[test]
    fn snapshot_is_isolated_from_later_edits() {
        let mut store = AnswerStore::new(&schema());
        store.set_text("contactName", "Dana").unwrap();
        let snapshot = store.snapshot();
        store.set_text("contactName", "Noa").unwrap();
        store.toggle_choice(&"leadGoals".into(), "automation");

        assert_eq!(snapshot.text(&"contactName".into()).unwrap(), "Dana");
        assert!(snapshot.choices(&"leadGoals".into()).unwrap().is_empty());
    }

    #[test]
    fn reset_restores_defaults() {
        let q = schema();
        let mut store = AnswerStore::new(&q);
        store.set_text("contactName", "Dana").unwrap();
        store.set_flag("hasKPIs", Some(true)).unwrap();
        store.reset();
        assert_eq!(store, AnswerStore::new(&q));
    }
}
