//! Property tests for `AnswerStore`.

use intake_types::{
    AnswerStore, Choice, FieldKey, Question, Questionnaire, RatingStatement, Step,
};
use proptest::prelude::*;

const OPTIONS: [&str; 4] = ["website", "phone", "facebook", "whatsapp"];

fn schema() -> Questionnaire {
    let options = OPTIONS
        .iter()
        .map(|value| Choice::new(*value, value.to_uppercase()))
        .collect::<Vec<_>>();
    Questionnaire::new(
        "Properties",
        vec![
            Step::new(
                "One",
                vec![
                    Question::text("businessName", "Business"),
                    Question::text("email", "Email"),
                    Question::multi_choice("inquirySources", "Sources", options.clone()),
                ],
            ),
            Step::new(
                "Two",
                vec![
                    Question::multi_choice("salesProcess", "Sales", options),
                    Question::rating(
                        "priorities",
                        "Priorities",
                        vec![
                            RatingStatement::new("speed", "Speed"),
                            RatingStatement::new("price", "Price"),
                        ],
                    ),
                    Question::flag("hasReps", "Reps?"),
                ],
            ),
        ],
    )
}

#[derive(Debug, Clone)]
enum Edit {
    Text(usize, String),
    Toggle(usize, usize),
    Rate(String, u8),
    Flag(Option<bool>),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0..2usize, ".{0,12}").prop_map(|(i, s)| Edit::Text(i, s)),
        (0..2usize, 0..OPTIONS.len()).prop_map(|(i, o)| Edit::Toggle(i, o)),
        (prop_oneof![Just("speed".to_string()), Just("price".to_string())], 1..=5u8)
            .prop_map(|(s, score)| Edit::Rate(s, score)),
        prop_oneof![Just(None), Just(Some(true)), Just(Some(false))].prop_map(Edit::Flag),
    ]
}

/// Applies the edit and returns the key it targeted.
fn apply(store: &mut AnswerStore, edit: &Edit) -> FieldKey {
    match edit {
        Edit::Text(i, value) => {
            let key = FieldKey::new(["businessName", "email"][*i]);
            store.set_text(key.clone(), value.clone()).unwrap();
            key
        }
        Edit::Toggle(i, option) => {
            let key = FieldKey::new(["inquirySources", "salesProcess"][*i]);
            store.toggle_choice(&key, OPTIONS[*option]);
            key
        }
        Edit::Rate(statement, score) => {
            let key = FieldKey::new("priorities");
            store.set_rating(&key, statement, *score).unwrap();
            key
        }
        Edit::Flag(flag) => {
            let key = FieldKey::new("hasReps");
            store.set_flag(key.clone(), *flag).unwrap();
            key
        }
    }
}

proptest! {
    #[test]
    fn toggling_twice_restores_membership(
        prefix in proptest::collection::vec(0..OPTIONS.len(), 0..6),
        option in 0..OPTIONS.len(),
    ) {
        let mut store = AnswerStore::new(&schema());
        let key = FieldKey::new("inquirySources");
        for i in prefix {
            store.toggle_choice(&key, OPTIONS[i]);
        }

        let mut before: Vec<String> = store.choices(&key).unwrap().to_vec();
        store.toggle_choice(&key, OPTIONS[option]);
        store.toggle_choice(&key, OPTIONS[option]);
        let mut after: Vec<String> = store.choices(&key).unwrap().to_vec();

        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn selections_never_hold_duplicates(toggles in proptest::collection::vec(0..OPTIONS.len(), 0..20)) {
        let mut store = AnswerStore::new(&schema());
        let key = FieldKey::new("salesProcess");
        for i in toggles {
            store.toggle_choice(&key, OPTIONS[i]);
        }
        let choices = store.choices(&key).unwrap();
        let mut unique = choices.to_vec();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), choices.len());
    }

    #[test]
    fn edits_only_touch_their_own_key(history in proptest::collection::vec(edit(), 0..8), last in edit()) {
        let mut store = AnswerStore::new(&schema());
        for e in &history {
            apply(&mut store, e);
        }
        let before = store.clone();
        let touched = apply(&mut store, &last);

        for (key, answer) in before.iter() {
            if *key != touched {
                prop_assert_eq!(store.get(key), Some(answer));
            }
        }
    }
}
