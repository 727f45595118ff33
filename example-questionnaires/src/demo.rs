//! A two-step questionnaire touching every question kind.

use intake::{Choice, Question, Questionnaire, RatingStatement, Step, TextFormat};

pub fn demo() -> Questionnaire {
    Questionnaire::new(
        "Coffee feedback",
        vec![
            Step::new(
                "About you",
                vec![
                    Question::text("name", "Your name").required(),
                    Question::formatted("email", "Email", TextFormat::Email).required(),
                    Question::single_choice(
                        "visits",
                        "How often do you visit?",
                        vec![
                            Choice::new("daily", "Every day"),
                            Choice::new("weekly", "Every week"),
                            Choice::new("rarely", "Now and then"),
                        ],
                    ),
                ],
            ),
            Step::new(
                "Your coffee",
                vec![
                    Question::multi_choice(
                        "drinks",
                        "What do you usually order?",
                        vec![
                            Choice::new("espresso", "Espresso"),
                            Choice::new("latte", "Latte"),
                            Choice::new("filter", "Filter coffee"),
                            Choice::new("tea", "Tea"),
                        ],
                    ),
                    Question::rating(
                        "scores",
                        "Rate us",
                        vec![
                            RatingStatement::new("taste", "Taste"),
                            RatingStatement::new("service", "Service"),
                        ],
                    )
                    .required(),
                    Question::flag("wantsNews", "Send me the newsletter"),
                    Question::multiline("comments", "Anything else?").shown_when("wantsNews"),
                ],
            )
            .with_description("Be honest"),
        ],
    )
    .with_intro("Three minutes, two screens.")
    .with_outro("Thanks for the feedback!")
}
