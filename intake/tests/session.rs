//! Integration tests for intake sessions

use std::sync::Arc;
use std::time::Duration;

use intake::{
    ActionError, Choice, DeliverySettings, IgnoreReason, LastError, Outcome, Question,
    Questionnaire, RatingStatement, Session, Step, SubmissionState, SubmitError, TestTransport,
    TextFormat, TransportConfig, TransportKind, TransportSet, locale,
};

fn questionnaire() -> Arc<Questionnaire> {
    Arc::new(
        Questionnaire::new(
            "Business intake",
            vec![
                Step::new(
                    "General details",
                    vec![
                        Question::text("businessName", "Business name").required(),
                        Question::text("contactName", "Contact name").required(),
                        Question::formatted("email", "Email", TextFormat::Email).required(),
                        Question::formatted("phone", "Phone", TextFormat::Phone),
                    ],
                ),
                Step::new(
                    "Goals",
                    vec![
                        Question::multi_choice(
                            "leadGoals",
                            "What should the bot achieve?",
                            vec![
                                Choice::new("increase-sales", "More sales"),
                                Choice::new("save-time", "Save time"),
                            ],
                        ),
                        Question::rating(
                            "priorities",
                            "How important is each of these?",
                            vec![
                                RatingStatement::new("speed", "Fast replies"),
                                RatingStatement::new("tone", "Friendly tone"),
                            ],
                        ),
                        Question::flag("hasKPIs", "Do you track KPIs?"),
                    ],
                ),
            ],
        )
        .with_intro("A few questions about your business"),
    )
}

fn email_config() -> TransportConfig {
    TransportConfig {
        service_id: Some("service_x".into()),
        template_id: Some("template_y".into()),
        public_key: Some("pk_z".into()),
        ..Default::default()
    }
}

fn everything_config() -> TransportConfig {
    TransportConfig {
        webhook_url: Some("https://hooks.example.com/intake".into()),
        destination: Some("owner@example.com".into()),
        ..email_config()
    }
}

fn session(config: TransportConfig, transports: TransportSet) -> Session {
    Session::new(
        questionnaire(),
        transports,
        config,
        DeliverySettings::default(),
    )
    .unwrap()
}

fn all_transports() -> (TestTransport, TestTransport, TestTransport, TransportSet) {
    let email = TestTransport::new(TransportKind::TransactionalEmail);
    let webhook = TestTransport::new(TransportKind::Webhook);
    let relay = TestTransport::new(TransportKind::FormRelay);
    let set = TransportSet::new()
        .with(email.clone())
        .with(webhook.clone())
        .with(relay.clone());
    (email, webhook, relay, set)
}

/// Fill the contact step and walk to the summary.
fn walk_to_summary(session: &mut Session) {
    session.advance();
    session.edit_field("businessName", "Acme");
    session.edit_field("contactName", "Dana Levi");
    session.edit_field("email", "dana@acme.io");
    assert_eq!(session.advance().outcome, Outcome::Applied);
    session.toggle_option("leadGoals", "save-time");
    session.set_rating("priorities", "speed", 5);
    session.set_flag("hasKPIs", Some(true));
    assert_eq!(session.advance().outcome, Outcome::Applied);
    assert_eq!(session.current_step(), session.total_steps());
}

#[test]
fn fresh_session_defines_every_answer() {
    let session = session(TransportConfig::default(), TransportSet::new());
    for question in session.questionnaire().questions() {
        assert_eq!(
            session.answers().get(question.key()),
            Some(&question.default_answer()),
            "{}",
            question.key()
        );
    }
    assert_eq!(session.current_step(), 0);
    assert_eq!(session.submission_state(), &SubmissionState::Idle);
    assert!(session.last_error().is_none());
}

#[test]
fn every_empty_required_field_is_reported() {
    let mut session = session(TransportConfig::default(), TransportSet::new());
    session.advance();
    let outcome = session.advance().outcome;

    let Outcome::Rejected(ActionError::Validation(report)) = &outcome else {
        panic!("expected a validation failure, got {outcome:?}");
    };
    assert_eq!(report.violations.len(), 3);
    let message = session.last_error().unwrap().message();
    for label in ["Business name", "Contact name", "Email"] {
        assert!(message.contains(label), "{message} should mention {label}");
    }
}

#[test]
fn failing_gate_never_moves_forward() {
    let mut session = session(TransportConfig::default(), TransportSet::new());
    session.advance();
    for _ in 0..3 {
        session.advance();
        assert_eq!(session.current_step(), 1);
    }
    session.edit_field("businessName", "Acme");
    session.advance();
    assert_eq!(session.current_step(), 1);
}

#[test]
fn retreat_always_steps_back_and_keeps_answers() {
    let mut session = session(TransportConfig::default(), TransportSet::new());
    walk_to_summary(&mut session);

    for expected in (0..session.total_steps()).rev() {
        assert_eq!(session.retreat(), Outcome::Applied);
        assert_eq!(session.current_step(), expected);
    }
    assert_eq!(session.retreat(), Outcome::Ignored(IgnoreReason::AtFirstStep));

    let answers = session.answers();
    assert_eq!(answers.text(&"contactName".into()).unwrap(), "Dana Levi");
    assert_eq!(answers.choices(&"leadGoals".into()).unwrap(), &["save-time".to_string()]);
    assert_eq!(answers.flag(&"hasKPIs".into()).unwrap(), Some(true));
}

#[test]
fn retreat_ignores_a_failing_gate() {
    let mut session = session(TransportConfig::default(), TransportSet::new());
    session.advance();
    session.advance();
    assert!(session.last_error().is_some());
    assert_eq!(session.retreat(), Outcome::Applied);
    assert_eq!(session.current_step(), 0);
}

#[test]
fn scenario_missing_contact_fields() {
    let q = Arc::new(Questionnaire::new(
        "Contact",
        vec![Step::new(
            "Contact",
            vec![
                Question::text("contactName", "").required(),
                Question::formatted("email", "", TextFormat::Email).required(),
            ],
        )],
    ));
    let mut session = Session::new(
        q,
        TransportSet::new(),
        TransportConfig::default(),
        DeliverySettings::default(),
    )
    .unwrap();
    session.advance();
    session.advance();

    assert_eq!(session.current_step(), 1);
    let message = session.last_error().unwrap().message();
    assert!(message.contains("Contact Name"));
    assert!(message.contains("Email"));
    assert!(message.contains(locale::ERROR_SEPARATOR));
}

#[test]
fn scenario_malformed_email() {
    let mut session = session(TransportConfig::default(), TransportSet::new());
    session.advance();
    session.edit_field("businessName", "Acme");
    session.edit_field("contactName", "Dana");
    session.edit_field("email", "not-an-email");
    session.advance();

    assert_eq!(session.current_step(), 1);
    let Some(LastError::Validation(report)) = session.last_error() else {
        panic!("expected a validation error");
    };
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].key.as_str(), "email");
    assert!(report.message().contains("valid email address"));
}

#[tokio::test]
async fn scenario_nothing_configured() {
    let (email, webhook, relay, transports) = all_transports();
    let mut session = session(TransportConfig::default(), transports);
    walk_to_summary(&mut session);

    let dispatched = session.submit();
    assert_eq!(dispatched.outcome, Outcome::Applied);
    assert!(dispatched.job.is_none());

    let SubmissionState::Failed(err) = session.submission_state() else {
        panic!("expected a failed submission");
    };
    assert_eq!(err, &SubmitError::Configuration(locale::NO_DESTINATION.into()));
    assert_eq!(session.last_error().unwrap().message(), locale::NO_DESTINATION);
    assert_eq!(email.calls() + webhook.calls() + relay.calls(), 0);
}

#[tokio::test]
async fn scenario_email_success_then_restart() {
    let (email, _, _, transports) = all_transports();
    let mut session = session(email_config(), transports);
    walk_to_summary(&mut session);

    assert_eq!(session.submit_and_wait().await, Outcome::Applied);
    assert_eq!(session.submission_state(), &SubmissionState::Succeeded);
    assert!(session.is_completed());
    assert_eq!(email.calls(), 1);

    assert_eq!(session.restart(), Outcome::Applied);
    assert_eq!(session.current_step(), 0);
    assert_eq!(session.submission_state(), &SubmissionState::Idle);
    for question in session.questionnaire().questions() {
        assert_eq!(
            session.answers().get(question.key()),
            Some(&question.default_answer())
        );
    }
}

#[tokio::test]
async fn email_wins_over_every_other_transport() {
    let (email, webhook, relay, transports) = all_transports();
    let mut session = session(everything_config(), transports);
    walk_to_summary(&mut session);
    session.submit_and_wait().await;

    assert_eq!(email.calls(), 1);
    assert_eq!(webhook.calls(), 0);
    assert_eq!(relay.calls(), 0);
}

#[tokio::test]
async fn email_failure_does_not_fall_back() {
    let email = TestTransport::new(TransportKind::TransactionalEmail).failing("HTTP 400");
    let webhook = TestTransport::new(TransportKind::Webhook);
    let transports = TransportSet::new().with(email.clone()).with(webhook.clone());
    let mut session = session(everything_config(), transports);
    walk_to_summary(&mut session);
    session.submit_and_wait().await;

    assert_eq!(
        session.submission_state(),
        &SubmissionState::Failed(SubmitError::Transport("HTTP 400".into()))
    );
    assert_eq!(session.last_error().unwrap().message(), locale::SEND_FAILED);
    assert_eq!(webhook.calls(), 0);
}

#[tokio::test]
async fn submit_while_in_flight_is_ignored() {
    let (email, _, _, transports) = all_transports();
    let mut session = session(email_config(), transports);
    walk_to_summary(&mut session);

    let first = session.submit();
    let job = first.job.expect("first submit starts a delivery");
    let second = session.submit();
    assert_eq!(second.outcome, Outcome::Ignored(IgnoreReason::SubmissionInFlight));
    assert!(second.job.is_none());
    let third = session.advance();
    assert!(third.job.is_none());

    let result = job.run().await;
    session.complete(result);
    assert_eq!(email.calls(), 1);
    assert_eq!(session.submission_state(), &SubmissionState::Succeeded);
}

#[tokio::test]
async fn failed_submission_keeps_answers_for_retry() {
    let webhook = TestTransport::new(TransportKind::Webhook).failing("HTTP 502");
    let mut session = session(
        TransportConfig {
            webhook_url: Some("https://hooks.example.com/intake".into()),
            ..Default::default()
        },
        TransportSet::new().with(webhook.clone()),
    );
    walk_to_summary(&mut session);

    session.submit_and_wait().await;
    assert!(session.submission_state().error().unwrap().is_retryable());
    assert_eq!(session.answers().text(&"businessName".into()).unwrap(), "Acme");

    session.advance_and_wait().await;
    assert_eq!(webhook.calls(), 2);
    let payloads = webhook.payloads();
    assert_eq!(payloads[0].fields, payloads[1].fields);
}

#[tokio::test(start_paused = true)]
async fn slow_transport_times_out() {
    let email = TestTransport::new(TransportKind::TransactionalEmail)
        .with_delay(Duration::from_secs(60));
    let mut session = session(email_config(), TransportSet::new().with(email.clone()));
    walk_to_summary(&mut session);

    session.submit_and_wait().await;

    assert_eq!(
        session.submission_state(),
        &SubmissionState::Failed(SubmitError::Timeout(Duration::from_secs(15)))
    );
    assert_eq!(session.last_error().unwrap().message(), locale::SEND_TIMED_OUT);
    assert_eq!(email.calls(), 1);
}

#[tokio::test]
async fn payload_is_normalized() {
    let (email, _, _, transports) = all_transports();
    let mut session = session(email_config(), transports);
    walk_to_summary(&mut session);
    session.submit_and_wait().await;

    let payload = email.last_payload().unwrap();
    assert_eq!(payload.subject, locale::DEFAULT_SUBJECT);
    assert_eq!(payload.reply_to, "dana@acme.io");
    assert_eq!(payload.fields["leadGoals"], "save-time");
    assert_eq!(payload.fields["priorities"], "Fast replies: 5/5");
    assert_eq!(payload.fields["hasKPIs"], "Yes");
    assert_eq!(payload.fields["phone"], "");
    assert!(payload.table_html.contains("Dana Levi"));
}
