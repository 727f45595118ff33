//! Session: runs the wizard state machine against the outside world.
//!
//! The session feeds actions to [`transition`], then executes the returned
//! effects: scrolling goes to the [`Viewport`], delivery turns the answer
//! snapshot into a [`Payload`] and hands the host a [`DeliveryJob`]. The host
//! awaits the job wherever it likes and reports back with
//! [`Session::complete`]. Until then the session stays `InFlight` and a
//! second submit is ignored.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use intake_types::{AnswerStore, FieldKey, Questionnaire, SchemaError, Snapshot, StepView};

use crate::config::DeliverySettings;
use crate::submission::{Payload, SubmissionState, SubmitError};
use crate::transport::{DeliveryJob, TransportConfig, TransportSet};
use crate::wizard::{Action, Effect, LastError, Outcome, WizardOptions, WizardState, transition};

/// Source of submission timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Presentation hook invoked when the visible step changes.
pub trait Viewport: Send + Sync {
    fn scroll_to_top(&self);
}

/// A viewport with nothing to scroll.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopViewport;

impl Viewport for NoopViewport {
    fn scroll_to_top(&self) {}
}

/// Result of an action that may start a delivery.
#[derive(Debug)]
pub struct Dispatched {
    pub outcome: Outcome,

    /// Delivery to run, when the action started one.
    pub job: Option<DeliveryJob>,
}

/// One respondent filling in one questionnaire.
pub struct Session {
    state: WizardState,
    transports: TransportSet,
    config: TransportConfig,
    settings: DeliverySettings,
    clock: Box<dyn Clock>,
    viewport: Box<dyn Viewport>,
}

impl Session {
    /// Fails when the questionnaire is malformed, e.g. two questions share a key.
    pub fn new(
        questionnaire: Arc<Questionnaire>,
        transports: TransportSet,
        config: TransportConfig,
        settings: DeliverySettings,
    ) -> Result<Self, SchemaError> {
        questionnaire.check()?;
        let options = WizardOptions {
            allow_restart: settings.allow_restart,
        };
        Ok(Self {
            state: WizardState::new(questionnaire, options),
            transports,
            config,
            settings,
            clock: Box::new(SystemClock),
            viewport: Box::new(NoopViewport),
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_viewport(mut self, viewport: impl Viewport + 'static) -> Self {
        self.viewport = Box::new(viewport);
        self
    }

    // === State ===

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        self.state.questionnaire()
    }

    pub fn shared_questionnaire(&self) -> Arc<Questionnaire> {
        self.state.shared_questionnaire()
    }

    pub fn settings(&self) -> &DeliverySettings {
        &self.settings
    }

    pub fn answers(&self) -> &AnswerStore {
        self.state.answers()
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step()
    }

    pub fn total_steps(&self) -> usize {
        self.state.total_steps()
    }

    pub fn step_view(&self) -> Option<StepView<'_>> {
        self.state.step_view()
    }

    pub fn submission_state(&self) -> &SubmissionState {
        self.state.submission()
    }

    pub fn last_error(&self) -> Option<&LastError> {
        self.state.last_error()
    }

    pub fn progress(&self) -> f32 {
        self.state.progress()
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    // === Actions ===

    pub fn edit_field(&mut self, key: impl Into<FieldKey>, value: impl Into<String>) -> Outcome {
        self.apply(Action::EditText {
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn set_flag(&mut self, key: impl Into<FieldKey>, value: Option<bool>) -> Outcome {
        self.apply(Action::SetFlag {
            key: key.into(),
            value,
        })
    }

    pub fn toggle_option(
        &mut self,
        key: impl Into<FieldKey>,
        option: impl Into<String>,
    ) -> Outcome {
        self.apply(Action::Toggle {
            key: key.into(),
            option: option.into(),
        })
    }

    pub fn set_rating(
        &mut self,
        key: impl Into<FieldKey>,
        statement: impl Into<String>,
        score: u8,
    ) -> Outcome {
        self.apply(Action::Rate {
            key: key.into(),
            statement: statement.into(),
            score,
        })
    }

    /// Move forward, or submit when already on the summary step.
    pub fn advance(&mut self) -> Dispatched {
        self.dispatch(Action::Advance)
    }

    pub fn retreat(&mut self) -> Outcome {
        self.apply(Action::Retreat)
    }

    /// Start a submission from the summary step.
    pub fn submit(&mut self) -> Dispatched {
        self.dispatch(Action::Submit)
    }

    /// Start over after a successful submission.
    pub fn restart(&mut self) -> Outcome {
        self.apply(Action::Restart)
    }

    /// Report the result of a delivery job.
    pub fn complete(&mut self, result: Result<(), SubmitError>) -> Outcome {
        self.apply(Action::DeliveryFinished(result))
    }

    /// Submit and wait for the delivery to settle.
    pub async fn submit_and_wait(&mut self) -> Outcome {
        let dispatched = self.submit();
        self.settle(dispatched).await
    }

    /// Advance, waiting for the delivery when this submits.
    pub async fn advance_and_wait(&mut self) -> Outcome {
        let dispatched = self.advance();
        self.settle(dispatched).await
    }

    async fn settle(&mut self, dispatched: Dispatched) -> Outcome {
        if let Some(job) = dispatched.job {
            let result = job.run().await;
            self.complete(result);
        }
        dispatched.outcome
    }

    /// Run an action that cannot start a delivery.
    fn apply(&mut self, action: Action) -> Outcome {
        let dispatched = self.dispatch(action);
        debug_assert!(dispatched.job.is_none());
        dispatched.outcome
    }

    /// Feed one action to the state machine and execute its effects.
    pub fn dispatch(&mut self, action: Action) -> Dispatched {
        let from = self.state.current_step();
        tracing::debug!(?action, step = from, "dispatch");

        let result = transition(self.state.clone(), action);
        self.state = result.state;
        match &result.outcome {
            Outcome::Applied => {}
            Outcome::Ignored(reason) => tracing::debug!(?reason, "action ignored"),
            Outcome::Rejected(err) => tracing::debug!(%err, "action rejected"),
        }

        let mut job = None;
        for effect in result.effects {
            match effect {
                Effect::ScrollToTop => {
                    tracing::debug!(from, to = self.state.current_step(), "step changed");
                    self.viewport.scroll_to_top();
                }
                Effect::Deliver(snapshot) => match self.prepare(&snapshot) {
                    Ok(prepared) => job = Some(prepared),
                    Err(err) => {
                        tracing::error!(%err, "submission cannot start");
                        let finished = transition(
                            self.state.clone(),
                            Action::DeliveryFinished(Err(err)),
                        );
                        self.state = finished.state;
                    }
                },
            }
        }

        Dispatched {
            outcome: result.outcome,
            job,
        }
    }

    fn prepare(&self, snapshot: &Snapshot) -> Result<DeliveryJob, SubmitError> {
        let (kind, transport) = self.transports.resolve(&self.config)?;
        let payload = Payload::build(
            self.state.questionnaire(),
            snapshot,
            &self.settings.subject,
            self.config.destination(),
            self.clock.now(),
        );
        tracing::info!(transport = %kind, fields = payload.fields.len(), "submission prepared");
        Ok(DeliveryJob::new(
            kind,
            payload,
            self.config.clone(),
            transport,
            self.settings.timeout(),
        ))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("transports", &self.transports)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::TimeZone;
    use intake_types::{Question, Step, TextFormat};

    use super::*;
    use crate::test_transport::TestTransport;
    use crate::transport::TransportKind;

    #[derive(Clone, Default)]
    struct CountingViewport(Arc<AtomicUsize>);

    impl Viewport for CountingViewport {
        fn scroll_to_top(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn questionnaire() -> Arc<Questionnaire> {
        Arc::new(Questionnaire::new(
            "Session",
            vec![Step::new(
                "Contact",
                vec![
                    Question::text("contactName", "Contact name").required(),
                    Question::formatted("email", "Email", TextFormat::Email).required(),
                ],
            )],
        ))
    }

    fn relay_only() -> TransportConfig {
        TransportConfig {
            destination: Some("owner@example.com".into()),
            ..Default::default()
        }
    }

    fn filled(session: &mut Session) {
        session.advance();
        session.edit_field("contactName", "Dana");
        session.edit_field("email", "dana@acme.io");
        session.advance();
    }

    #[test]
    fn step_changes_scroll_the_viewport() {
        let viewport = CountingViewport::default();
        let mut session = Session::new(
            questionnaire(),
            TransportSet::new(),
            TransportConfig::default(),
            DeliverySettings::default(),
        )
        .unwrap()
        .with_viewport(viewport.clone());

        session.advance();
        session.advance(); // rejected
        session.retreat();
        assert_eq!(viewport.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn job_carries_payload_built_from_snapshot() {
        let relay = TestTransport::new(TransportKind::FormRelay);
        let now = Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0).unwrap();
        let mut session = Session::new(
            questionnaire(),
            TransportSet::new().with(relay),
            relay_only(),
            DeliverySettings::default(),
        )
        .unwrap()
        .with_clock(FixedClock(now));
        filled(&mut session);

        let job = session.submit().job.unwrap();
        session.edit_field("contactName", "Changed");

        assert_eq!(job.kind(), TransportKind::FormRelay);
        let payload = job.payload();
        assert_eq!(payload.fields["contactName"], "Dana");
        assert_eq!(payload.reply_to, "dana@acme.io");
        assert_eq!(payload.to_email, "owner@example.com");
        assert_eq!(payload.submitted_at, "2026-05-04T12:00:00.000Z");
    }

    #[test]
    fn configured_kind_without_transport_fails_immediately() {
        let mut session = Session::new(
            questionnaire(),
            TransportSet::new(),
            relay_only(),
            DeliverySettings::default(),
        )
        .unwrap();
        filled(&mut session);

        let dispatched = session.submit();
        assert!(dispatched.job.is_none());
        assert!(matches!(
            session.submission_state(),
            SubmissionState::Failed(SubmitError::Configuration(_))
        ));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let q = Arc::new(Questionnaire::new(
            "Session",
            vec![
                Step::new("Contact", vec![Question::text("email", "Email")]),
                Step::new("Again", vec![Question::flag("email", "Email me")]),
            ],
        ));
        let err = Session::new(
            q,
            TransportSet::new(),
            TransportConfig::default(),
            DeliverySettings::default(),
        )
        .err();
        assert_eq!(err, Some(SchemaError::DuplicateKey("email".into())));
    }
}
