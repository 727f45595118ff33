//! Pure wizard state machine.
//!
//! `transition` takes the current state and an action and returns the new
//! state, the effects to execute and what happened to the action. It performs
//! no I/O: scrolling and delivery are returned as `Effect`s for the session to
//! run.

use std::fmt;
use std::sync::Arc;

use intake_types::{AnswerStore, FieldKey, Questionnaire, Snapshot, StepView, StoreError};

use crate::submission::{SubmissionState, SubmitError};
use crate::validation::{self, ValidationReport};

/// Per-session switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardOptions {
    /// Offer "start over" after a successful submission.
    pub allow_restart: bool,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            allow_restart: true,
        }
    }
}

/// The error currently surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastError {
    Validation(ValidationReport),
    Submission(SubmitError),
}

impl LastError {
    pub fn message(&self) -> String {
        match self {
            Self::Validation(report) => report.message(),
            Self::Submission(err) => err.user_message(),
        }
    }
}

impl fmt::Display for LastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Everything the wizard knows about one session.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    questionnaire: Arc<Questionnaire>,
    answers: AnswerStore,
    current_step: usize,
    submission: SubmissionState,
    last_error: Option<LastError>,
    options: WizardOptions,
}

impl WizardState {
    /// A fresh session at the intro step with default answers.
    pub fn new(questionnaire: Arc<Questionnaire>, options: WizardOptions) -> Self {
        let answers = AnswerStore::new(&questionnaire);
        Self {
            questionnaire,
            answers,
            current_step: 0,
            submission: SubmissionState::Idle,
            last_error: None,
            options,
        }
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    /// The schema as a shared handle, to read while editing answers.
    pub fn shared_questionnaire(&self) -> Arc<Questionnaire> {
        Arc::clone(&self.questionnaire)
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.questionnaire.total_steps()
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn last_error(&self) -> Option<&LastError> {
        self.last_error.as_ref()
    }

    pub fn options(&self) -> WizardOptions {
        self.options
    }

    /// A successful submission makes the session exit-only.
    pub fn is_completed(&self) -> bool {
        self.submission.is_succeeded()
    }

    pub fn is_at_summary(&self) -> bool {
        self.current_step == self.total_steps()
    }

    pub fn step_view(&self) -> Option<StepView<'_>> {
        self.questionnaire.step_at(self.current_step)
    }

    /// Fraction of the wizard behind the user, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        self.current_step as f32 / self.total_steps() as f32
    }

    fn with_step(mut self, step: usize) -> Self {
        self.current_step = step;
        if matches!(self.last_error, Some(LastError::Validation(_))) {
            self.last_error = None;
        }
        self
    }

    /// Drop the surfaced validation problems of an edited key.
    fn forget_violations(&mut self, key: &FieldKey) {
        if let Some(LastError::Validation(report)) = &mut self.last_error {
            report.forget(key);
            if report.is_empty() {
                self.last_error = None;
            }
        }
    }
}

/// Something the user (or the delivery runner) did.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace a text or single choice answer.
    EditText { key: FieldKey, value: String },
    /// Answer (or un-answer) a yes/no question.
    SetFlag { key: FieldKey, value: Option<bool> },
    /// Flip one option of a multi choice question.
    Toggle { key: FieldKey, option: String },
    /// Score one statement of a rating question.
    Rate {
        key: FieldKey,
        statement: String,
        score: u8,
    },
    Advance,
    Retreat,
    Submit,
    Restart,
    /// The in-flight delivery settled.
    DeliveryFinished(Result<(), SubmitError>),
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// The visible step changed.
    ScrollToTop,
    /// Deliver these answers.
    Deliver(Snapshot),
}

/// Why an action changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The session was submitted; only restart is accepted.
    Completed,
    SubmissionInFlight,
    AtFirstStep,
    /// Submit outside the summary step.
    NotAtSummary,
    /// Restart before a successful submission.
    NotCompleted,
    RestartDisabled,
    /// A delivery result arrived with nothing in flight.
    NoSubmissionInFlight,
    /// Toggle of an unknown key or undeclared option.
    NoSuchOption,
}

/// Why an action was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationReport),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What happened to an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(IgnoreReason),
    Rejected(ActionError),
}

/// Result of a state transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: WizardState,
    pub effects: Vec<Effect>,
    pub outcome: Outcome,
}

impl Transition {
    fn applied(state: WizardState, effects: Vec<Effect>) -> Self {
        Self {
            state,
            effects,
            outcome: Outcome::Applied,
        }
    }

    fn ignored(state: WizardState, reason: IgnoreReason) -> Self {
        Self {
            state,
            effects: vec![],
            outcome: Outcome::Ignored(reason),
        }
    }

    fn rejected(state: WizardState, error: impl Into<ActionError>) -> Self {
        Self {
            state,
            effects: vec![],
            outcome: Outcome::Rejected(error.into()),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, Outcome::Applied)
    }
}

/// Pure state transition function.
pub fn transition(state: WizardState, action: Action) -> Transition {
    if state.is_completed() {
        return match action {
            Action::Restart => restart(state),
            Action::DeliveryFinished(_) => {
                Transition::ignored(state, IgnoreReason::NoSubmissionInFlight)
            }
            _ => Transition::ignored(state, IgnoreReason::Completed),
        };
    }

    match action {
        Action::EditText { key, value } => {
            edit(state, key, |answers, key| answers.set_text(key.clone(), value))
        }
        Action::SetFlag { key, value } => {
            edit(state, key, |answers, key| answers.set_flag(key.clone(), value))
        }
        Action::Rate {
            key,
            statement,
            score,
        } => edit(state, key, |answers, key| {
            answers.set_rating(key, &statement, score)
        }),
        Action::Toggle { key, option } => {
            let mut state = state;
            if state.answers.toggle_choice(&key, &option) {
                state.forget_violations(&key);
                Transition::applied(state, vec![])
            } else {
                Transition::ignored(state, IgnoreReason::NoSuchOption)
            }
        }
        Action::Advance if state.is_at_summary() => submit(state),
        Action::Advance => advance(state),
        Action::Retreat => retreat(state),
        Action::Submit => submit(state),
        Action::Restart => Transition::ignored(state, IgnoreReason::NotCompleted),
        Action::DeliveryFinished(result) => finish(state, result),
    }
}

fn edit(
    mut state: WizardState,
    key: FieldKey,
    apply: impl FnOnce(&mut AnswerStore, &FieldKey) -> Result<(), StoreError>,
) -> Transition {
    match apply(&mut state.answers, &key) {
        Ok(()) => {
            state.forget_violations(&key);
            Transition::applied(state, vec![])
        }
        Err(err) => Transition::rejected(state, err),
    }
}

fn advance(mut state: WizardState) -> Transition {
    match validation::validate_step(&state.questionnaire, state.current_step, &state.answers) {
        Ok(()) => {
            let next = state.current_step + 1;
            Transition::applied(state.with_step(next), vec![Effect::ScrollToTop])
        }
        Err(report) => {
            state.last_error = Some(LastError::Validation(report.clone()));
            Transition::rejected(state, report)
        }
    }
}

fn retreat(state: WizardState) -> Transition {
    if state.submission.is_in_flight() {
        return Transition::ignored(state, IgnoreReason::SubmissionInFlight);
    }
    match state.current_step.checked_sub(1) {
        Some(previous) => Transition::applied(state.with_step(previous), vec![Effect::ScrollToTop]),
        None => Transition::ignored(state, IgnoreReason::AtFirstStep),
    }
}

fn submit(mut state: WizardState) -> Transition {
    if state.submission.is_in_flight() {
        return Transition::ignored(state, IgnoreReason::SubmissionInFlight);
    }
    if !state.is_at_summary() {
        return Transition::ignored(state, IgnoreReason::NotAtSummary);
    }

    state.submission = SubmissionState::InFlight;
    state.last_error = None;
    let snapshot = state.answers.snapshot();
    Transition::applied(state, vec![Effect::Deliver(snapshot)])
}

fn finish(mut state: WizardState, result: Result<(), SubmitError>) -> Transition {
    if !state.submission.is_in_flight() {
        return Transition::ignored(state, IgnoreReason::NoSubmissionInFlight);
    }

    match result {
        Ok(()) => {
            state.submission = SubmissionState::Succeeded;
            state.last_error = None;
            Transition::applied(state, vec![Effect::ScrollToTop])
        }
        Err(err) => {
            state.last_error = Some(LastError::Submission(err.clone()));
            state.submission = SubmissionState::Failed(err);
            Transition::applied(state, vec![])
        }
    }
}

fn restart(state: WizardState) -> Transition {
    if !state.options.allow_restart {
        return Transition::ignored(state, IgnoreReason::RestartDisabled);
    }
    let fresh = WizardState::new(state.questionnaire, state.options);
    Transition::applied(fresh, vec![Effect::ScrollToTop])
}
