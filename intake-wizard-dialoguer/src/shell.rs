//! Dialoguer shell driving an intake session.

use console::{Term, style};
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Editor, FuzzySelect, Input, MultiSelect, Select};
use intake::{
    ChoiceQuestion, FlagQuestion, Outcome, Question, QuestionKind, Questionnaire, RatingQuestion,
    Session, Step, StepView, SubmissionState, TextQuestion, Viewport, normalize, validate_all,
};
use thiserror::Error;

/// Single choice questions with more options than this get a fuzzy search.
const FUZZY_THRESHOLD: usize = 8;

/// Error type for the dialoguer shell.
#[derive(Debug, Error)]
pub enum ShellError {
    /// User cancelled the questionnaire (e.g., pressed Ctrl+C or Escape).
    #[error("Questionnaire cancelled by user")]
    Cancelled,

    /// An I/O error occurred during prompting.
    #[error("Dialoguer error: {0}")]
    Dialoguer(#[from] dialoguer::Error),
}

impl ShellError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Helper to check if a dialoguer error is a cancellation (Ctrl+C / Escape)
fn prompt_error(err: dialoguer::Error) -> ShellError {
    match err {
        dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted => {
            ShellError::Cancelled
        }
        other => ShellError::Dialoguer(other),
    }
}

/// Clears the terminal when the session changes step.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearScreen;

impl Viewport for ClearScreen {
    fn scroll_to_top(&self) {
        if let Err(err) = Term::stdout().clear_screen() {
            tracing::debug!(%err, "could not clear the terminal");
        }
    }
}

/// Interactive CLI shell.
///
/// Renders any questionnaire from its schema: one screen per step, then a
/// summary with a submit action.
pub struct DialoguerShell {
    theme: Box<dyn Theme>,
}

impl Default for DialoguerShell {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DialoguerShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialoguerShell").finish_non_exhaustive()
    }
}

impl DialoguerShell {
    /// Create a shell with the colorful theme.
    pub fn new() -> Self {
        Self {
            theme: Box::new(ColorfulTheme::default()),
        }
    }

    /// Create a shell with the plain (no color) theme.
    pub fn plain() -> Self {
        Self {
            theme: Box::new(SimpleTheme),
        }
    }

    /// Drive the session until the respondent leaves.
    ///
    /// Returns after a successful submission, unless the respondent starts
    /// over.
    pub async fn run(&self, session: &mut Session) -> Result<(), ShellError> {
        let questionnaire = session.shared_questionnaire();
        loop {
            let index = session.current_step();
            match questionnaire.step_at(index) {
                Some(StepView::Intro) => self.intro(session, &questionnaire)?,
                Some(StepView::Questions(step)) => self.step(session, index, step)?,
                Some(StepView::Summary) if session.is_completed() => {
                    if !self.completed(session, &questionnaire)? {
                        return Ok(());
                    }
                }
                Some(StepView::Summary) => self.summary(session, &questionnaire).await?,
                None => return Ok(()),
            }
        }
    }

    fn intro(
        &self,
        session: &mut Session,
        questionnaire: &Questionnaire,
    ) -> Result<(), ShellError> {
        println!("{}", style(&questionnaire.title).bold().cyan());
        if let Some(intro) = &questionnaire.intro {
            println!("{intro}");
        }
        println!();

        let start = self.select("Ready?", &["Start"], 0)?;
        if start == 0 {
            session.advance();
        }
        Ok(())
    }

    fn step(&self, session: &mut Session, index: usize, step: &Step) -> Result<(), ShellError> {
        let last = session.total_steps() - 1;
        println!(
            "{} {}",
            style(format!("Step {index} of {last}:")).dim(),
            style(&step.title).bold()
        );
        if let Some(description) = &step.description {
            println!("{}", style(description).dim());
        }
        if let Some(error) = session.last_error() {
            println!("{}", style(error).red());
        }

        for question in step.questions() {
            if !session.answers().is_visible(question) {
                continue;
            }
            self.ask(session, question)?;
        }

        match self.select("Continue", &["Next", "Back"], 0)? {
            0 => {
                let dispatched = session.advance();
                if let Outcome::Rejected(err) = dispatched.outcome {
                    println!("{}", style(err).red());
                }
            }
            _ => {
                session.retreat();
            }
        }
        Ok(())
    }

    async fn summary(
        &self,
        session: &mut Session,
        questionnaire: &Questionnaire,
    ) -> Result<(), ShellError> {
        println!("{}", style("Summary").bold());
        let fields = normalize(questionnaire, &session.answers().snapshot());
        for question in questionnaire.questions() {
            if let Some(value) = fields.get(question.key().as_str())
                && !value.is_empty()
            {
                println!("{}: {}", style(question.label()).dim(), value);
            }
        }
        for report in validate_all(questionnaire, session.answers()) {
            println!(
                "{} {}",
                style(format!("Step {} is incomplete:", report.step)).yellow(),
                report.message()
            );
        }
        if let Some(error) = session.last_error() {
            println!("{}", style(error).red());
        }
        println!();

        match self.select("Send your answers?", &["Submit", "Back"], 0)? {
            0 => {
                println!("{}", style("Sending...").dim());
                session.submit_and_wait().await;
                if let SubmissionState::Failed(err) = session.submission_state() {
                    println!("{}", style(err.user_message()).red());
                }
            }
            _ => {
                session.retreat();
            }
        }
        Ok(())
    }

    /// Returns whether the respondent starts over.
    fn completed(
        &self,
        session: &mut Session,
        questionnaire: &Questionnaire,
    ) -> Result<bool, ShellError> {
        println!("{}", style("Thank you! Your answers were sent.").green().bold());
        if let Some(outro) = &questionnaire.outro {
            println!("{outro}");
        }
        if !session.settings().allow_restart {
            return Ok(false);
        }

        let again = self.select("Fill in another questionnaire?", &["No", "Yes"], 0)?;
        if again == 1 {
            session.restart();
            return Ok(true);
        }
        Ok(false)
    }

    /// Ask one question and store the answer.
    fn ask(&self, session: &mut Session, question: &Question) -> Result<(), ShellError> {
        let mut prompt = question.label();
        if question.is_required() {
            prompt.push_str(" *");
        }

        let outcome = match question.kind() {
            QuestionKind::Text(text) if text.multiline => {
                self.ask_multiline(session, question, &prompt)?
            }
            QuestionKind::Text(text) => self.ask_text(session, question, text, &prompt)?,
            QuestionKind::SingleChoice(choice) => {
                self.ask_single(session, question, choice, &prompt)?
            }
            QuestionKind::MultiChoice(choice) => {
                self.ask_multi(session, question, choice, &prompt)?
            }
            QuestionKind::Rating(rating) => self.ask_rating(session, question, rating, &prompt)?,
            QuestionKind::Flag(flag) => self.ask_flag(session, question, flag, &prompt)?,
        };

        if let Outcome::Rejected(err) = outcome {
            println!("{}", style(err).red());
        }
        Ok(())
    }

    fn ask_text(
        &self,
        session: &mut Session,
        question: &Question,
        text: &TextQuestion,
        prompt: &str,
    ) -> Result<Outcome, ShellError> {
        let current = session
            .answers()
            .text(question.key())
            .unwrap_or_default()
            .to_string();
        let prompt = match question.placeholder() {
            Some(placeholder) if current.is_empty() => format!("{prompt} ({placeholder})"),
            _ => prompt.to_string(),
        };

        let format = text.format;
        let value = Input::<String>::with_theme(self.theme.as_ref())
            .with_prompt(prompt)
            .with_initial_text(current)
            .allow_empty(true)
            .validate_with(move |value: &String| -> Result<(), String> {
                if value.trim().is_empty() || format.accepts(value) {
                    Ok(())
                } else {
                    match format.example() {
                        Some(example) => Err(format!("Enter a valid {format} (e.g. {example})")),
                        None => Err(format!("Enter a valid {format}")),
                    }
                }
            })
            .interact_text()
            .map_err(prompt_error)?;

        Ok(session.edit_field(question.key().clone(), value))
    }

    fn ask_multiline(
        &self,
        session: &mut Session,
        question: &Question,
        prompt: &str,
    ) -> Result<Outcome, ShellError> {
        println!("{prompt}");
        let current = session
            .answers()
            .text(question.key())
            .unwrap_or_default()
            .to_string();

        let value = match Editor::new().edit(&current).map_err(prompt_error)? {
            Some(value) => value.trim_end().to_string(),
            // Editor closed without saving: keep what was there
            None => current,
        };
        Ok(session.edit_field(question.key().clone(), value))
    }

    fn ask_single(
        &self,
        session: &mut Session,
        question: &Question,
        choice: &ChoiceQuestion,
        prompt: &str,
    ) -> Result<Outcome, ShellError> {
        let current = session.answers().text(question.key()).unwrap_or_default();
        let mut labels: Vec<&str> = choice.options.iter().map(|c| c.label.as_str()).collect();
        if !question.is_required() {
            labels.push("(skip)");
        }
        let default = choice
            .options
            .iter()
            .position(|c| c.value == current)
            .unwrap_or_default();

        let picked = if labels.len() > FUZZY_THRESHOLD {
            FuzzySelect::with_theme(self.theme.as_ref())
                .with_prompt(prompt)
                .items(&labels)
                .default(default)
                .interact()
                .map_err(prompt_error)?
        } else {
            self.select(prompt, &labels, default)?
        };

        let value = choice
            .options
            .get(picked)
            .map(|c| c.value.clone())
            .unwrap_or_default();
        Ok(session.edit_field(question.key().clone(), value))
    }

    fn ask_multi(
        &self,
        session: &mut Session,
        question: &Question,
        choice: &ChoiceQuestion,
        prompt: &str,
    ) -> Result<Outcome, ShellError> {
        let selected: Vec<bool> = {
            let current = session.answers().choices(question.key()).unwrap_or_default();
            choice
                .options
                .iter()
                .map(|c| current.contains(&c.value))
                .collect()
        };
        let labels: Vec<&str> = choice.options.iter().map(|c| c.label.as_str()).collect();

        let picked = MultiSelect::with_theme(self.theme.as_ref())
            .with_prompt(prompt)
            .items(&labels)
            .defaults(&selected)
            .interact()
            .map_err(prompt_error)?;

        let mut outcome = Outcome::Applied;
        for (index, option) in choice.options.iter().enumerate() {
            if picked.contains(&index) != selected[index] {
                outcome = session.toggle_option(question.key().clone(), option.value.clone());
            }
        }
        Ok(outcome)
    }

    fn ask_rating(
        &self,
        session: &mut Session,
        question: &Question,
        rating: &RatingQuestion,
        prompt: &str,
    ) -> Result<Outcome, ShellError> {
        println!("{prompt}");
        let scale: Vec<String> = (RatingQuestion::MIN..=RatingQuestion::MAX)
            .map(|score| score.to_string())
            .collect();

        let mut outcome = Outcome::Applied;
        for statement in &rating.statements {
            let current = session
                .answers()
                .ratings(question.key())
                .ok()
                .and_then(|scores| scores.get(&statement.id).copied());
            let default = current
                .map(|score| usize::from(score - RatingQuestion::MIN))
                .unwrap_or(scale.len() / 2);

            let picked = self.select(&statement.text, &scale, default)?;
            let score = RatingQuestion::MIN.saturating_add(u8::try_from(picked).unwrap_or(0));
            outcome = session.set_rating(question.key().clone(), statement.id.clone(), score);
            if matches!(outcome, Outcome::Rejected(_)) {
                break;
            }
        }
        Ok(outcome)
    }

    fn ask_flag(
        &self,
        session: &mut Session,
        question: &Question,
        flag: &FlagQuestion,
        prompt: &str,
    ) -> Result<Outcome, ShellError> {
        let current = session.answers().flag(question.key()).ok().flatten();
        let default = if current == Some(false) { 1 } else { 0 };
        let picked = self.select(prompt, &[&flag.yes_label, &flag.no_label], default)?;
        Ok(session.set_flag(question.key().clone(), Some(picked == 0)))
    }

    fn select<T: ToString>(
        &self,
        prompt: &str,
        items: &[T],
        default: usize,
    ) -> Result<usize, ShellError> {
        Select::with_theme(self.theme.as_ref())
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }
}
