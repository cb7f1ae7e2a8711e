use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::candidate::{Candidate, CandidateStatus, CandidateStore};
use crate::error::IntakeError;
use crate::questions::{generate_questions, Question, QUESTIONS_PER_INTERVIEW};
use crate::resume::ParsedResume;
use crate::scoring::{score_answer, ScoringConfig};
use crate::summary::generate_summary;
use crate::timer::{Countdown, CountdownState};
use crate::util::capitalize;

/// Recorded as the answer when a question times out with nothing typed
pub const NO_ANSWER_MARKER: &str = "No answer provided (time expired)";

pub const WELCOME_MESSAGE: &str =
    "Welcome to the Interview Assistant! Enter the path to your resume (PDF, DOCX or plain text) to get started.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
pub enum ContactField {
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "email")]
    Email,
    #[strum(serialize = "phone")]
    Phone,
}

impl ContactField {
    pub const ALL: [ContactField; 3] = [ContactField::Name, ContactField::Email, ContactField::Phone];

    fn value<'a>(&self, resume: &'a ParsedResume) -> Option<&'a str> {
        match self {
            ContactField::Name => resume.name.as_deref(),
            ContactField::Email => resume.email.as_deref(),
            ContactField::Phone => resume.phone.as_deref(),
        }
    }

    fn slot<'a>(&self, resume: &'a mut ParsedResume) -> &'a mut Option<String> {
        match self {
            ContactField::Name => &mut resume.name,
            ContactField::Email => &mut resume.email,
            ContactField::Phone => &mut resume.phone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Author {
    Bot,
    Candidate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author: Author,
    pub text: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Idle,
    CollectingInfo,
    Active,
    Completed,
}

/// What a handler did with the event it was given
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Turn {
    Ignored,
    AskedField(ContactField),
    AskedQuestion(usize),
    Completed { score: f64 },
}

/// Collaborators every session handler needs
pub struct SessionContext<'a> {
    pub store: &'a mut CandidateStore,
    pub scoring: &'a ScoringConfig,
    pub rng: &'a mut dyn RngCore,
}

/// Progress of the interview currently on screen
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewSession {
    phase: Phase,
    candidate_id: Option<Uuid>,
    question_index: usize,
    countdown: Option<Countdown>,
    missing_fields: Vec<ContactField>,
    intake: Option<ParsedResume>,
    transcript: Vec<ChatMessage>,
    pub draft: String,
}

impl InterviewSession {
    pub fn new() -> Self {
        let mut session = Self::default();
        session.say(WELCOME_MESSAGE);
        session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn candidate_id(&self) -> Option<Uuid> {
        self.candidate_id
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn is_collecting_info(&self) -> bool {
        self.phase == Phase::CollectingInfo
    }

    pub fn timer_started(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    pub fn seconds_remaining(&self) -> Option<u32> {
        self.countdown.as_ref().map(Countdown::remaining_secs)
    }

    pub fn missing_fields(&self) -> &[ContactField] {
        &self.missing_fields
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// True when text typed in the chat is a field value or an answer
    pub fn accepts_answers(&self) -> bool {
        matches!(self.phase, Phase::CollectingInfo | Phase::Active)
    }

    pub fn current_question<'s>(&self, store: &'s CandidateStore) -> Option<&'s Question> {
        if !self.is_active() {
            return None;
        }
        self.candidate_id
            .and_then(|id| store.get(id))
            .and_then(|c| c.questions.get(self.question_index))
    }

    /// A persisted session that stopped mid-interview and can be picked up again
    pub fn is_resumable(&self, store: &CandidateStore) -> bool {
        self.is_active()
            && self
                .candidate_id
                .and_then(|id| store.get(id))
                .is_some_and(|c| c.status == CandidateStatus::InProgress)
    }

    /// Drops all progress and greets again; the store is left untouched
    pub fn restart(&mut self) {
        tracing::info!(candidate = ?self.candidate_id, "interview session restarted");
        *self = Self::new();
    }

    pub fn report_intake_error(&mut self, error: &IntakeError) {
        tracing::warn!(%error, "resume intake rejected");
        self.say(error.to_string());
    }

    pub fn push_char(&mut self, c: char) {
        self.draft.push(c);
    }

    pub fn pop_char(&mut self) {
        self.draft.pop();
    }

    /// Begins intake from a parsed resume.
    ///
    /// Asks for the first missing contact field, or goes straight to the
    /// first question when the resume already had all of them.
    pub fn start_intake(&mut self, resume: ParsedResume, ctx: &mut SessionContext<'_>) -> Turn {
        if !matches!(self.phase, Phase::Idle | Phase::Completed) {
            return Turn::Ignored;
        }

        self.reset_progress();
        let missing: Vec<ContactField> = ContactField::ALL
            .into_iter()
            .filter(|field| field.value(&resume).map_or(true, |v| v.trim().is_empty()))
            .collect();

        if missing.is_empty() {
            return self.begin_interview(resume, ctx);
        }

        tracing::debug!(?missing, "resume is missing contact fields");
        let listing = missing
            .iter()
            .map(|f| format!("• {}", capitalize(&f.to_string())))
            .collect::<Vec<_>>()
            .join("\n");
        self.say(format!(
            "Great! I've processed your resume. I need to collect some missing information:\n\n{listing}\n\nLet's start with your {}:",
            missing[0]
        ));

        let first = missing[0];
        self.missing_fields = missing;
        self.intake = Some(resume);
        self.phase = Phase::CollectingInfo;
        Turn::AskedField(first)
    }

    /// Submits the current draft
    pub fn submit(&mut self, ctx: &mut SessionContext<'_>) -> Turn {
        let text = std::mem::take(&mut self.draft);
        self.submit_text(&text, ctx)
    }

    pub fn submit_text(&mut self, text: &str, ctx: &mut SessionContext<'_>) -> Turn {
        let text = text.trim();
        if text.is_empty() {
            return Turn::Ignored;
        }

        match self.phase {
            Phase::CollectingInfo => self.fill_field(text, ctx),
            Phase::Active => self.answer(text.to_string(), text, ctx),
            Phase::Idle | Phase::Completed => Turn::Ignored,
        }
    }

    /// Advances the question countdown; an expired countdown submits on the candidate's behalf
    pub fn tick(&mut self, dt: Duration, ctx: &mut SessionContext<'_>) -> Turn {
        if !self.is_active() {
            return Turn::Ignored;
        }
        let Some(countdown) = self.countdown.as_mut() else {
            return Turn::Ignored;
        };
        if countdown.advance(dt) == CountdownState::Running {
            return Turn::Ignored;
        }

        let draft = std::mem::take(&mut self.draft);
        let draft = draft.trim();
        tracing::info!(
            index = self.question_index,
            has_draft = !draft.is_empty(),
            "question timed out"
        );
        if draft.is_empty() {
            self.answer(NO_ANSWER_MARKER.to_string(), "", ctx)
        } else {
            self.answer(draft.to_string(), draft, ctx)
        }
    }

    fn reset_progress(&mut self) {
        self.phase = Phase::Idle;
        self.candidate_id = None;
        self.question_index = 0;
        self.countdown = None;
        self.missing_fields.clear();
        self.intake = None;
        self.draft.clear();
    }

    fn fill_field(&mut self, value: &str, ctx: &mut SessionContext<'_>) -> Turn {
        self.hear(value);
        let Some(field) = self.missing_fields.first().copied() else {
            return Turn::Ignored;
        };
        self.missing_fields.remove(0);

        let mut resume = self.intake.take().unwrap_or_default();
        *field.slot(&mut resume) = Some(value.to_string());

        if let Some(next) = self.missing_fields.first().copied() {
            self.intake = Some(resume);
            self.say(format!("Great! Now I need your {next}:"));
            return Turn::AskedField(next);
        }

        self.say("Perfect! I have all the information needed. Let's proceed with your interview.");
        self.begin_interview(resume, ctx)
    }

    fn begin_interview(&mut self, resume: ParsedResume, ctx: &mut SessionContext<'_>) -> Turn {
        let ParsedResume {
            text,
            name,
            email,
            phone,
        } = resume;
        let name = name.unwrap_or_default();
        let mut candidate = Candidate::new(
            name.clone(),
            email.unwrap_or_default(),
            phone.unwrap_or_default(),
            text,
            generate_questions(&mut *ctx.rng),
        );
        candidate.status = CandidateStatus::InProgress;
        let id = ctx.store.add(candidate);
        tracing::info!(candidate = %id, "interview started");

        self.candidate_id = Some(id);
        self.phase = Phase::Active;
        self.question_index = 0;
        self.missing_fields.clear();
        self.intake = None;

        self.say(format!(
            "Hello {name}! Here's what to expect:\n\
             \n\
             • 6 questions total (2 Easy, 2 Medium, 2 Hard)\n\
             • Easy: 20 seconds, Medium: 60 seconds, Hard: 2 minutes\n\
             • If time runs out, your current answer is submitted automatically\n\
             • Each question is scored out of 10 points\n\
             \n\
             Let's start with your first question!"
        ));
        self.ask_current(ctx.store)
    }

    fn ask_current(&mut self, store: &CandidateStore) -> Turn {
        let Some(question) = self.current_question(store).cloned() else {
            return Turn::Ignored;
        };
        self.say(format!(
            "Question {}/{} - {}\n\n{}\n\nYou have {} seconds to answer. The timer starts now!",
            self.question_index + 1,
            QUESTIONS_PER_INTERVIEW,
            question.difficulty.to_string().to_uppercase(),
            question.prompt,
            question.time_limit_secs,
        ));
        self.countdown = Some(Countdown::new(question.time_limit_secs));
        Turn::AskedQuestion(self.question_index)
    }

    /// Records `recorded` as the answer while scoring `scored_text`
    fn answer(&mut self, recorded: String, scored_text: &str, ctx: &mut SessionContext<'_>) -> Turn {
        let (Some(id), Some(question)) = (
            self.candidate_id,
            self.current_question(ctx.store).cloned(),
        ) else {
            return Turn::Ignored;
        };

        let elapsed_secs = match self.countdown.take() {
            Some(countdown) if countdown.is_expired() => countdown.limit_secs(),
            Some(countdown) => countdown.elapsed_secs(),
            None => 0,
        };
        let score = score_answer(ctx.scoring, &question, scored_text, elapsed_secs);
        tracing::info!(
            candidate = %id,
            index = self.question_index,
            difficulty = %question.difficulty,
            elapsed_secs,
            score,
            "answer recorded"
        );

        self.hear(&recorded);
        ctx.store
            .record_answer(id, self.question_index, recorded, score, elapsed_secs);

        self.question_index += 1;
        if self.question_index < QUESTIONS_PER_INTERVIEW {
            self.ask_current(ctx.store)
        } else {
            self.complete(id, ctx.store)
        }
    }

    fn complete(&mut self, id: Uuid, store: &mut CandidateStore) -> Turn {
        let Some(candidate) = store.get(id) else {
            return Turn::Ignored;
        };
        let summary = generate_summary(&candidate.questions);
        store.complete(id, summary.score, summary.text.clone(), Utc::now());
        tracing::info!(candidate = %id, score = summary.score, band = %summary.band, "interview completed");

        self.phase = Phase::Completed;
        self.countdown = None;
        self.question_index = QUESTIONS_PER_INTERVIEW - 1;
        self.say(format!(
            "Interview Complete!\n\nFinal Score: {}/10\n\n{}\n\nThank you for completing the interview! Your responses have been recorded. Press Tab to see the results on the dashboard.",
            summary.score, summary.text
        ));
        Turn::Completed {
            score: summary.score,
        }
    }

    fn say(&mut self, text: impl Into<String>) {
        self.push_message(Author::Bot, text.into());
    }

    fn hear(&mut self, text: &str) {
        self.push_message(Author::Candidate, text.to_string());
    }

    fn push_message(&mut self, author: Author, text: String) {
        self.transcript.push(ChatMessage {
            author,
            text,
            at: Utc::now(),
        });
    }
}
