use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use std::path::Path;
use std::time::Duration;

use crate::candidate::{Candidate, CandidateStore, SortBy};
use crate::config::Config;
use crate::error::StoreError;
use crate::resume::parse_resume;
use crate::session::{InterviewSession, Phase, SessionContext, Turn};
use crate::storage::SnapshotDb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Tab {
    #[default]
    Interviewee,
    Interviewer,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Interviewee, Tab::Interviewer];

    pub fn toggle(self) -> Self {
        match self {
            Tab::Interviewee => Tab::Interviewer,
            Tab::Interviewer => Tab::Interviewee,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub search: String,
    pub sort_by: SortBy,
    pub selected: usize,
    pub viewing_detail: bool,
}

/// Whether the main loop keeps going after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub store: CandidateStore,
    pub session: InterviewSession,
    pub tab: Tab,
    pub dashboard: DashboardState,
    pub show_welcome_back: bool,
    pub config: Config,
    rng: StdRng,
    db: Option<SnapshotDb>,
}

impl App {
    /// Fresh state that is never written anywhere
    pub fn new(config: Config, rng: StdRng) -> Self {
        Self {
            store: CandidateStore::new(),
            session: InterviewSession::new(),
            tab: Tab::default(),
            dashboard: DashboardState::default(),
            show_welcome_back: false,
            config,
            rng,
            db: None,
        }
    }

    /// Restores the last snapshot from `db` and keeps writing to it
    pub fn with_db(config: Config, rng: StdRng, db: SnapshotDb) -> Result<Self, StoreError> {
        let (store, session) = db.load_state()?;
        let show_welcome_back = session.is_resumable(&store);
        tracing::info!(
            candidates = store.len(),
            phase = ?session.phase(),
            show_welcome_back,
            "state restored"
        );
        Ok(Self {
            store,
            session,
            show_welcome_back,
            db: Some(db),
            ..Self::new(config, rng)
        })
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Control::Quit;
        }

        if self.show_welcome_back {
            match key.code {
                KeyCode::Char('c') => self.continue_interview(),
                KeyCode::Char('s') => self.start_over(),
                _ => {}
            }
            return Control::Continue;
        }

        if key.code == KeyCode::Tab {
            self.tab = self.tab.toggle();
            return Control::Continue;
        }

        match self.tab {
            Tab::Interviewee => self.on_chat_key(key),
            Tab::Interviewer => self.on_dashboard_key(key),
        }
        Control::Continue
    }

    /// Advances the question countdown by `dt` of wall time
    pub fn on_tick(&mut self, dt: Duration) {
        if self.show_welcome_back {
            return;
        }
        let mut ctx = SessionContext {
            store: &mut self.store,
            scoring: &self.config.scoring,
            rng: &mut self.rng,
        };
        if self.session.tick(dt, &mut ctx) != Turn::Ignored {
            self.persist();
        }
    }

    /// Reads the resume at `path` and starts intake, or reports why it can't
    pub fn submit_resume_path(&mut self, path: &str) {
        let path = path.trim().trim_matches(|c| c == '"' || c == '\'');
        if path.is_empty() {
            return;
        }
        match parse_resume(Path::new(path), self.config.max_resume_bytes) {
            Ok(resume) => {
                let mut ctx = SessionContext {
                    store: &mut self.store,
                    scoring: &self.config.scoring,
                    rng: &mut self.rng,
                };
                self.session.start_intake(resume, &mut ctx);
            }
            Err(error) => self.session.report_intake_error(&error),
        }
        self.persist();
    }

    /// Starts over with the resume at `path`, abandoning any unfinished session
    pub fn start_with_resume(&mut self, path: &str) {
        self.show_welcome_back = false;
        self.tab = Tab::Interviewee;
        if self.session.accepts_answers() {
            self.session.restart();
        }
        self.submit_resume_path(path);
    }

    pub fn continue_interview(&mut self) {
        tracing::info!(candidate = ?self.session.candidate_id(), "continuing interview");
        self.show_welcome_back = false;
        self.tab = Tab::Interviewee;
    }

    pub fn start_over(&mut self) {
        self.show_welcome_back = false;
        self.session.restart();
        self.tab = Tab::Interviewee;
        self.persist();
    }

    /// Candidates as the dashboard lists them right now
    pub fn visible_candidates(&self) -> Vec<&Candidate> {
        self.store
            .search(&self.dashboard.search, self.dashboard.sort_by)
    }

    pub fn selected_candidate(&self) -> Option<&Candidate> {
        let visible = self.visible_candidates();
        let last = visible.len().checked_sub(1)?;
        visible.get(self.dashboard.selected.min(last)).copied()
    }

    fn on_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_draft(),
            KeyCode::Backspace => self.session.pop_char(),
            KeyCode::Char(c) => self.session.push_char(c),
            _ => {}
        }
    }

    fn submit_draft(&mut self) {
        match self.session.phase() {
            Phase::Idle | Phase::Completed => {
                let path = std::mem::take(&mut self.session.draft);
                self.submit_resume_path(&path);
            }
            Phase::CollectingInfo | Phase::Active => {
                let mut ctx = SessionContext {
                    store: &mut self.store,
                    scoring: &self.config.scoring,
                    rng: &mut self.rng,
                };
                if self.session.submit(&mut ctx) != Turn::Ignored {
                    self.persist();
                }
            }
        }
    }

    fn on_dashboard_key(&mut self, key: KeyEvent) {
        let listed = self.visible_candidates().len();
        let dash = &mut self.dashboard;
        match key.code {
            KeyCode::Up => dash.selected = dash.selected.saturating_sub(1),
            KeyCode::Down => {
                if dash.selected + 1 < listed {
                    dash.selected += 1;
                }
            }
            KeyCode::Enter => dash.viewing_detail = listed > 0,
            KeyCode::Left => dash.viewing_detail = false,
            KeyCode::Backspace if dash.viewing_detail && dash.search.is_empty() => {
                dash.viewing_detail = false;
            }
            KeyCode::Backspace => {
                dash.search.pop();
                dash.selected = 0;
            }
            KeyCode::F(2) => {
                dash.sort_by = dash.sort_by.next();
                dash.selected = 0;
            }
            KeyCode::Char(c) if !dash.viewing_detail => {
                dash.search.push(c);
                dash.selected = 0;
            }
            _ => {}
        }
    }

    fn persist(&mut self) {
        let Some(db) = self.db.as_mut() else {
            return;
        };
        if let Err(error) = db.save_state(&self.store, &self.session) {
            tracing::warn!(%error, "failed to save snapshot");
        }
    }
}
