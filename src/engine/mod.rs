//! Command processing engine.
//!
//! The engine owns the exercise catalog and one session per page. Each
//! command is routed to its page's reducer; the resulting state replaces the
//! old one only when the reducer succeeds. Commands can also arrive as an
//! async stream.

use std::fmt;

use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::buddy::BuddyKind;
use crate::catalog::Catalog;
use crate::notice::Notice;
use crate::progress::{Badge, QuestBoard, QuestStatus};
use crate::route::Route;
use crate::session::case_study::{self, CaseStudyAction, CaseStudyError, CaseStudyOutcome};
use crate::session::checkin::{self, CheckInAction, CheckInError};
use crate::session::lessons::{self, LessonAction, LessonError, LessonOutcome};
use crate::session::quest::{self, QuestAction, QuestError};
use crate::session::quiz::{self, QuizAction, QuizError, QuizOutcome};
use crate::session::tutorial::{self, TutorialAction, TutorialError, TutorialOutcome};

mod state;
pub use state::Sessions;

mod error;
pub use error::EngineError;

/// One learner interaction, addressed to a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Lessons(LessonAction),
    Quest(QuestAction),
    Quiz(QuizAction),
    CaseStudy(CaseStudyAction),
    Tutorial(TutorialAction),
    CheckIn(CheckInAction),
    Buddy { kind: BuddyKind, text: String },
    Board { quest: String, status: QuestStatus },
    Visit(Route),
}

impl Command {
    fn page(&self) -> &'static str {
        match self {
            Command::Lessons(_) => "lessons",
            Command::Quest(_) => "quest",
            Command::Quiz(_) => "quiz",
            Command::CaseStudy(_) => "case study",
            Command::Tutorial(_) => "tutorial",
            Command::CheckIn(_) => "check-in",
            Command::Buddy { .. } => "buddy",
            Command::Board { .. } => "board",
            Command::Visit(_) => "visit",
        }
    }
}

/// One line of the end-of-run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub exercise: String,
    pub status: String,
    pub xp: u32,
}

impl ReportRow {
    fn new(exercise: impl Into<String>, status: impl Into<String>, xp: u32) -> Self {
        Self {
            exercise: exercise.into(),
            status: status.into(),
            xp,
        }
    }
}

pub struct Engine {
    catalog: Catalog,
    sessions: Sessions,
    board: QuestBoard,
    route: Route,
}

/// Public API
impl Engine {
    pub fn new(catalog: Catalog) -> Self {
        let board = QuestBoard::new(&catalog.board);
        Self {
            catalog,
            sessions: Sessions::default(),
            board,
            route: Route::Dashboard,
        }
    }

    /// Run the engine over a command stream, then wait for pending buddy
    /// replies.
    pub async fn run(&mut self, mut stream: impl Stream<Item = Command> + Unpin) {
        while let Some(command) = stream.next().await {
            // a rejected command never stops the run
            let _ = self.apply(command);
        }
        self.settle().await;
    }

    /// Apply a single command on top of the current state.
    ///
    /// Returns the notice the page would show, if any. Wrong answers are
    /// `Ok` with a failure notice.
    pub fn apply(&mut self, command: Command) -> Result<Option<Notice>, EngineError> {
        let page = command.page();
        match command {
            Command::Lessons(action) => {
                let result = self.apply_lessons(action);
                Self::log_result(page, &result);
                Ok(result?)
            }
            Command::Quest(action) => {
                let result = self.apply_quest(action);
                Self::log_result(page, &result);
                Ok(result?)
            }
            Command::Quiz(action) => {
                let result = self.apply_quiz(action);
                Self::log_result(page, &result);
                Ok(result?)
            }
            Command::CaseStudy(action) => {
                let result = self.apply_case_study(action);
                Self::log_result(page, &result);
                Ok(result?)
            }
            Command::Tutorial(action) => {
                let result = self.apply_tutorial(action);
                Self::log_result(page, &result);
                Ok(result?)
            }
            Command::CheckIn(action) => {
                let result = self.apply_checkin(action);
                Self::log_result(page, &result);
                Ok(result?)
            }
            Command::Buddy { kind, text } => {
                let result = self.sessions.conversation(kind).send(&text).map(|()| None);
                Self::log_result(page, &result);
                Ok(result?)
            }
            Command::Board { quest, status } => {
                let result = self.board.set_status(&quest, status).map(|()| None);
                Self::log_result(page, &result);
                Ok(result?)
            }
            Command::Visit(route) => {
                self.route = route;
                let result: Result<_, EngineError> = Ok(None);
                Self::log_result(page, &result);
                result
            }
        }
    }

    /// Wait for every buddy reply still in flight.
    pub async fn settle(&mut self) {
        self.sessions.buddy.settle().await;
        self.sessions.assistant.settle().await;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    pub fn board(&self) -> &QuestBoard {
        &self.board
    }

    /// Page the learner was last sent to.
    pub fn route(&self) -> Route {
        self.route
    }

    /// XP from the lessons, the quest and completed board quests.
    pub fn total_xp(&self) -> u32 {
        self.sessions.lessons.earned_xp() + self.sessions.quest.earned_xp() + self.board.total_xp()
    }

    pub fn badges(&self) -> Vec<Badge> {
        [self.sessions.lessons.badge(), self.sessions.quest.badge()]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Per-exercise status and XP, board quests, then the total.
    pub fn report(&self) -> Vec<ReportRow> {
        let sessions = &self.sessions;
        let mut rows = vec![
            ReportRow::new("lessons", sessions.lessons_status(), sessions.lessons.earned_xp()),
            ReportRow::new("quest", sessions.quest_status(), sessions.quest.earned_xp()),
            ReportRow::new("quiz", sessions.quiz_status(), 0),
            ReportRow::new("case_study", sessions.case_study_status(), 0),
        ];
        rows.extend(self.board.quests().iter().map(|quest| {
            let xp = if quest.status == QuestStatus::Complete {
                quest.xp_reward
            } else {
                0
            };
            ReportRow::new(format!("board:{}", quest.id), quest.status.to_string(), xp)
        }));
        rows.push(ReportRow::new("total", "", self.total_xp()));
        rows
    }
}

/// Private API
impl Engine {
    /// Small helper to log `apply` results
    fn log_result<E: fmt::Display>(page: &str, result: &Result<Option<Notice>, E>) {
        match result {
            Ok(Some(notice)) => info!(notice = %notice, "{page} applied"),
            Ok(None) => info!("{page} applied"),
            Err(e) => info!(reason = %e, "{page} skipped"),
        }
    }

    fn navigate(&mut self, route: Route) {
        self.route = route;
    }

    fn apply_lessons(&mut self, action: LessonAction) -> Result<Option<Notice>, LessonError> {
        let transition = lessons::reduce(&self.sessions.lessons, action, &self.catalog.lessons)?;
        self.sessions.lessons = transition.state;
        if let LessonOutcome::Navigate(route) = transition.outcome {
            self.navigate(route);
        }
        Ok(transition.outcome.notice())
    }

    fn apply_quest(&mut self, action: QuestAction) -> Result<Option<Notice>, QuestError> {
        let quest = &self.catalog.quest;
        let transition = quest::reduce(&self.sessions.quest, action, quest)?;
        self.sessions.quest = transition.state;
        Ok(transition.outcome.notice(&quest.question.explanation))
    }

    fn apply_quiz(&mut self, action: QuizAction) -> Result<Option<Notice>, QuizError> {
        let transition = quiz::reduce(&self.sessions.quiz, action, &self.catalog.quiz)?;
        self.sessions.quiz = transition.state;
        if let QuizOutcome::Navigate(route) = transition.outcome {
            self.navigate(route);
        }
        Ok(transition.outcome.notice())
    }

    fn apply_case_study(
        &mut self,
        action: CaseStudyAction,
    ) -> Result<Option<Notice>, CaseStudyError> {
        let transition =
            case_study::reduce(&self.sessions.case_study, action, &self.catalog.case_study)?;
        self.sessions.case_study = transition.state;
        if let CaseStudyOutcome::Navigate(route) = transition.outcome {
            self.navigate(route);
        }
        Ok(transition.outcome.notice())
    }

    fn apply_tutorial(&mut self, action: TutorialAction) -> Result<Option<Notice>, TutorialError> {
        let transition = tutorial::reduce(&self.sessions.tutorial, action, &self.catalog.tutorial)?;
        self.sessions.tutorial = transition.state;
        if let TutorialOutcome::Navigate(route) = transition.outcome {
            self.navigate(route);
        }
        Ok(transition.outcome.notice(&self.catalog.tutorial))
    }

    fn apply_checkin(&mut self, action: CheckInAction) -> Result<Option<Notice>, CheckInError> {
        let transition = checkin::reduce(&self.sessions.checkin, action)?;
        self.sessions.checkin = transition.state;
        Ok(transition.outcome.notice())
    }
}
