//! Error types for command processing.

use thiserror::Error;

use crate::buddy::SendError;
use crate::progress::BoardError;
use crate::session::case_study::CaseStudyError;
use crate::session::checkin::CheckInError;
use crate::session::lessons::LessonError;
use crate::session::quest::QuestError;
use crate::session::quiz::QuizError;
use crate::session::tutorial::TutorialError;

/// Top-level error returned by [`Engine::apply`](super::Engine::apply).
///
/// Every variant leaves the engine state as it was before the command.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("lessons: {0}")]
    Lessons(#[from] LessonError),

    #[error("quest: {0}")]
    Quest(#[from] QuestError),

    #[error("quiz: {0}")]
    Quiz(#[from] QuizError),

    #[error("case study: {0}")]
    CaseStudy(#[from] CaseStudyError),

    #[error("tutorial: {0}")]
    Tutorial(#[from] TutorialError),

    #[error("check-in: {0}")]
    CheckIn(#[from] CheckInError),

    #[error("board: {0}")]
    Board(#[from] BoardError),

    #[error("buddy: {0}")]
    Buddy(#[from] SendError),
}
