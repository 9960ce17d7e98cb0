use crate::buddy::{BuddyKind, Conversation};
use crate::session::case_study::{CaseStudyState, Status};
use crate::session::checkin::CheckInState;
use crate::session::lessons::{LessonState, Step};
use crate::session::quest::{QuestState, Stage};
use crate::session::quiz::QuizState;
use crate::session::tutorial::TutorialState;

/// Every page's session, as held by the engine.
#[derive(Debug)]
pub struct Sessions {
    pub lessons: LessonState,
    pub quest: QuestState,
    pub quiz: QuizState,
    pub case_study: CaseStudyState,
    pub tutorial: TutorialState,
    pub checkin: CheckInState,
    pub buddy: Conversation,
    pub assistant: Conversation,
}

impl Default for Sessions {
    fn default() -> Self {
        Self {
            lessons: LessonState::new(),
            quest: QuestState::new(),
            quiz: QuizState::new(),
            case_study: CaseStudyState::new(),
            tutorial: TutorialState::new(),
            checkin: CheckInState::new(),
            buddy: Conversation::new(BuddyKind::Human),
            assistant: Conversation::new(BuddyKind::Assistant),
        }
    }
}

impl Sessions {
    pub fn conversation(&mut self, kind: BuddyKind) -> &mut Conversation {
        match kind {
            BuddyKind::Human => &mut self.buddy,
            BuddyKind::Assistant => &mut self.assistant,
        }
    }

    pub fn lessons_status(&self) -> &'static str {
        match self.lessons.step() {
            Step::Completion | Step::Reflection => "complete",
            Step::Intro => "not_started",
            Step::Cases(_) => "in_progress",
        }
    }

    pub fn quest_status(&self) -> &'static str {
        if self.quest.badge().is_some() {
            "complete"
        } else if self.quest.stage() == Stage::Intro && self.quest.is_correct().is_none() {
            "not_started"
        } else {
            "in_progress"
        }
    }

    pub fn quiz_status(&self) -> String {
        match self.quiz.score() {
            Some(score) => format!("scored {}/{}", score.correct, score.total),
            None => "not_started".to_string(),
        }
    }

    pub fn case_study_status(&self) -> &'static str {
        match self.case_study.status() {
            Status::NotSubmitted => "not_submitted",
            Status::Submitted => "submitted",
            Status::Completed => "complete",
        }
    }
}
