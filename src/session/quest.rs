//! "Trial Balance Trouble": spot why a trial balance does not balance and
//! pick the right follow-up.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::catalog::{ChoiceQuestion, QuestFixture};
use crate::model::same_account;
use crate::notice::Notice;
use crate::progress::{Badge, XpLedger};
use crate::session::Transition;

pub const MAX_CONFIDENCE: u8 = 5;

const XP_KEY: &str = "trial-balance-quest";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Intro,
    Table,
    Question,
    Action,
    Feedback,
    Reflection,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Intro => "intro",
            Stage::Table => "table",
            Stage::Question => "question",
            Stage::Action => "action",
            Stage::Feedback => "feedback",
            Stage::Reflection => "reflection",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestAction {
    Begin,
    ToggleRow(String),
    Continue,
    ChooseAnswer(String),
    SubmitAnswer,
    ChooseAction(String),
    SubmitAction,
    Proceed,
    SetConfidence(u8),
    SetReflection(String),
    Finish,
    Help,
}

impl QuestAction {
    fn name(&self) -> &'static str {
        match self {
            QuestAction::Begin => "begin",
            QuestAction::ToggleRow(_) => "toggle row",
            QuestAction::Continue => "continue",
            QuestAction::ChooseAnswer(_) => "choose answer",
            QuestAction::SubmitAnswer => "submit answer",
            QuestAction::ChooseAction(_) => "choose action",
            QuestAction::SubmitAction => "submit action",
            QuestAction::Proceed => "proceed",
            QuestAction::SetConfidence(_) => "set confidence",
            QuestAction::SetReflection(_) => "set reflection",
            QuestAction::Finish => "finish",
            QuestAction::Help => "help",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestOutcome {
    Updated,
    Graded { correct: bool, xp: u32 },
    Finished,
}

impl QuestOutcome {
    /// Feedback shown after grading. `explanation` is the hint for a miss.
    pub fn notice(&self, explanation: &str) -> Option<Notice> {
        match self {
            QuestOutcome::Graded { correct: true, .. } => Some(Notice::success(
                "Great job!",
                "You've correctly identified the missing credit entry and chosen the right action.",
            )),
            QuestOutcome::Graded { correct: false, .. } => {
                Some(Notice::failure("Not quite right", explanation))
            }
            QuestOutcome::Updated | QuestOutcome::Finished => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    #[error("cannot {action} during {stage}")]
    InvalidStage { action: &'static str, stage: Stage },

    #[error("'{0}' is not a row of the trial balance")]
    UnknownRow(String),

    #[error("'{0}' is not one of the options")]
    UnknownOption(String),

    #[error("choose an option before submitting")]
    NothingChosen,

    #[error("confidence must be between 1 and {MAX_CONFIDENCE}, got {0}")]
    Confidence(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestState {
    stage: Stage,
    flagged: BTreeSet<String>,
    answer: Option<String>,
    action: Option<String>,
    correct: Option<bool>,
    confidence: Option<u8>,
    reflection: String,
    xp: XpLedger,
    badge: Option<Badge>,
}

impl Default for QuestState {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestState {
    pub fn new() -> Self {
        Self {
            stage: Stage::Intro,
            flagged: BTreeSet::new(),
            answer: None,
            action: None,
            correct: None,
            confidence: None,
            reflection: String::new(),
            xp: XpLedger::new(),
            badge: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Rows the learner marked as suspicious.
    pub fn flagged(&self) -> impl Iterator<Item = &str> + '_ {
        self.flagged.iter().map(String::as_str)
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn chosen_action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// `None` until the quest has been graded.
    pub fn is_correct(&self) -> Option<bool> {
        self.correct
    }

    pub fn confidence(&self) -> Option<u8> {
        self.confidence
    }

    pub fn reflection(&self) -> &str {
        &self.reflection
    }

    pub fn earned_xp(&self) -> u32 {
        self.xp.total()
    }

    pub fn badge(&self) -> Option<Badge> {
        self.badge
    }
}

pub fn reduce(
    state: &QuestState,
    action: QuestAction,
    quest: &QuestFixture,
) -> Result<Transition<QuestState, QuestOutcome>, QuestError> {
    let mut next = state.clone();
    let outcome = next.apply(action, quest)?;
    Ok(Transition {
        state: next,
        outcome,
    })
}

impl QuestState {
    fn apply(&mut self, action: QuestAction, quest: &QuestFixture) -> Result<QuestOutcome, QuestError> {
        let name = action.name();
        match action {
            QuestAction::Begin => self.advance(Stage::Intro, Stage::Table, name)?,
            QuestAction::ToggleRow(account) => {
                self.expect_stage(Stage::Table, name)?;
                let row = quest
                    .trial_balance
                    .find(&account)
                    .ok_or(QuestError::UnknownRow(account))?;
                let existing = self
                    .flagged
                    .iter()
                    .find(|flagged| same_account(flagged, &row.account))
                    .cloned();
                match existing {
                    Some(flagged) => {
                        self.flagged.remove(&flagged);
                    }
                    None => {
                        self.flagged.insert(row.account.clone());
                    }
                }
            }
            QuestAction::Continue => self.advance(Stage::Table, Stage::Question, name)?,
            QuestAction::ChooseAnswer(key) => {
                self.expect_stage(Stage::Question, name)?;
                self.answer = Some(offered(&quest.question, key)?);
            }
            QuestAction::SubmitAnswer => {
                self.expect_stage(Stage::Question, name)?;
                if self.answer.is_none() {
                    return Err(QuestError::NothingChosen);
                }
                self.stage = Stage::Action;
            }
            QuestAction::ChooseAction(key) => {
                self.expect_stage(Stage::Action, name)?;
                self.action = Some(offered(&quest.action, key)?);
            }
            QuestAction::SubmitAction => {
                self.expect_stage(Stage::Action, name)?;
                if self.action.is_none() {
                    return Err(QuestError::NothingChosen);
                }
                return Ok(self.grade(quest));
            }
            QuestAction::Proceed => self.advance(Stage::Feedback, Stage::Reflection, name)?,
            QuestAction::SetConfidence(value) => {
                self.expect_stage(Stage::Reflection, name)?;
                if !(1..=MAX_CONFIDENCE).contains(&value) {
                    return Err(QuestError::Confidence(value));
                }
                self.confidence = Some(value);
            }
            QuestAction::SetReflection(text) => {
                self.expect_stage(Stage::Reflection, name)?;
                self.reflection = text;
            }
            QuestAction::Finish => {
                self.expect_stage(Stage::Reflection, name)?;
                self.restart();
                return Ok(QuestOutcome::Finished);
            }
            QuestAction::Help => {
                if self.stage == Stage::Intro {
                    return Err(QuestError::InvalidStage {
                        action: name,
                        stage: self.stage,
                    });
                }
                self.stage = Stage::Intro;
            }
        }
        Ok(QuestOutcome::Updated)
    }

    fn expect_stage(&self, stage: Stage, action: &'static str) -> Result<(), QuestError> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(QuestError::InvalidStage {
                action,
                stage: self.stage,
            })
        }
    }

    fn advance(&mut self, from: Stage, to: Stage, action: &'static str) -> Result<(), QuestError> {
        self.expect_stage(from, action)?;
        self.stage = to;
        Ok(())
    }

    /// Correct only when both the cause and the follow-up are right.
    fn grade(&mut self, quest: &QuestFixture) -> QuestOutcome {
        let correct = quest.question.is_correct(self.answer.as_deref())
            && quest.action.is_correct(self.action.as_deref());

        let mut xp = 0;
        if correct && self.xp.award(XP_KEY, quest.xp_reward) {
            xp = quest.xp_reward;
            self.badge = Some(Badge::BalanceMaster);
        }

        self.correct = Some(correct);
        self.stage = Stage::Feedback;
        QuestOutcome::Graded { correct, xp }
    }

    /// Back to the intro with a clean form. Earned XP and the badge stay.
    fn restart(&mut self) {
        let xp = std::mem::take(&mut self.xp);
        let badge = self.badge;
        *self = Self {
            xp,
            badge,
            ..Self::new()
        };
    }
}

fn offered(question: &ChoiceQuestion, key: String) -> Result<String, QuestError> {
    if question.has_option(&key) {
        Ok(key)
    } else {
        Err(QuestError::UnknownOption(key))
    }
}
