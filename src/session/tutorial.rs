//! "Learn accounting" slide deck with its three small interactive checks.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::Amount;
use crate::catalog::TutorialFixture;
use crate::notice::Notice;
use crate::route::Route;
use crate::session::Transition;

const KEY_TERMS: &str = "key-terms";
const MINI_QUIZ: &str = "mini-quiz";
const EQUATION: &str = "equation";
const ACCOUNT_TYPES: &str = "account-types";
const DOUBLE_ENTRY: &str = "double-entry";
const WRAP_UP: &str = "wrap-up";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    MiniQuiz,
    Equation,
    DoubleEntry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TutorialAction {
    Next,
    Prev,
    Goto(usize),
    FlipCard(String),
    ToggleAccountType(String),
    AnswerMiniQuiz(String),
    AnswerEquation(String),
    AnswerDoubleEntry { debit: String, credit: String },
    ResetDoubleEntry,
    StartQuiz,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TutorialOutcome {
    Updated,
    Checked { check: Check, correct: bool },
    Navigate(Route),
}

impl TutorialOutcome {
    pub fn notice(&self, tutorial: &TutorialFixture) -> Option<Notice> {
        let TutorialOutcome::Checked { check, correct } = *self else {
            return None;
        };
        let eq = &tutorial.equation;
        let equity = eq.equity().map(|amount| amount.to_string()).unwrap_or_default();
        let formula = format!(
            "Equity = Assets - Liabilities = €{} - €{} = €{equity}",
            eq.assets, eq.liabilities,
        );
        let description = match (check, correct) {
            (Check::MiniQuiz, true) => {
                "Well done! You understand the fundamental purpose of accounting.".to_string()
            }
            (Check::MiniQuiz, false) => tutorial.mini_quiz.explanation.clone(),
            (Check::Equation, true) => format!("Well done! You correctly calculated {formula}."),
            (Check::Equation, false) => format!("Remember: {formula}."),
            (Check::DoubleEntry, true) => {
                "You've correctly recorded this transaction using double-entry bookkeeping."
                    .to_string()
            }
            (Check::DoubleEntry, false) => {
                "Remember: When you pay rent, you debit Rent Expense and credit Cash.".to_string()
            }
        };
        Some(if correct {
            Notice::success("Correct!", description)
        } else {
            Notice::failure("Not quite right", description)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TutorialError {
    #[error("only available on slide '{expected}'")]
    WrongSlide { expected: &'static str },

    #[error("unknown card '{0}'")]
    UnknownCard(String),

    #[error("'{0}' is not one of the options")]
    UnknownOption(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TutorialState {
    slide: usize,
    flipped: BTreeSet<String>,
    expanded: BTreeSet<String>,
    mini_quiz: Option<bool>,
    equation: Option<bool>,
    double_entry: Option<bool>,
}

impl TutorialState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slide(&self) -> usize {
        self.slide
    }

    pub fn slide_id<'a>(&self, tutorial: &'a TutorialFixture) -> Option<&'a str> {
        tutorial.slides.get(self.slide).map(|s| s.id.as_str())
    }

    pub fn is_flipped(&self, term: &str) -> bool {
        self.flipped.contains(term)
    }

    pub fn is_expanded(&self, account_type: &str) -> bool {
        self.expanded.contains(account_type)
    }

    /// `None` while the check has not been answered.
    pub fn result(&self, check: Check) -> Option<bool> {
        match check {
            Check::MiniQuiz => self.mini_quiz,
            Check::Equation => self.equation,
            Check::DoubleEntry => self.double_entry,
        }
    }
}

pub fn reduce(
    state: &TutorialState,
    action: TutorialAction,
    tutorial: &TutorialFixture,
) -> Result<Transition<TutorialState, TutorialOutcome>, TutorialError> {
    let mut next = state.clone();
    let last = tutorial.slides.len().saturating_sub(1);

    let outcome = match action {
        TutorialAction::Next => {
            next.slide = (next.slide + 1).min(last);
            TutorialOutcome::Updated
        }
        TutorialAction::Prev => {
            next.slide = next.slide.saturating_sub(1);
            TutorialOutcome::Updated
        }
        TutorialAction::Goto(index) => {
            next.slide = index.min(last);
            TutorialOutcome::Updated
        }
        TutorialAction::FlipCard(id) => {
            next.on_slide(KEY_TERMS, tutorial)?;
            if !tutorial.key_terms.iter().any(|t| t.id == id) {
                return Err(TutorialError::UnknownCard(id));
            }
            toggle(&mut next.flipped, id);
            TutorialOutcome::Updated
        }
        TutorialAction::ToggleAccountType(id) => {
            next.on_slide(ACCOUNT_TYPES, tutorial)?;
            if !tutorial.account_types.iter().any(|t| t.id == id) {
                return Err(TutorialError::UnknownCard(id));
            }
            toggle(&mut next.expanded, id);
            TutorialOutcome::Updated
        }
        TutorialAction::AnswerMiniQuiz(key) => {
            next.on_slide(MINI_QUIZ, tutorial)?;
            let quiz = &tutorial.mini_quiz;
            if !quiz.has_option(&key) {
                return Err(TutorialError::UnknownOption(key));
            }
            let correct = quiz.is_correct(Some(key.as_str()));
            next.mini_quiz = Some(correct);
            TutorialOutcome::Checked {
                check: Check::MiniQuiz,
                correct,
            }
        }
        TutorialAction::AnswerEquation(equity) => {
            next.on_slide(EQUATION, tutorial)?;
            let expected = tutorial.equation.equity();
            let correct = expected.is_some() && equity.parse::<Amount>().ok() == expected;
            next.equation = Some(correct);
            TutorialOutcome::Checked {
                check: Check::Equation,
                correct,
            }
        }
        TutorialAction::AnswerDoubleEntry { debit, credit } => {
            next.on_slide(DOUBLE_ENTRY, tutorial)?;
            let key = &tutorial.double_entry;
            let correct = mentions_all(&debit, &key.debit_keywords)
                && mentions_all(&credit, &key.credit_keywords);
            next.double_entry = Some(correct);
            TutorialOutcome::Checked {
                check: Check::DoubleEntry,
                correct,
            }
        }
        TutorialAction::ResetDoubleEntry => {
            next.on_slide(DOUBLE_ENTRY, tutorial)?;
            next.double_entry = None;
            TutorialOutcome::Updated
        }
        TutorialAction::StartQuiz => {
            next.on_slide(WRAP_UP, tutorial)?;
            TutorialOutcome::Navigate(Route::AccountingQuiz)
        }
    };

    Ok(Transition {
        state: next,
        outcome,
    })
}

impl TutorialState {
    fn on_slide(&self, expected: &'static str, tutorial: &TutorialFixture) -> Result<(), TutorialError> {
        if self.slide_id(tutorial) == Some(expected) {
            Ok(())
        } else {
            Err(TutorialError::WrongSlide { expected })
        }
    }
}

fn toggle(set: &mut BTreeSet<String>, id: String) {
    if !set.remove(&id) {
        set.insert(id);
    }
}

fn mentions_all(input: &str, keywords: &[String]) -> bool {
    let input = input.to_lowercase();
    keywords
        .iter()
        .all(|keyword| input.contains(&keyword.to_lowercase()))
}
