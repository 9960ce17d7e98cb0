//! Rule checks for learner answers to the troubleshooting cases.
//!
//! Checks run in a fixed order: error type, then the shape and balance of the
//! proposed journal entry, then its content against the expected entry, then
//! the optional impact question. The first failure wins.

use thiserror::Error;

use crate::Amount;
use crate::catalog::Case;
use crate::model::JournalLine;
use crate::notice::Notice;

/// Why a journal entry is not acceptable as an entry at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("line {line}: account is missing")]
    MissingAccount { line: usize },

    #[error("line {line}: has both a debit and a credit")]
    BothSides { line: usize },

    #[error("line {line}: has neither a debit nor a credit")]
    NoAmount { line: usize },

    #[error("debits {debit} do not equal credits {credit}")]
    Unbalanced { debit: Amount, credit: Amount },

    #[error("entry totals are too large")]
    Overflow,
}

/// A learner's answer rejected by [`check_case`]. Always recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("wrong error type, hint: look at the message from {sender}")]
    WrongErrorType { sender: String },

    #[error("invalid journal entry: {0}")]
    InvalidEntry(#[from] EntryError),

    #[error("journal entry does not match the expected accounts and amounts")]
    WrongEntry,

    #[error("wrong impact assessment")]
    WrongImpact,
}

impl Rejection {
    pub fn notice(&self) -> Notice {
        match self {
            Rejection::WrongErrorType { sender } => Notice::failure(
                "Incorrect error type",
                format!("Try again. Hint: Look at the message from {sender}."),
            ),
            Rejection::InvalidEntry(_) => Notice::failure(
                "Invalid journal entry",
                "Make sure all accounts are filled, debits equal credits, and each line has either a debit or a credit (not both).",
            ),
            Rejection::WrongEntry => Notice::failure(
                "Incorrect journal entry",
                "Check your accounts and amounts. Remember: debits on the left, credits on the right.",
            ),
            Rejection::WrongImpact => Notice::failure(
                "Incorrect impact assessment",
                "Reconsider how this adjustment affects the financial statements.",
            ),
        }
    }
}

/// Everything a learner submits for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseAnswer {
    pub error_type: Option<String>,
    pub lines: Vec<JournalLine>,
    pub impact: Option<String>,
}

impl Default for CaseAnswer {
    /// Two blank lines, nothing selected.
    fn default() -> Self {
        Self {
            error_type: None,
            lines: vec![JournalLine::default(), JournalLine::default()],
            impact: None,
        }
    }
}

fn debits(lines: &[JournalLine]) -> impl Iterator<Item = Amount> + '_ {
    lines.iter().filter_map(|line| line.debit)
}

fn credits(lines: &[JournalLine]) -> impl Iterator<Item = Amount> + '_ {
    lines.iter().filter_map(|line| line.credit)
}

/// `None` if the total does not fit in an [`Amount`].
pub fn total_debit(lines: &[JournalLine]) -> Option<Amount> {
    Amount::checked_sum(debits(lines))
}

pub fn total_credit(lines: &[JournalLine]) -> Option<Amount> {
    Amount::checked_sum(credits(lines))
}

/// Exact for any amounts, even when a total would not fit.
pub fn is_balanced(lines: &[JournalLine]) -> bool {
    Amount::wide_sum(debits(lines)) == Amount::wide_sum(credits(lines))
}

/// Every line names an account and carries exactly one amount.
pub fn check_shape(lines: &[JournalLine]) -> Result<(), EntryError> {
    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        if !line.has_account() {
            return Err(EntryError::MissingAccount { line: line_no });
        }
        match (line.debit, line.credit) {
            (Some(_), Some(_)) => return Err(EntryError::BothSides { line: line_no }),
            (None, None) => return Err(EntryError::NoAmount { line: line_no }),
            _ => {}
        }
    }
    Ok(())
}

/// Shape first, then balance. Totals that do not fit are an error.
pub fn check_entry(lines: &[JournalLine]) -> Result<(), EntryError> {
    check_shape(lines)?;
    let (Some(debit), Some(credit)) = (total_debit(lines), total_credit(lines)) else {
        return Err(EntryError::Overflow);
    };
    if debit != credit {
        return Err(EntryError::Unbalanced { debit, credit });
    }
    Ok(())
}

/// Each expected line is matched by at least one submitted line.
///
/// Extra submitted lines are allowed.
pub fn matches_expected(lines: &[JournalLine], expected: &[JournalLine]) -> bool {
    expected
        .iter()
        .all(|want| lines.iter().any(|line| line.matches(want)))
}

/// Exact, case-sensitive comparison of a selected label. No selection never matches.
pub fn check_choice(selected: Option<&str>, expected: &str) -> bool {
    selected == Some(expected)
}

/// Grade a full answer to a case.
pub fn check_case(case: &Case, answer: &CaseAnswer) -> Result<(), Rejection> {
    if !check_choice(answer.error_type.as_deref(), &case.error_type) {
        return Err(Rejection::WrongErrorType {
            sender: case.sender.clone(),
        });
    }

    check_entry(&answer.lines)?;

    if !matches_expected(&answer.lines, &case.correct_journal_entry) {
        return Err(Rejection::WrongEntry);
    }

    if let Some(impact) = &case.impact_question
        && !check_choice(answer.impact.as_deref(), &impact.correct_answer)
    {
        return Err(Rejection::WrongImpact);
    }

    Ok(())
}
