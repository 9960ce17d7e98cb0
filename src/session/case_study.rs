//! The lemonade stand case study: a free-form worksheet graded against a
//! model answer.
//!
//! The learner fills in the opening balance sheet and up to three journal
//! entries. Amount fields compare numerically, account names as
//! case-insensitive substrings. Only the first journal entry is graded.
//!
//! Liabilities also accept a word from the key ("none", "zero"), matched
//! case-insensitively as a whole word, so "none at all" passes and
//! "nonexistent" does not.

use std::str::FromStr;

use thiserror::Error;

use crate::Amount;
use crate::catalog::{CaseStudyKey, EntryKey};
use crate::notice::Notice;
use crate::route::Route;
use crate::session::Transition;

pub const ENTRY_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    NotSubmitted,
    Submitted,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPart {
    DebitAccount,
    DebitAmount,
    CreditAccount,
    CreditAmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Equipment,
    Supplies,
    Cash,
    TotalAssets,
    Liabilities,
    Equity,
    /// Zero-based journal entry index.
    Entry(usize, EntryPart),
}

/// Form keys as used in scripts: `cash`, `total_assets`, `je1_debit_account`...
impl FromStr for Field {
    type Err = CaseStudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "equipment" => Field::Equipment,
            "supplies" => Field::Supplies,
            "cash" => Field::Cash,
            "total_assets" => Field::TotalAssets,
            "liabilities" => Field::Liabilities,
            "equity" => Field::Equity,
            _ => {
                let unknown = || CaseStudyError::UnknownField(s.to_string());
                let rest = s.strip_prefix("je").ok_or_else(unknown)?;
                let (number, part) = rest.split_once('_').ok_or_else(unknown)?;
                let number: usize = number.parse().map_err(|_| unknown())?;
                if !(1..=ENTRY_COUNT).contains(&number) {
                    return Err(unknown());
                }
                let part = match part {
                    "debit_account" => EntryPart::DebitAccount,
                    "debit_amount" => EntryPart::DebitAmount,
                    "credit_account" => EntryPart::CreditAccount,
                    "credit_amount" => EntryPart::CreditAmount,
                    _ => return Err(unknown()),
                };
                Field::Entry(number - 1, part)
            }
        };
        Ok(field)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub debit_account: String,
    pub debit_amount: String,
    pub credit_account: String,
    pub credit_amount: String,
}

impl EntryForm {
    fn slot(&mut self, part: EntryPart) -> &mut String {
        match part {
            EntryPart::DebitAccount => &mut self.debit_account,
            EntryPart::DebitAmount => &mut self.debit_amount,
            EntryPart::CreditAccount => &mut self.credit_account,
            EntryPart::CreditAmount => &mut self.credit_amount,
        }
    }

    fn matches(&self, key: &EntryKey) -> bool {
        mentions(&self.debit_account, &key.debit_account)
            && amount_is(&self.debit_amount, key.amount)
            && mentions(&self.credit_account, &key.credit_account)
            && amount_is(&self.credit_amount, key.amount)
    }
}

/// Raw form input, kept as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Worksheet {
    pub equipment: String,
    pub supplies: String,
    pub cash: String,
    pub total_assets: String,
    pub liabilities: String,
    pub equity: String,
    pub entries: [EntryForm; ENTRY_COUNT],
}

impl Worksheet {
    fn slot(&mut self, field: Field) -> Result<&mut String, CaseStudyError> {
        Ok(match field {
            Field::Equipment => &mut self.equipment,
            Field::Supplies => &mut self.supplies,
            Field::Cash => &mut self.cash,
            Field::TotalAssets => &mut self.total_assets,
            Field::Liabilities => &mut self.liabilities,
            Field::Equity => &mut self.equity,
            Field::Entry(index, part) => self
                .entries
                .get_mut(index)
                .ok_or(CaseStudyError::NoEntry(index))?
                .slot(part),
        })
    }
}

/// Per-section result of grading a worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grading {
    pub assets: bool,
    pub liabilities: bool,
    pub equity: bool,
    pub opening_entry: bool,
}

impl Grading {
    pub fn grade(sheet: &Worksheet, key: &CaseStudyKey) -> Self {
        let assets = amount_is(&sheet.equipment, key.equipment)
            && amount_is(&sheet.supplies, key.supplies)
            && amount_is(&sheet.cash, key.cash)
            && amount_is(&sheet.total_assets, key.total_assets);

        let liabilities = amount_is(&sheet.liabilities, key.liabilities)
            || key
                .liability_words
                .iter()
                .any(|word| has_word(&sheet.liabilities, word));

        Self {
            assets,
            liabilities,
            equity: amount_is(&sheet.equity, key.equity),
            opening_entry: sheet.entries[0].matches(&key.opening_entry),
        }
    }

    pub fn passed(&self) -> bool {
        self.assets && self.liabilities && self.equity && self.opening_entry
    }

    pub fn feedback(&self) -> &'static str {
        if self.passed() {
            "Great job! You've correctly populated the asset line items, liabilities, equity, and at least the first journal entry."
        } else {
            "Some entries don't match the model answers. Double-check your numbers and account names."
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseStudyAction {
    Set { field: Field, value: String },
    Submit,
    Complete,
    BackToQuiz,
    NextLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseStudyOutcome {
    Updated,
    Graded(Grading),
    Completed,
    Navigate(Route),
}

impl CaseStudyOutcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            CaseStudyOutcome::Graded(grading) if grading.passed() => Some(Notice::success(
                "Well done!",
                "You've demonstrated solid understanding of how initial investment flows through the accounting equation.",
            )),
            CaseStudyOutcome::Graded(_) => Some(Notice::failure(
                "",
                "Keep practicing! Make sure Assets = Liabilities + Equity and each journal entry debits and credits correctly.",
            )),
            CaseStudyOutcome::Completed => Some(Notice::success(
                "Module Complete! 🎉",
                "You've finished the lemonade stand accounting case study.",
            )),
            CaseStudyOutcome::Updated | CaseStudyOutcome::Navigate(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaseStudyError {
    #[error("unknown worksheet field '{0}'")]
    UnknownField(String),

    #[error("journal entry {0} does not exist")]
    NoEntry(usize),

    #[error("answers already submitted")]
    AlreadySubmitted,

    #[error("submit answers first")]
    NotSubmitted,

    #[error("case study not completed")]
    NotCompleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseStudyState {
    status: Status,
    sheet: Worksheet,
    grading: Option<Grading>,
}

impl Default for CaseStudyState {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseStudyState {
    pub fn new() -> Self {
        Self {
            status: Status::NotSubmitted,
            sheet: Worksheet::default(),
            grading: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn worksheet(&self) -> &Worksheet {
        &self.sheet
    }

    pub fn grading(&self) -> Option<Grading> {
        self.grading
    }
}

pub fn reduce(
    state: &CaseStudyState,
    action: CaseStudyAction,
    key: &CaseStudyKey,
) -> Result<Transition<CaseStudyState, CaseStudyOutcome>, CaseStudyError> {
    let mut next = state.clone();
    let outcome = match action {
        CaseStudyAction::Set { field, value } => {
            if next.status != Status::NotSubmitted {
                return Err(CaseStudyError::AlreadySubmitted);
            }
            *next.sheet.slot(field)? = value;
            CaseStudyOutcome::Updated
        }
        CaseStudyAction::Submit => {
            if next.status != Status::NotSubmitted {
                return Err(CaseStudyError::AlreadySubmitted);
            }
            let grading = Grading::grade(&next.sheet, key);
            next.status = Status::Submitted;
            next.grading = Some(grading);
            CaseStudyOutcome::Graded(grading)
        }
        CaseStudyAction::Complete => {
            if next.status != Status::Submitted {
                return Err(CaseStudyError::NotSubmitted);
            }
            next.status = Status::Completed;
            CaseStudyOutcome::Completed
        }
        CaseStudyAction::BackToQuiz => CaseStudyOutcome::Navigate(Route::AccountingQuiz),
        CaseStudyAction::NextLevel => {
            if next.status != Status::Completed {
                return Err(CaseStudyError::NotCompleted);
            }
            CaseStudyOutcome::Navigate(Route::Level3)
        }
    };
    Ok(Transition {
        state: next,
        outcome,
    })
}

fn amount_is(input: &str, expected: Amount) -> bool {
    input.parse::<Amount>().is_ok_and(|amount| amount == expected)
}

fn has_word(input: &str, word: &str) -> bool {
    input
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token.eq_ignore_ascii_case(word))
}

fn mentions(input: &str, needle: &str) -> bool {
    input.to_lowercase().contains(&needle.to_lowercase())
}
