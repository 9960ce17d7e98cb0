//! Core bookkeeping types shared by the exercises.

use serde::Deserialize;

use crate::Amount;
use crate::amount::ParseAmountError;

/// One row of a trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrialBalanceEntry {
    pub account: String,
    pub debit: Option<Amount>,
    pub credit: Option<Amount>,
    /// Marks a row the exercise wants the learner to look at.
    #[serde(default)]
    pub suspicious: bool,
}

impl TrialBalanceEntry {
    pub fn debit(account: impl Into<String>, amount: Amount) -> Self {
        Self {
            account: account.into(),
            debit: Some(amount),
            credit: None,
            suspicious: false,
        }
    }

    pub fn credit(account: impl Into<String>, amount: Amount) -> Self {
        Self {
            account: account.into(),
            debit: None,
            credit: Some(amount),
            suspicious: false,
        }
    }

    pub fn flagged(mut self) -> Self {
        self.suspicious = true;
        self
    }
}

/// A listing of ledger accounts with their debit or credit balances.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct TrialBalance(Vec<TrialBalanceEntry>);

impl TrialBalance {
    pub fn new(entries: Vec<TrialBalanceEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[TrialBalanceEntry] {
        &self.0
    }

    /// `None` if the total does not fit in an [`Amount`].
    pub fn total_debit(&self) -> Option<Amount> {
        Amount::checked_sum(self.debits())
    }

    pub fn total_credit(&self) -> Option<Amount> {
        Amount::checked_sum(self.credits())
    }

    /// Debits minus credits; zero when balanced.
    pub fn difference(&self) -> Option<Amount> {
        let diff = Amount::wide_sum(self.debits()) - Amount::wide_sum(self.credits());
        i64::try_from(diff).ok().map(Amount::from_scaled)
    }

    pub fn is_balanced(&self) -> bool {
        Amount::wide_sum(self.debits()) == Amount::wide_sum(self.credits())
    }

    fn debits(&self) -> impl Iterator<Item = Amount> + '_ {
        self.0.iter().filter_map(|entry| entry.debit)
    }

    fn credits(&self) -> impl Iterator<Item = Amount> + '_ {
        self.0.iter().filter_map(|entry| entry.credit)
    }

    pub fn suspicious(&self) -> impl Iterator<Item = &TrialBalanceEntry> + '_ {
        self.0.iter().filter(|entry| entry.suspicious)
    }

    /// Look up a row by account name, ignoring case.
    pub fn find(&self, account: &str) -> Option<&TrialBalanceEntry> {
        self.0
            .iter()
            .find(|entry| same_account(&entry.account, account))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<TrialBalanceEntry> for TrialBalance {
    fn from_iter<I: IntoIterator<Item = TrialBalanceEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Field of a journal line a learner can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineField {
    Account,
    Debit,
    Credit,
}

/// One line of a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct JournalLine {
    pub account: String,
    pub debit: Option<Amount>,
    pub credit: Option<Amount>,
}

impl JournalLine {
    pub fn debit(account: impl Into<String>, amount: Amount) -> Self {
        Self {
            account: account.into(),
            debit: Some(amount),
            credit: None,
        }
    }

    pub fn credit(account: impl Into<String>, amount: Amount) -> Self {
        Self {
            account: account.into(),
            debit: None,
            credit: Some(amount),
        }
    }

    /// Apply a form edit.
    ///
    /// Entering a debit clears the credit and the other way round. An empty
    /// amount clears the edited side.
    pub fn set(&mut self, field: LineField, value: &str) -> Result<(), ParseAmountError> {
        match field {
            LineField::Account => self.account = value.to_string(),
            LineField::Debit => {
                self.debit = parse_optional(value)?;
                self.credit = None;
            }
            LineField::Credit => {
                self.credit = parse_optional(value)?;
                self.debit = None;
            }
        }
        Ok(())
    }

    pub fn has_account(&self) -> bool {
        !self.account.trim().is_empty()
    }

    /// Exactly one of debit and credit is populated.
    pub fn is_one_sided(&self) -> bool {
        self.debit.is_some() != self.credit.is_some()
    }

    /// Account names match ignoring case and surrounding blanks; amounts match exactly.
    pub fn matches(&self, expected: &JournalLine) -> bool {
        same_account(&self.account, &expected.account)
            && self.debit == expected.debit
            && self.credit == expected.credit
    }
}

fn parse_optional(value: &str) -> Result<Option<Amount>, ParseAmountError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    value.parse().map(Some)
}

pub(crate) fn same_account(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
