//! XP, badges and the onboarding quest board.

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::BoardQuest;

/// Monotonic XP counter keyed by what earned it.
///
/// Awarding the same key twice is a no-op, so a resubmitted exercise never
/// counts double.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XpLedger {
    total: u32,
    awarded: BTreeSet<String>,
}

impl XpLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Returns `false` if `key` was already rewarded.
    pub fn award(&mut self, key: &str, xp: u32) -> bool {
        if !self.awarded.insert(key.to_string()) {
            return false;
        }
        self.total += xp;
        true
    }

    pub fn has(&self, key: &str) -> bool {
        self.awarded.contains(key)
    }

    pub fn count(&self) -> usize {
        self.awarded.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Badge {
    /// All troubleshooting cases solved.
    AuditReady,
    /// Trial balance quest answered correctly.
    BalanceMaster,
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Badge::AuditReady => write!(f, "Audit-Ready"),
            Badge::BalanceMaster => write!(f, "Balance Master"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    #[default]
    NotStarted,
    InProgress,
    Complete,
}

impl std::str::FromStr for QuestStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(QuestStatus::NotStarted),
            "in_progress" => Ok(QuestStatus::InProgress),
            "complete" => Ok(QuestStatus::Complete),
            other => Err(BoardError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestStatus::NotStarted => write!(f, "not_started"),
            QuestStatus::InProgress => write!(f, "in_progress"),
            QuestStatus::Complete => write!(f, "complete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("quest {0} not found")]
    QuestNotFound(String),
    #[error("unknown quest status '{0}'")]
    UnknownStatus(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardEntry {
    pub id: String,
    pub title: String,
    pub status: QuestStatus,
    pub xp_reward: u32,
}

/// The onboarding dashboard: quests whose completion yields XP.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestBoard {
    quests: Vec<BoardEntry>,
}

impl QuestBoard {
    pub fn new(quests: &[BoardQuest]) -> Self {
        Self {
            quests: quests
                .iter()
                .map(|quest| BoardEntry {
                    id: quest.id.clone(),
                    title: quest.title.clone(),
                    status: quest.status,
                    xp_reward: quest.xp_reward,
                })
                .collect(),
        }
    }

    pub fn quests(&self) -> &[BoardEntry] {
        &self.quests
    }

    pub fn set_status(&mut self, id: &str, status: QuestStatus) -> Result<(), BoardError> {
        let quest = self
            .quests
            .iter_mut()
            .find(|quest| quest.id == id)
            .ok_or_else(|| BoardError::QuestNotFound(id.to_string()))?;
        quest.status = status;
        Ok(())
    }

    /// XP of completed quests.
    pub fn total_xp(&self) -> u32 {
        self.quests
            .iter()
            .filter(|quest| quest.status == QuestStatus::Complete)
            .map(|quest| quest.xp_reward)
            .sum()
    }

    pub fn max_xp(&self) -> u32 {
        self.quests.iter().map(|quest| quest.xp_reward).sum()
    }

    pub fn completed(&self) -> usize {
        self.quests
            .iter()
            .filter(|quest| quest.status == QuestStatus::Complete)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn board() -> QuestBoard {
        QuestBoard::new(&Catalog::builtin().unwrap().board)
    }

    #[test]
    fn ledger_accumulates() {
        let mut ledger = XpLedger::new();
        assert!(ledger.award("case1", 20));
        assert!(ledger.award("case2", 30));
        assert_eq!(ledger.total(), 50);
        assert_eq!(ledger.count(), 2);
        assert!(ledger.has("case1"));
    }

    #[test]
    fn ledger_ignores_repeat_awards() {
        let mut ledger = XpLedger::new();
        assert!(ledger.award("case1", 20));
        assert!(!ledger.award("case1", 20));
        assert_eq!(ledger.total(), 20);
    }

    #[test]
    fn new_ledger_is_zero() {
        assert_eq!(XpLedger::new().total(), 0);
    }

    #[test]
    fn badge_names() {
        assert_eq!(Badge::AuditReady.to_string(), "Audit-Ready");
        assert_eq!(Badge::BalanceMaster.to_string(), "Balance Master");
    }

    #[test]
    fn board_counts_only_complete_quests() {
        let board = board();
        assert_eq!(board.total_xp(), 10);
        assert_eq!(board.max_xp(), 60);
        assert_eq!(board.completed(), 1);
    }

    #[test]
    fn board_status_change() {
        let mut board = board();
        board.set_status("2", QuestStatus::Complete).unwrap();
        assert_eq!(board.total_xp(), 35);

        board.set_status("1", QuestStatus::InProgress).unwrap();
        assert_eq!(board.total_xp(), 25);
    }

    #[test]
    fn board_unknown_quest() {
        let mut board = board();
        assert_eq!(
            board.set_status("99", QuestStatus::Complete),
            Err(BoardError::QuestNotFound("99".into()))
        );
    }

    #[test]
    fn status_parsing() {
        assert_eq!("complete".parse::<QuestStatus>(), Ok(QuestStatus::Complete));
        assert_eq!("in_progress".parse::<QuestStatus>(), Ok(QuestStatus::InProgress));
        assert!("done".parse::<QuestStatus>().is_err());
        assert_eq!(QuestStatus::InProgress.to_string(), "in_progress");
    }
}
