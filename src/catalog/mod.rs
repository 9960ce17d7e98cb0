//! Exercise fixtures: the cases, quizzes and answer keys the sessions check
//! learner input against.
//!
//! A catalog is plain TOML. [`Catalog::builtin`] parses the copy embedded in
//! the binary, [`Catalog::load`] reads one from disk. Both run
//! [`Catalog::validate`] so a session never has to cope with an answer key
//! that can't be satisfied.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::Amount;
use crate::model::{JournalLine, TrialBalance};
use crate::progress::QuestStatus;
use crate::validate::{EntryError, check_entry};

const BUILTIN: &str = include_str!("builtin.toml");

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("catalog has no lesson cases")]
    NoCases,

    #[error("duplicate id '{0}'")]
    DuplicateId(String),

    #[error("case {case}: error type '{error_type}' is not offered")]
    UnknownErrorType { case: String, error_type: String },

    #[error("case {case}: expected journal entry is invalid: {source}")]
    InvalidEntry { case: String, source: EntryError },

    #[error("{question}: answer '{answer}' is not one of the options")]
    UnknownAnswer { question: String, answer: String },

    #[error("tutorial has no slides")]
    NoSlides,

    #[error("tutorial equation: assets minus liabilities is out of range")]
    EquityOutOfRange,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub lessons: LessonsFixture,
    pub quest: QuestFixture,
    pub quiz: QuizFixture,
    pub case_study: CaseStudyKey,
    pub tutorial: TutorialFixture,
    pub board: Vec<BoardQuest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LessonsFixture {
    pub intro: Intro,
    pub sample_trial_balance: TrialBalance,
    /// Labels offered by the error-type classifier.
    pub error_types: Vec<String>,
    pub reflection: ReflectionOptions,
    pub cases: Vec<Case>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Intro {
    pub title: String,
    pub description: String,
    pub content: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReflectionOptions {
    pub most_difficult: Vec<String>,
    pub confidence: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Lecture {
    pub title: String,
    pub content: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImpactQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// A fixed troubleshooting scenario with a known correct answer.
#[derive(Debug, Clone, Deserialize)]
pub struct Case {
    pub id: String,
    pub title: String,
    pub narrative: String,
    pub sender: String,
    pub lecture: Lecture,
    pub trial_balance: TrialBalance,
    pub error_type: String,
    pub correct_journal_entry: Vec<JournalLine>,
    pub impact_question: Option<ImpactQuestion>,
    pub xp_reward: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Choice {
    pub key: String,
    pub label: String,
}

/// A multiple-choice question answered by option key.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceQuestion {
    #[serde(default)]
    pub id: String,
    pub prompt: String,
    pub options: Vec<Choice>,
    pub correct: String,
    #[serde(default)]
    pub explanation: String,
}

impl ChoiceQuestion {
    pub fn has_option(&self, key: &str) -> bool {
        self.options.iter().any(|choice| choice.key == key)
    }

    pub fn is_correct(&self, key: Option<&str>) -> bool {
        key == Some(self.correct.as_str())
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|choice| choice.key == key)
            .map(|choice| choice.label.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestFixture {
    pub title: String,
    pub prompt: String,
    pub xp_reward: u32,
    pub trial_balance: TrialBalance,
    pub question: ChoiceQuestion,
    pub action: ChoiceQuestion,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizFixture {
    pub questions: Vec<ChoiceQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaseStudyKey {
    pub title: String,
    pub equipment: Amount,
    pub supplies: Amount,
    pub cash: Amount,
    pub total_assets: Amount,
    pub liabilities: Amount,
    /// Words accepted in place of a zero liability amount.
    #[serde(default)]
    pub liability_words: Vec<String>,
    pub equity: Amount,
    pub opening_entry: EntryKey,
}

/// Expected debit and credit of a two-line entry. Account names are matched
/// as case-insensitive substrings.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryKey {
    pub debit_account: String,
    pub credit_account: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TutorialFixture {
    pub slides: Vec<Slide>,
    pub key_terms: Vec<KeyTerm>,
    pub account_types: Vec<AccountType>,
    pub mini_quiz: ChoiceQuestion,
    pub equation: EquationKey,
    pub double_entry: DoubleEntryKey,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Slide {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyTerm {
    pub id: String,
    pub term: String,
    pub definition: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountType {
    pub id: String,
    pub title: String,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EquationKey {
    pub assets: Amount,
    pub liabilities: Amount,
}

impl EquationKey {
    /// Assets minus liabilities, `None` if it does not fit.
    pub fn equity(&self) -> Option<Amount> {
        self.assets.checked_sub(self.liabilities)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoubleEntryKey {
    pub transaction: String,
    pub debit_keywords: Vec<String>,
    pub credit_keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardQuest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub time_estimate: String,
    pub status: QuestStatus,
    pub xp_reward: u32,
}

impl Catalog {
    /// The catalog embedded in the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn case(&self, id: &str) -> Option<&Case> {
        self.lessons.cases.iter().find(|case| case.id == id)
    }

    /// Check that every answer key can actually be satisfied.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.lessons.cases.is_empty() {
            return Err(CatalogError::NoCases);
        }

        unique(self.lessons.cases.iter().map(|case| case.id.as_str()))?;
        for case in &self.lessons.cases {
            self.validate_case(case)?;
        }

        answer_offered(&self.quest.question, "quest question")?;
        answer_offered(&self.quest.action, "quest action")?;

        unique(self.quiz.questions.iter().map(|q| q.id.as_str()))?;
        for question in &self.quiz.questions {
            answer_offered(question, &question.id)?;
        }

        if self.tutorial.slides.is_empty() {
            return Err(CatalogError::NoSlides);
        }
        unique(self.tutorial.slides.iter().map(|slide| slide.id.as_str()))?;
        answer_offered(&self.tutorial.mini_quiz, "mini quiz")?;
        if self.tutorial.equation.equity().is_none() {
            return Err(CatalogError::EquityOutOfRange);
        }

        unique(self.board.iter().map(|quest| quest.id.as_str()))?;

        Ok(())
    }

    fn validate_case(&self, case: &Case) -> Result<(), CatalogError> {
        if !self.lessons.error_types.contains(&case.error_type) {
            return Err(CatalogError::UnknownErrorType {
                case: case.id.clone(),
                error_type: case.error_type.clone(),
            });
        }

        check_entry(&case.correct_journal_entry).map_err(|source| {
            CatalogError::InvalidEntry {
                case: case.id.clone(),
                source,
            }
        })?;

        if let Some(impact) = &case.impact_question
            && !impact.options.contains(&impact.correct_answer)
        {
            return Err(CatalogError::UnknownAnswer {
                question: format!("{} impact question", case.id),
                answer: impact.correct_answer.clone(),
            });
        }

        debug!(
            case = %case.id,
            debit = ?case.trial_balance.total_debit(),
            credit = ?case.trial_balance.total_credit(),
            "case trial balance loaded"
        );
        Ok(())
    }
}

fn unique<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}

fn answer_offered(question: &ChoiceQuestion, name: &str) -> Result<(), CatalogError> {
    if question.has_option(&question.correct) {
        Ok(())
    } else {
        Err(CatalogError::UnknownAnswer {
            question: name.to_string(),
            answer: question.correct.clone(),
        })
    }
}
