//! Learner scripts in, progress report out.
//!
//! A script is a csv file with the columns `page,action,key,value`; `key`
//! and `value` may be empty when the action takes no argument. Line and
//! slide numbers in scripts are 1-based.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::buddy::BuddyKind;
use crate::engine::{Command, ReportRow};
use crate::model::LineField;
use crate::progress::QuestStatus;
use crate::route::Route;
use crate::session::case_study::{CaseStudyAction, Field};
use crate::session::checkin::{CheckInAction, Mood};
use crate::session::lessons::{LessonAction, ReflectionField};
use crate::session::quest::QuestAction;
use crate::session::quiz::QuizAction;
use crate::session::tutorial::TutorialAction;

/// Errors that can occur when reading script rows
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open { path: PathBuf, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized page '{page}'")]
    UnrecognizedPage { line: usize, page: String },

    #[error("line {line}: unrecognized {page} action '{action}'")]
    UnrecognizedAction {
        line: usize,
        page: String,
        action: String,
    },

    #[error("line {line}: {action} missing {field}")]
    MissingField {
        line: usize,
        action: String,
        field: &'static str,
    },

    #[error("line {line}: invalid {field} '{value}'")]
    InvalidValue {
        line: usize,
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, Deserialize)]
struct InputRow {
    page: String,
    action: String,
    key: Option<String>,
    value: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    exercise: &'a str,
    status: &'a str,
    xp: u32,
}

/// Read commands from a script file
pub fn read_commands(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Command, CsvError>>, CsvError> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            Row { line, row }.command()
        }))
}

/// Write the report in csv format
pub fn write_report(
    rows: impl IntoIterator<Item = ReportRow>,
    out: impl io::Write,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);

    for row in rows {
        writer.serialize(OutputRow {
            exercise: &row.exercise,
            status: &row.status,
            xp: row.xp,
        })?;
    }

    writer.flush()?;
    Ok(())
}

/// A parsed row with its line number, for error reporting.
struct Row {
    line: usize,
    row: InputRow,
}

impl Row {
    fn command(self) -> Result<Command, CsvError> {
        match self.row.page.as_str() {
            "lessons" => self.lessons().map(Command::Lessons),
            "quest" => self.quest().map(Command::Quest),
            "quiz" => self.quiz().map(Command::Quiz),
            "case_study" => self.case_study().map(Command::CaseStudy),
            "tutorial" => self.tutorial().map(Command::Tutorial),
            "checkin" => self.checkin().map(Command::CheckIn),
            "buddy" => self.buddy(),
            "board" => self.board(),
            "route" => self.route(),
            _ => Err(CsvError::UnrecognizedPage {
                line: self.line,
                page: self.row.page,
            }),
        }
    }

    fn lessons(self) -> Result<LessonAction, CsvError> {
        Ok(match self.row.action.as_str() {
            "start" => LessonAction::Start,
            "open_exercise" => LessonAction::OpenExercise,
            "select_account" => LessonAction::ToggleAccount(self.key()?),
            "error_type" => LessonAction::SelectErrorType(self.value()?),
            "account" => self.edit_line(LineField::Account)?,
            "debit" => self.edit_line(LineField::Debit)?,
            "credit" => self.edit_line(LineField::Credit)?,
            "add_line" => LessonAction::AddLine,
            "remove_line" => LessonAction::RemoveLine(self.line_index()?),
            "impact" => LessonAction::SelectImpact(self.value()?),
            "submit" => LessonAction::Submit,
            "reflect" => {
                let field = match self.key()?.as_str() {
                    "most_difficult" => ReflectionField::MostDifficult,
                    "confidence" => ReflectionField::Confidence,
                    other => return Err(self.invalid("reflection field", other)),
                };
                LessonAction::Reflect {
                    field,
                    value: self.value_or_empty(),
                }
            }
            "submit_reflection" => LessonAction::SubmitReflection,
            "leave" => LessonAction::Leave,
            _ => return Err(self.unrecognized()),
        })
    }

    fn quest(self) -> Result<QuestAction, CsvError> {
        Ok(match self.row.action.as_str() {
            "begin" => QuestAction::Begin,
            "toggle_row" => QuestAction::ToggleRow(self.key()?),
            "continue" => QuestAction::Continue,
            "answer" => QuestAction::ChooseAnswer(self.value()?),
            "submit_answer" => QuestAction::SubmitAnswer,
            "action" => QuestAction::ChooseAction(self.value()?),
            "submit_action" => QuestAction::SubmitAction,
            "proceed" => QuestAction::Proceed,
            "confidence" => QuestAction::SetConfidence(self.parse_value("confidence")?),
            "reflection" => QuestAction::SetReflection(self.value_or_empty()),
            "finish" => QuestAction::Finish,
            "help" => QuestAction::Help,
            _ => return Err(self.unrecognized()),
        })
    }

    fn quiz(self) -> Result<QuizAction, CsvError> {
        Ok(match self.row.action.as_str() {
            "answer" => QuizAction::Answer {
                question: self.key()?,
                key: self.value()?,
            },
            "submit" => QuizAction::Submit,
            "retake" => QuizAction::Retake,
            "continue" => QuizAction::ContinueToCaseStudy,
            "back" => QuizAction::Back,
            _ => return Err(self.unrecognized()),
        })
    }

    fn case_study(self) -> Result<CaseStudyAction, CsvError> {
        Ok(match self.row.action.as_str() {
            "set" => {
                let key = self.key()?;
                let field: Field = key.parse().map_err(|_| self.invalid("field", &key))?;
                CaseStudyAction::Set {
                    field,
                    value: self.value_or_empty(),
                }
            }
            "submit" => CaseStudyAction::Submit,
            "complete" => CaseStudyAction::Complete,
            "back" => CaseStudyAction::BackToQuiz,
            "next_level" => CaseStudyAction::NextLevel,
            _ => return Err(self.unrecognized()),
        })
    }

    fn tutorial(self) -> Result<TutorialAction, CsvError> {
        Ok(match self.row.action.as_str() {
            "next" => TutorialAction::Next,
            "prev" => TutorialAction::Prev,
            "goto" => TutorialAction::Goto(self.number("slide")?),
            "flip" => TutorialAction::FlipCard(self.key()?),
            "expand" => TutorialAction::ToggleAccountType(self.key()?),
            "mini_quiz" => TutorialAction::AnswerMiniQuiz(self.value()?),
            "equation" => TutorialAction::AnswerEquation(self.value_or_empty()),
            "double_entry" => TutorialAction::AnswerDoubleEntry {
                debit: self.key()?,
                credit: self.value()?,
            },
            "reset_double_entry" => TutorialAction::ResetDoubleEntry,
            "start_quiz" => TutorialAction::StartQuiz,
            _ => return Err(self.unrecognized()),
        })
    }

    fn checkin(self) -> Result<CheckInAction, CsvError> {
        Ok(match self.row.action.as_str() {
            "mood" => {
                let value = self.value()?;
                let mood: Mood = value.parse().map_err(|_| self.invalid("mood", &value))?;
                CheckInAction::SelectMood(mood)
            }
            "rating" => CheckInAction::RateChallenge(self.parse_value("rating")?),
            "comment" => CheckInAction::Comment(self.value_or_empty()),
            "submit_mood" => CheckInAction::SubmitMood,
            "suggestion" => CheckInAction::WriteSuggestion(self.value_or_empty()),
            "submit_suggestion" => CheckInAction::SubmitSuggestion,
            _ => return Err(self.unrecognized()),
        })
    }

    fn buddy(self) -> Result<Command, CsvError> {
        if self.row.action != "send" {
            return Err(self.unrecognized());
        }
        let kind = match self.key()?.as_str() {
            "human" => BuddyKind::Human,
            "assistant" => BuddyKind::Assistant,
            other => return Err(self.invalid("buddy", other)),
        };
        Ok(Command::Buddy {
            kind,
            text: self.value_or_empty(),
        })
    }

    fn board(self) -> Result<Command, CsvError> {
        if self.row.action != "status" {
            return Err(self.unrecognized());
        }
        let value = self.value()?;
        let status: QuestStatus = value.parse().map_err(|_| self.invalid("status", &value))?;
        Ok(Command::Board {
            quest: self.key()?,
            status,
        })
    }

    fn route(self) -> Result<Command, CsvError> {
        if self.row.action != "visit" {
            return Err(self.unrecognized());
        }
        let route = self.key()?.parse::<Route>().unwrap_or(Route::NotFound);
        Ok(Command::Visit(route))
    }

    // field helpers

    fn key(&self) -> Result<String, CsvError> {
        self.required(&self.row.key, "key")
    }

    fn value(&self) -> Result<String, CsvError> {
        self.required(&self.row.value, "value")
    }

    fn value_or_empty(&self) -> String {
        self.row.value.clone().unwrap_or_default()
    }

    fn required(&self, field: &Option<String>, name: &'static str) -> Result<String, CsvError> {
        field.clone().ok_or_else(|| CsvError::MissingField {
            line: self.line,
            action: self.row.action.clone(),
            field: name,
        })
    }

    fn parse_value<T: FromStr>(&self, name: &'static str) -> Result<T, CsvError> {
        let value = self.value()?;
        value.parse().map_err(|_| self.invalid(name, &value))
    }

    /// A 1-based number in the key column, as a 0-based index.
    fn number(&self, name: &'static str) -> Result<usize, CsvError> {
        let key = self.key()?;
        match key.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n - 1),
            _ => Err(self.invalid(name, &key)),
        }
    }

    fn line_index(&self) -> Result<usize, CsvError> {
        self.number("line")
    }

    fn edit_line(&self, field: LineField) -> Result<LessonAction, CsvError> {
        Ok(LessonAction::EditLine {
            index: self.line_index()?,
            field,
            value: self.value_or_empty(),
        })
    }

    fn unrecognized(&self) -> CsvError {
        CsvError::UnrecognizedAction {
            line: self.line,
            page: self.row.page.clone(),
            action: self.row.action.clone(),
        }
    }

    fn invalid(&self, field: &'static str, value: &str) -> CsvError {
        CsvError::InvalidValue {
            line: self.line,
            field,
            value: value.to_string(),
        }
    }
}
