//! Multiple-choice accounting quiz.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::catalog::QuizFixture;
use crate::notice::Notice;
use crate::route::Route;
use crate::session::Transition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Perfect,
    Good,
    KeepPracticing,
}

impl Grade {
    /// Perfect needs every answer right, good at least two.
    pub fn from_score(correct: usize, total: usize) -> Self {
        if correct == total {
            Grade::Perfect
        } else if correct >= 2 {
            Grade::Good
        } else {
            Grade::KeepPracticing
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Grade::Perfect => "Perfect! You've mastered the basics! 🎉",
            Grade::Good => "Well done! Let's continue learning!",
            Grade::KeepPracticing => "Keep reviewing and try again!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    pub grade: Grade,
    /// Explanations of the questions answered wrong or left blank.
    pub missed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizAction {
    Answer { question: String, key: String },
    Submit,
    Retake,
    ContinueToCaseStudy,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizOutcome {
    Updated,
    Scored(Score),
    Navigate(Route),
}

impl QuizOutcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            QuizOutcome::Scored(score) => {
                let title = format!("Your score: {}/{}", score.correct, score.total);
                Some(match score.grade {
                    Grade::KeepPracticing => Notice::failure(title, score.grade.message()),
                    _ => Notice::success(title, score.grade.message()),
                })
            }
            QuizOutcome::Updated | QuizOutcome::Navigate(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("quiz already submitted")]
    AlreadySubmitted,

    #[error("quiz not submitted yet")]
    NotSubmitted,

    #[error("no question '{0}'")]
    UnknownQuestion(String),

    #[error("question {question} has no option '{key}'")]
    UnknownOption { question: String, key: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizState {
    answers: BTreeMap<String, String>,
    score: Option<Score>,
}

impl QuizState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&self, question: &str) -> Option<&str> {
        self.answers.get(question).map(String::as_str)
    }

    pub fn score(&self) -> Option<&Score> {
        self.score.as_ref()
    }

    pub fn is_submitted(&self) -> bool {
        self.score.is_some()
    }
}

pub fn reduce(
    state: &QuizState,
    action: QuizAction,
    quiz: &QuizFixture,
) -> Result<Transition<QuizState, QuizOutcome>, QuizError> {
    let mut next = state.clone();
    let outcome = match action {
        QuizAction::Answer { question, key } => {
            if next.is_submitted() {
                return Err(QuizError::AlreadySubmitted);
            }
            let q = quiz
                .questions
                .iter()
                .find(|q| q.id == question)
                .ok_or_else(|| QuizError::UnknownQuestion(question.clone()))?;
            if !q.has_option(&key) {
                return Err(QuizError::UnknownOption { question, key });
            }
            next.answers.insert(question, key);
            QuizOutcome::Updated
        }
        QuizAction::Submit => {
            if next.is_submitted() {
                return Err(QuizError::AlreadySubmitted);
            }
            let score = score(&next.answers, quiz);
            next.score = Some(score.clone());
            QuizOutcome::Scored(score)
        }
        QuizAction::Retake => {
            if !next.is_submitted() {
                return Err(QuizError::NotSubmitted);
            }
            next = QuizState::new();
            QuizOutcome::Updated
        }
        QuizAction::ContinueToCaseStudy => QuizOutcome::Navigate(Route::AccountingCaseStudy),
        QuizAction::Back => QuizOutcome::Navigate(Route::LearnAccounting),
    };
    Ok(Transition {
        state: next,
        outcome,
    })
}

fn score(answers: &BTreeMap<String, String>, quiz: &QuizFixture) -> Score {
    let mut correct = 0;
    let mut missed = Vec::new();
    for question in &quiz.questions {
        if question.is_correct(answers.get(&question.id).map(String::as_str)) {
            correct += 1;
        } else {
            missed.push(question.explanation.clone());
        }
    }
    let total = quiz.questions.len();
    Score {
        correct,
        total,
        grade: Grade::from_score(correct, total),
        missed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn fixture() -> QuizFixture {
        Catalog::builtin().unwrap().quiz
    }

    fn answered(quiz: &QuizFixture, answers: &[(&str, &str)]) -> QuizState {
        answers.iter().fold(QuizState::new(), |state, (q, key)| {
            let action = QuizAction::Answer {
                question: q.to_string(),
                key: key.to_string(),
            };
            reduce(&state, action, quiz).unwrap().state
        })
    }

    fn submit(state: &QuizState, quiz: &QuizFixture) -> Score {
        match reduce(state, QuizAction::Submit, quiz).unwrap().outcome {
            QuizOutcome::Scored(score) => score,
            other => panic!("expected a score, got {other:?}"),
        }
    }

    #[test]
    fn all_correct_is_perfect() {
        let quiz = fixture();
        let state = answered(&quiz, &[("q1", "c"), ("q2", "b"), ("q3", "b")]);
        let score = submit(&state, &quiz);
        assert_eq!(score.correct, 3);
        assert_eq!(score.grade, Grade::Perfect);
        assert!(score.missed.is_empty());
    }

    #[test]
    fn two_right_is_good_with_one_explanation() {
        let quiz = fixture();
        let state = answered(&quiz, &[("q1", "a"), ("q2", "b"), ("q3", "b")]);
        let score = submit(&state, &quiz);
        assert_eq!(score.correct, 2);
        assert_eq!(score.grade, Grade::Good);
        assert_eq!(score.missed.len(), 1);
        assert!(score.missed[0].contains("Office furniture"));
    }

    #[test]
    fn unanswered_counts_as_wrong() {
        let quiz = fixture();
        let state = answered(&quiz, &[("q2", "b")]);
        let transition = reduce(&state, QuizAction::Submit, &quiz).unwrap();
        let notice = transition.outcome.notice().unwrap();
        assert_eq!(notice.title, "Your score: 1/3");
        assert!(notice.is_failure());
        assert_eq!(transition.state.score().unwrap().grade, Grade::KeepPracticing);
    }

    #[test]
    fn double_submit_is_an_error() {
        let quiz = fixture();
        let state = reduce(&QuizState::new(), QuizAction::Submit, &quiz)
            .unwrap()
            .state;
        assert_eq!(
            reduce(&state, QuizAction::Submit, &quiz).unwrap_err(),
            QuizError::AlreadySubmitted
        );
    }

    #[test]
    fn retake_clears_answers() {
        let quiz = fixture();
        let state = answered(&quiz, &[("q1", "c")]);
        let state = reduce(&state, QuizAction::Submit, &quiz).unwrap().state;
        let state = reduce(&state, QuizAction::Retake, &quiz).unwrap().state;
        assert!(!state.is_submitted());
        assert_eq!(state.answer("q1"), None);
    }

    #[test]
    fn unknown_question_or_option() {
        let quiz = fixture();
        let bad_question = QuizAction::Answer {
            question: "q9".into(),
            key: "a".into(),
        };
        assert!(matches!(
            reduce(&QuizState::new(), bad_question, &quiz),
            Err(QuizError::UnknownQuestion(_))
        ));
        let bad_key = QuizAction::Answer {
            question: "q1".into(),
            key: "e".into(),
        };
        assert!(matches!(
            reduce(&QuizState::new(), bad_key, &quiz),
            Err(QuizError::UnknownOption { .. })
        ));
    }

    #[test]
    fn continue_goes_to_case_study() {
        let quiz = fixture();
        let outcome = reduce(&QuizState::new(), QuizAction::ContinueToCaseStudy, &quiz)
            .unwrap()
            .outcome;
        assert_eq!(outcome, QuizOutcome::Navigate(Route::AccountingCaseStudy));
    }
}
