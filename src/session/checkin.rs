//! Daily mood check-in and suggestion box.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::notice::Notice;
use crate::session::Transition;

pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;
const DEFAULT_RATING: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Great,
    Good,
    Okay,
    Challenging,
}

impl FromStr for Mood {
    type Err = CheckInError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "great" => Ok(Mood::Great),
            "good" => Ok(Mood::Good),
            "okay" => Ok(Mood::Okay),
            "challenging" => Ok(Mood::Challenging),
            other => Err(CheckInError::UnknownMood(other.to_string())),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mood::Great => "Great",
            Mood::Good => "Good",
            Mood::Okay => "Okay",
            Mood::Challenging => "Challenging",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInAction {
    SelectMood(Mood),
    RateChallenge(u8),
    Comment(String),
    SubmitMood,
    WriteSuggestion(String),
    SubmitSuggestion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInOutcome {
    Updated,
    MoodRecorded(Mood),
    MoodMissing,
    SuggestionReceived,
    SuggestionEmpty,
}

impl CheckInOutcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            CheckInOutcome::MoodRecorded(_) => Some(Notice::success(
                "Feedback submitted",
                "Thank you for sharing how you're feeling today!",
            )),
            CheckInOutcome::MoodMissing => Some(Notice::failure(
                "Please select a mood",
                "Let us know how you're feeling today",
            )),
            CheckInOutcome::SuggestionReceived => Some(Notice::success(
                "Suggestion received",
                "Thank you for helping us improve!",
            )),
            CheckInOutcome::SuggestionEmpty => Some(Notice::failure(
                "Empty suggestion",
                "Please enter your suggestion before submitting",
            )),
            CheckInOutcome::Updated => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckInError {
    #[error("unknown mood '{0}'")]
    UnknownMood(String),

    #[error("challenge rating must be between 1 and 5, got {0}")]
    Rating(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInState {
    mood: Option<Mood>,
    rating: u8,
    comment: String,
    last_check_in: Option<Mood>,
    suggestion: String,
    suggestions: Vec<String>,
}

impl Default for CheckInState {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckInState {
    pub fn new() -> Self {
        Self {
            mood: None,
            rating: DEFAULT_RATING,
            comment: String::new(),
            last_check_in: None,
            suggestion: String::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn mood(&self) -> Option<Mood> {
        self.mood
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn last_check_in(&self) -> Option<Mood> {
        self.last_check_in
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }
}

pub fn reduce(
    state: &CheckInState,
    action: CheckInAction,
) -> Result<Transition<CheckInState, CheckInOutcome>, CheckInError> {
    let mut next = state.clone();
    let outcome = match action {
        CheckInAction::SelectMood(mood) => {
            next.mood = Some(mood);
            CheckInOutcome::Updated
        }
        CheckInAction::RateChallenge(rating) => {
            if !RATING_RANGE.contains(&rating) {
                return Err(CheckInError::Rating(rating));
            }
            next.rating = rating;
            CheckInOutcome::Updated
        }
        CheckInAction::Comment(text) => {
            next.comment = text;
            CheckInOutcome::Updated
        }
        CheckInAction::SubmitMood => match next.mood {
            Some(mood) => {
                next.last_check_in = Some(mood);
                CheckInOutcome::MoodRecorded(mood)
            }
            None => CheckInOutcome::MoodMissing,
        },
        CheckInAction::WriteSuggestion(text) => {
            next.suggestion = text;
            CheckInOutcome::Updated
        }
        CheckInAction::SubmitSuggestion => {
            if next.suggestion.trim().is_empty() {
                CheckInOutcome::SuggestionEmpty
            } else {
                let text = std::mem::take(&mut next.suggestion);
                next.suggestions.push(text);
                CheckInOutcome::SuggestionReceived
            }
        }
    };
    Ok(Transition {
        state: next,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(state: &CheckInState, action: CheckInAction) -> (CheckInState, CheckInOutcome) {
        let t = reduce(state, action).unwrap();
        (t.state, t.outcome)
    }

    #[test]
    fn mood_is_required() {
        let (state, outcome) = apply(&CheckInState::new(), CheckInAction::SubmitMood);
        assert_eq!(outcome, CheckInOutcome::MoodMissing);
        assert_eq!(outcome.notice().unwrap().title, "Please select a mood");
        assert_eq!(state.last_check_in(), None);
    }

    #[test]
    fn mood_is_recorded() {
        let (state, _) = apply(&CheckInState::new(), CheckInAction::SelectMood(Mood::Okay));
        let (state, outcome) = apply(&state, CheckInAction::SubmitMood);
        assert_eq!(outcome, CheckInOutcome::MoodRecorded(Mood::Okay));
        assert_eq!(state.last_check_in(), Some(Mood::Okay));
        assert!(!outcome.notice().unwrap().is_failure());
    }

    #[test]
    fn rating_defaults_to_three_and_is_bounded() {
        let state = CheckInState::new();
        assert_eq!(state.rating(), 3);
        assert_eq!(
            reduce(&state, CheckInAction::RateChallenge(0)).unwrap_err(),
            CheckInError::Rating(0)
        );
        assert_eq!(
            reduce(&state, CheckInAction::RateChallenge(6)).unwrap_err(),
            CheckInError::Rating(6)
        );
        let (state, _) = apply(&state, CheckInAction::RateChallenge(5));
        assert_eq!(state.rating(), 5);
    }

    #[test]
    fn blank_suggestion_is_refused() {
        let (state, _) = apply(&CheckInState::new(), CheckInAction::WriteSuggestion("   ".into()));
        let (state, outcome) = apply(&state, CheckInAction::SubmitSuggestion);
        assert_eq!(outcome, CheckInOutcome::SuggestionEmpty);
        assert!(state.suggestions().is_empty());
    }

    #[test]
    fn suggestion_is_kept_and_box_cleared() {
        let (state, _) = apply(
            &CheckInState::new(),
            CheckInAction::WriteSuggestion("More lemonade".into()),
        );
        let (state, outcome) = apply(&state, CheckInAction::SubmitSuggestion);
        assert_eq!(outcome, CheckInOutcome::SuggestionReceived);
        assert_eq!(state.suggestions(), ["More lemonade".to_string()]);

        let (_, outcome) = apply(&state, CheckInAction::SubmitSuggestion);
        assert_eq!(outcome, CheckInOutcome::SuggestionEmpty);
    }

    #[test]
    fn mood_parsing() {
        assert_eq!("challenging".parse::<Mood>(), Ok(Mood::Challenging));
        assert!("sad".parse::<Mood>().is_err());
        assert_eq!(Mood::Great.to_string(), "Great");
    }
}
