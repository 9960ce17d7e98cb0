//! Exercise sessions.
//!
//! Each session is a plain value with a `reduce` function taking the current
//! state, one learner action and the fixture it plays against. A reducer
//! never mutates its input: it returns the next state together with an
//! outcome, or an error when the action makes no sense at the current step.
//! Wrong answers are outcomes, not errors.

pub mod case_study;
pub mod checkin;
pub mod lessons;
pub mod quest;
pub mod quiz;
pub mod tutorial;

/// Result of applying one action to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<S, O> {
    pub state: S,
    pub outcome: O,
}
