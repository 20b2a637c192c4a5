//! Quiz rounds
//!
//! A round is one scoring segment of a quiz with a cap on the points any
//! team can be awarded for it.

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{constants, id::Id};

/// Fields needed to create or edit a round
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoundDraft {
    /// Display label of the round
    #[garde(length(chars, min = 1, max = constants::round::MAX_NAME_LENGTH))]
    pub name: String,
    /// Points cap for the round
    #[garde(range(min = constants::round::MIN_POINTS, max = constants::round::MAX_POINTS))]
    pub max_points: u32,
}

impl RoundDraft {
    /// Creates a draft, trimming surrounding whitespace from the name
    pub fn new(name: &str, max_points: u32) -> Self {
        Self {
            name: name.trim().to_owned(),
            max_points,
        }
    }

    pub(crate) fn trimmed(self) -> Self {
        Self::new(&self.name, self.max_points)
    }
}

/// A single round of a quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    id: Id,
    name: String,
    max_points: u32,
    /// Definition order within the quiz, starting at 1
    number: u32,
    completed: bool,
}

impl Round {
    pub(crate) fn new(draft: RoundDraft, number: u32) -> Self {
        Self {
            id: Id::new(),
            name: draft.name,
            max_points: draft.max_points,
            number,
            completed: false,
        }
    }

    /// Unique identifier of the round
    pub fn id(&self) -> Id {
        self.id
    }

    /// Display label of the round
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Highest score a team can receive for this round
    pub fn max_points(&self) -> u32 {
        self.max_points
    }

    /// Position of the round in definition order
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Whether the round has been marked as completed
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whether `points` is an acceptable score for this round
    pub fn accepts(&self, points: u32) -> bool {
        points <= self.max_points
    }

    /// Clamps raw operator input into `0..=max_points`
    ///
    /// This is a convenience for input fields; the scoring model itself
    /// rejects out-of-range scores instead of clamping them.
    pub fn clamp(&self, input: i64) -> u32 {
        u32::try_from(input.max(0)).map_or(self.max_points, |points| points.min(self.max_points))
    }

    pub(crate) fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    pub(crate) fn apply(&mut self, draft: RoundDraft) {
        self.name = draft.name;
        self.max_points = draft.max_points;
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn round(max_points: u32) -> Round {
        Round::new(RoundDraft::new("General Knowledge", max_points), 1)
    }

    #[test]
    fn test_round_new_is_open() {
        let round = round(10);
        assert_eq!(round.name(), "General Knowledge");
        assert_eq!(round.max_points(), 10);
        assert_eq!(round.number(), 1);
        assert!(!round.is_completed());
    }

    #[test]
    fn test_round_accepts_bounds() {
        let round = round(10);
        assert!(round.accepts(0));
        assert!(round.accepts(10));
        assert!(!round.accepts(11));
    }

    #[test]
    fn test_round_clamp() {
        let round = round(10);
        assert_eq!(round.clamp(-3), 0);
        assert_eq!(round.clamp(7), 7);
        assert_eq!(round.clamp(15), 10);
        assert_eq!(round.clamp(i64::MAX), 10);
    }

    #[test]
    fn test_round_draft_trims_name() {
        let draft = RoundDraft::new("  Music  ", 20);
        assert_eq!(draft.name, "Music");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_round_draft_validation() {
        assert!(RoundDraft::new("   ", 10).validate().is_err());
        assert!(RoundDraft::new("Pictures", 0).validate().is_err());
        assert!(
            RoundDraft::new("Pictures", constants::round::MAX_POINTS + 1)
                .validate()
                .is_err()
        );
        assert!(
            RoundDraft::new(&"a".repeat(constants::round::MAX_NAME_LENGTH + 1), 10)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_round_draft_length_counts_chars() {
        let name = "🍺".repeat(constants::round::MAX_NAME_LENGTH);
        assert!(RoundDraft::new(&name, 10).validate().is_ok());
        assert!(RoundDraft::new(&format!("{name}🍺"), 10).validate().is_err());
    }

    #[test]
    fn test_round_apply_draft() {
        let mut round = round(10);
        round.set_completed(true);
        round.apply(RoundDraft::new("Music", 20));

        assert_eq!(round.name(), "Music");
        assert_eq!(round.max_points(), 20);
        assert!(round.is_completed());
    }
}
