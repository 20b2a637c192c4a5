//! Teams and their per-round scores
//!
//! A team is a participant group whose points are tracked per round. Teams
//! live in a global registry and may take part in several quizzes, so the
//! score map is keyed by round id across all of them. Totals are always
//! computed against a given set of rounds, which keeps entries for removed
//! rounds from leaking into a leaderboard.

use std::collections::HashMap;

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::{color::Color, constants, id::Id, quiz::round::Round};

/// Fields needed to create or edit a team
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TeamDraft {
    /// Display name of the team
    #[garde(length(chars, min = 1, max = constants::team::MAX_NAME_LENGTH))]
    pub name: String,
    /// Display color, or `None` for a palette color
    #[garde(skip)]
    pub color: Option<Color>,
}

impl TeamDraft {
    /// Creates a draft, trimming surrounding whitespace from the name
    pub fn new(name: &str, color: Option<Color>) -> Self {
        Self {
            name: name.trim().to_owned(),
            color,
        }
    }

    pub(crate) fn trimmed(self) -> Self {
        Self::new(&self.name, self.color)
    }
}

/// A team taking part in one or more quizzes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: Id,
    name: String,
    color: Color,
    /// Points per round id, at most one entry per round
    scores: HashMap<Id, u32>,
}

impl Team {
    pub(crate) fn new(draft: TeamDraft) -> Self {
        Self {
            id: Id::new(),
            name: draft.name,
            color: draft.color.unwrap_or_else(Color::random),
            scores: HashMap::new(),
        }
    }

    /// Unique identifier of the team
    pub fn id(&self) -> Id {
        self.id
    }

    /// Display name of the team
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display color of the team
    pub fn color(&self) -> Color {
        self.color
    }

    /// Points recorded for a round, `0` when the round has not been scored
    pub fn score(&self, round_id: Id) -> u32 {
        self.scores.get(&round_id).copied().unwrap_or_default()
    }

    /// Whether any points have been recorded for a round
    pub fn has_score(&self, round_id: Id) -> bool {
        self.scores.contains_key(&round_id)
    }

    /// Sum of the points recorded for the given rounds
    ///
    /// Entries for rounds outside `rounds` are ignored.
    pub fn total_score<'a, I: IntoIterator<Item = &'a Round>>(&self, rounds: I) -> u64 {
        rounds
            .into_iter()
            .map(|round| u64::from(self.score(round.id())))
            .sum()
    }

    /// Number of recorded scores, including ones for rounds of other quizzes
    pub fn scored_rounds_count(&self) -> usize {
        self.scores.len()
    }

    pub(crate) fn set_score(&mut self, round_id: Id, points: u32) {
        self.scores.insert(round_id, points);
    }

    pub(crate) fn clear_score(&mut self, round_id: Id) -> Option<u32> {
        self.scores.remove(&round_id)
    }

    /// Drops every score for which `keep(round_id, points)` fails
    pub(crate) fn retain_scores<F: FnMut(Id, u32) -> bool>(&mut self, mut keep: F) {
        self.scores.retain(|round_id, points| keep(*round_id, *points));
    }

    pub(crate) fn apply(&mut self, draft: TeamDraft) {
        self.name = draft.name;
        if let Some(color) = draft.color {
            self.color = color;
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::quiz::round::RoundDraft;

    fn team() -> Team {
        Team::new(TeamDraft::new("Quizzly Bears", Some(Color::rgb(1, 2, 3))))
    }

    #[test]
    fn test_team_new_has_no_scores() {
        let team = team();
        assert_eq!(team.name(), "Quizzly Bears");
        assert_eq!(team.color(), Color::rgb(1, 2, 3));
        assert_eq!(team.scored_rounds_count(), 0);
    }

    #[test]
    fn test_team_default_color_is_assigned() {
        let team = Team::new(TeamDraft::new("Les Quizerables", None));
        let serialized = serde_json::to_value(&team).unwrap();
        assert!(serialized["color"].as_str().unwrap().starts_with('#'));
    }

    #[test]
    fn test_team_score_defaults_to_zero() {
        let team = team();
        let round_id = Id::new();
        assert_eq!(team.score(round_id), 0);
        assert!(!team.has_score(round_id));
    }

    #[test]
    fn test_team_set_score_overwrites() {
        let mut team = team();
        let round_id = Id::new();

        team.set_score(round_id, 4);
        team.set_score(round_id, 6);

        assert_eq!(team.score(round_id), 6);
        assert_eq!(team.scored_rounds_count(), 1);
    }

    #[test]
    fn test_team_total_ignores_other_rounds() {
        let mut team = team();
        let first = Round::new(RoundDraft::new("One", 10), 1);
        let second = Round::new(RoundDraft::new("Two", 10), 2);

        team.set_score(first.id(), 7);
        team.set_score(second.id(), 8);
        team.set_score(Id::new(), 9);

        assert_eq!(team.total_score([&first, &second]), 15);
        assert_eq!(team.total_score([&first]), 7);
    }

    #[test]
    fn test_team_retain_scores() {
        let mut team = team();
        let kept = Id::new();
        let dropped = Id::new();
        team.set_score(kept, 3);
        team.set_score(dropped, 5);

        team.retain_scores(|round_id, _| round_id == kept);

        assert!(team.has_score(kept));
        assert!(!team.has_score(dropped));
    }

    #[test]
    fn test_team_apply_keeps_color_when_unset() {
        let mut team = team();
        team.apply(TeamDraft::new("Renamed", None));

        assert_eq!(team.name(), "Renamed");
        assert_eq!(team.color(), Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_team_draft_validation() {
        assert!(TeamDraft::new("A", None).validate().is_ok());
        assert!(TeamDraft::new(" \t ", None).validate().is_err());
        assert!(
            TeamDraft::new(&"x".repeat(constants::team::MAX_NAME_LENGTH + 1), None)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_team_draft_length_counts_chars() {
        let name = "🍺".repeat(constants::team::MAX_NAME_LENGTH);
        assert!(TeamDraft::new(&name, None).validate().is_ok());
        assert!(
            TeamDraft::new(&format!("{name}🍺"), None)
                .validate()
                .is_err()
        );
    }
}
