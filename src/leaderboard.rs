//! Leaderboard and scoring summaries
//!
//! This module ranks the teams of a quiz by their total score and provides
//! the per-round breakdown and statistics shown to hosts and read by export
//! collaborators. Standings are recomputed from the stored scores every time;
//! nothing here is cached.

use std::cmp::Reverse;

use itertools::Itertools;
use serde::Serialize;

use super::{
    TruncatedVec,
    color::Color,
    id::Id,
    quiz::{Quiz, round::Round},
    teams::Team,
};

/// Orders teams by total score over the quiz's rounds
///
/// Higher totals come first. Equal totals are ordered by name, ignoring
/// case, and teams that still tie keep their order in `teams`.
pub fn rank<'a>(quiz: &Quiz, teams: impl IntoIterator<Item = &'a Team>) -> Vec<(&'a Team, u64)> {
    teams
        .into_iter()
        .map(|team| (team, team.total_score(quiz.rounds())))
        .sorted_by_cached_key(|(team, total)| (Reverse(*total), team.name().to_lowercase()))
        .collect_vec()
}

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// The ranked team
    pub team: Id,
    /// Name of the team
    pub name: String,
    /// Color of the team
    pub color: Color,
    /// Total points over the quiz's rounds
    pub points: u64,
    /// Position in the leaderboard (1-indexed, shared by equal totals)
    pub position: usize,
    /// Points for each round in definition order, `0` when unscored
    pub round_points: Vec<u32>,
}

/// Statistics for a single round across all teams of a quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    /// The summarized round
    pub round: Id,
    /// Name of the round
    pub name: String,
    /// Points cap of the round
    pub max_points: u32,
    /// Whether the round has been completed
    pub completed: bool,
    /// Number of teams with a recorded score
    pub scored: usize,
    /// Highest recorded score, `0` when nobody has scored
    pub highest: u32,
}

/// Standings and round statistics for one quiz
#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    quiz: Id,
    standings: Vec<Standing>,
    rounds: Vec<RoundSummary>,
}

impl Leaderboard {
    /// Computes the leaderboard of a quiz
    ///
    /// # Arguments
    ///
    /// * `quiz` - The quiz whose rounds are scored
    /// * `teams` - The teams taking part, in joining order
    pub fn new<'a>(quiz: &Quiz, teams: impl IntoIterator<Item = &'a Team>) -> Self {
        let rounds = quiz.sorted_rounds();
        let teams = teams.into_iter().collect_vec();

        let mut standings: Vec<Standing> = Vec::with_capacity(teams.len());
        for (index, (team, points)) in rank(quiz, teams.iter().copied()).into_iter().enumerate() {
            let position = match standings.last() {
                Some(previous) if previous.points == points => previous.position,
                _ => index + 1,
            };
            standings.push(Standing {
                team: team.id(),
                name: team.name().to_owned(),
                color: team.color(),
                points,
                position,
                round_points: rounds.iter().map(|round| team.score(round.id())).collect(),
            });
        }

        let rounds = rounds
            .into_iter()
            .map(|round| summarize(round, &teams))
            .collect();

        Self {
            quiz: quiz.id(),
            standings,
            rounds,
        }
    }

    /// The quiz this leaderboard belongs to
    pub fn quiz(&self) -> Id {
        self.quiz
    }

    /// All standings, best first
    pub fn standings(&self) -> &[Standing] {
        &self.standings
    }

    /// Per-round statistics in definition order
    pub fn rounds(&self) -> &[RoundSummary] {
        &self.rounds
    }

    /// The standing of a single team
    pub fn standing(&self, team_id: Id) -> Option<&Standing> {
        self.standings.iter().find(|standing| standing.team == team_id)
    }

    /// Teams sharing the first position
    pub fn leaders(&self) -> impl Iterator<Item = &Standing> {
        self.standings
            .iter()
            .take_while(|standing| standing.position == 1)
    }

    /// The best `limit` standings along with the total number of teams
    pub fn top(&self, limit: usize) -> TruncatedVec<Standing> {
        TruncatedVec::new(self.standings.iter().cloned(), limit, self.standings.len())
    }
}

fn summarize(round: &Round, teams: &[&Team]) -> RoundSummary {
    let scores = teams
        .iter()
        .filter(|team| team.has_score(round.id()))
        .map(|team| team.score(round.id()))
        .collect_vec();

    RoundSummary {
        round: round.id(),
        name: round.name().to_owned(),
        max_points: round.max_points(),
        completed: round.is_completed(),
        scored: scores.len(),
        highest: scores.into_iter().max().unwrap_or_default(),
    }
}
