//! Scorekeeper options
//!
//! Options can be built in code or deserialized from any serde format;
//! missing fields fall back to the defaults in [`crate::constants`].

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::constants;

/// Tunable behavior of a scorekeeper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Options {
    /// Points cap suggested for new rounds
    #[garde(range(min = constants::round::MIN_POINTS, max = constants::round::MAX_POINTS))]
    pub default_max_points: u32,
    /// Number of standings returned by [`crate::Scorekeeper::top_standings`]
    #[garde(range(min = 1, max = constants::quiz::MAX_TEAMS_COUNT))]
    pub leaderboard_limit: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            default_max_points: constants::round::DEFAULT_MAX_POINTS,
            leaderboard_limit: constants::leaderboard::DEFAULT_LIMIT,
        }
    }
}
