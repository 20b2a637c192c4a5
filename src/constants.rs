//! Configuration constants for the quiz scoring model
//!
//! This module contains the limits used to validate drafts and options,
//! keeping quizzes, rounds and teams within sensible boundaries for a
//! live pub-quiz event.

/// Quiz configuration constants
pub mod quiz {
    /// Maximum length of a quiz name
    pub const MAX_NAME_LENGTH: usize = 100;
    /// Maximum length of a venue label
    pub const MAX_VENUE_LENGTH: usize = 100;
    /// Maximum number of rounds in a single quiz
    pub const MAX_ROUNDS_COUNT: usize = 50;
    /// Maximum number of teams taking part in a single quiz
    pub const MAX_TEAMS_COUNT: usize = 200;
}

/// Round configuration constants
pub mod round {
    /// Maximum length of a round name
    pub const MAX_NAME_LENGTH: usize = 100;
    /// Smallest points cap a round can have
    pub const MIN_POINTS: u32 = 1;
    /// Largest points cap a round can have
    pub const MAX_POINTS: u32 = 1000;
    /// Points cap used when none is configured
    pub const DEFAULT_MAX_POINTS: u32 = 10;
}

/// Team configuration constants
pub mod team {
    /// Maximum length of a team name
    pub const MAX_NAME_LENGTH: usize = 50;
}

/// Leaderboard configuration constants
pub mod leaderboard {
    /// Number of standings shown when none is configured
    pub const DEFAULT_LIMIT: usize = 50;
}
