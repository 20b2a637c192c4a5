//! # Quizboard
//!
//! This library provides the scoring and ranking model for running live
//! pub-quiz events. It keeps track of quizzes, their rounds and the teams
//! taking part, records per-round scores, and derives leaderboards and
//! completion progress from that data.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
use derive_where::derive_where;
use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;

pub mod book;
pub mod color;
pub mod config;
pub mod constants;
pub mod id;
pub mod leaderboard;
pub mod quiz;
pub mod scorekeeper;
pub mod store;
pub mod teams;

pub use id::Id;
pub use scorekeeper::Scorekeeper;

/// Kinds of records the model can refer to in errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum Entity {
    /// A quiz
    #[display("quiz")]
    Quiz,
    /// A round of a quiz
    #[display("round")]
    Round,
    /// A team
    #[display("team")]
    Team,
}

/// Errors returned by the scoring model
#[derive(Error, Serialize, Debug, Clone, PartialEq)]
pub enum Error {
    /// The points exceed the round's cap
    #[error("score of {points} is outside 0..={max_points}")]
    ScoreOutOfRange {
        /// Points that were submitted
        points: u32,
        /// Cap of the round
        max_points: u32,
    },
    /// No record with this id exists where it was looked up
    #[error("{0} {1} not found")]
    NotFound(Entity, Id),
    /// The team does not take part in the quiz
    #[error("team {team} does not take part in quiz {quiz}")]
    NotMember {
        /// The quiz that was addressed
        quiz: Id,
        /// The team that was addressed
        team: Id,
    },
    /// The quiz cannot take more records of this kind
    #[error("quiz {1} cannot take another {0}")]
    Full(Entity, Id),
    /// The quiz status does not allow this transition
    #[error("quiz cannot go from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: quiz::Status,
        /// Requested status
        to: quiz::Status,
    },
    /// A draft or options value failed validation
    #[error("invalid input: {0}")]
    Invalid(String),
    /// The mutation was applied in memory but could not be saved
    #[error("failed to save: {0}")]
    Persistence(String),
}

impl From<garde::Report> for Error {
    fn from(report: garde::Report) -> Self {
        Self::Invalid(report.to_string())
    }
}

/// A truncated vector that maintains the exact count while limiting displayed items
///
/// This structure is useful for displaying a limited number of items while
/// still showing the total count. For example, showing "40 teams" but only
/// listing the top ten.
#[derive(Debug, Clone, Serialize)]
#[derive_where(Default)]
pub struct TruncatedVec<T> {
    /// The exact total count of items
    exact_count: usize,
    /// The truncated list of items (up to the limit)
    items: Vec<T>,
}

impl<T: Clone> TruncatedVec<T> {
    /// Creates a new truncated vector from an iterator
    ///
    /// # Arguments
    ///
    /// * `list` - An iterator over items to include
    /// * `limit` - Maximum number of items to include in the truncated vector
    /// * `exact_count` - The exact total count of items (may be larger than limit)
    pub fn new<I: Iterator<Item = T>>(list: I, limit: usize, exact_count: usize) -> Self {
        let items = list.take(limit).collect_vec();
        Self { exact_count, items }
    }

    /// Maps a function over the items in the truncated vector
    pub fn map<F, U>(self, f: F) -> TruncatedVec<U>
    where
        F: Fn(T) -> U,
    {
        TruncatedVec {
            exact_count: self.exact_count,
            items: self.items.into_iter().map(f).collect_vec(),
        }
    }

    /// Returns the exact count of items
    pub fn exact_count(&self) -> usize {
        self.exact_count
    }

    /// Returns the truncated items
    pub fn items(&self) -> &[T] {
        &self.items
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_vec_new() {
        let truncated = TruncatedVec::new(vec![1, 2, 3, 4, 5].into_iter(), 3, 5);

        assert_eq!(truncated.exact_count(), 5);
        assert_eq!(truncated.items(), &[1, 2, 3]);
    }

    #[test]
    fn test_truncated_vec_limit_larger_than_items() {
        let truncated = TruncatedVec::new(vec![1, 2, 3].into_iter(), 5, 3);

        assert_eq!(truncated.exact_count(), 3);
        assert_eq!(truncated.items(), &[1, 2, 3]);
    }

    #[test]
    fn test_truncated_vec_map() {
        let truncated = TruncatedVec::new(vec![1, 2, 3].into_iter(), 2, 3);
        let mapped = truncated.map(|x| format!("team_{x}"));

        assert_eq!(mapped.exact_count(), 3);
        assert_eq!(mapped.items(), &["team_1", "team_2"]);
    }

    #[test]
    fn test_error_messages() {
        let id = Id::new();
        assert_eq!(
            Error::ScoreOutOfRange {
                points: 15,
                max_points: 10
            }
            .to_string(),
            "score of 15 is outside 0..=10"
        );
        assert_eq!(
            Error::NotFound(Entity::Round, id).to_string(),
            format!("round {id} not found")
        );
        assert_eq!(
            Error::InvalidTransition {
                from: quiz::Status::Completed,
                to: quiz::Status::Active
            }
            .to_string(),
            "quiz cannot go from completed to active"
        );
    }

    #[test]
    fn test_error_from_report() {
        use garde::Validate;

        let report = teams::TeamDraft::new("", None).validate().unwrap_err();
        assert!(matches!(Error::from(report), Error::Invalid(_)));
    }
}
