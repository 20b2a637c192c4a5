//! Quizzes and their rounds
//!
//! A quiz is a single pub-quiz event. It owns an ordered list of rounds and
//! moves through a linear lifecycle: planned, active, completed. Round
//! completion is tracked per round and is independent of the quiz status.

pub mod round;

use enum_map::Enum;
use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use web_time::SystemTime;

use crate::{constants, id::Id};

use round::{Round, RoundDraft};

/// Lifecycle status of a quiz
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize, derive_more::Display,
)]
pub enum Status {
    /// Created but not started yet
    #[display("planned")]
    Planned,
    /// Live play in progress
    #[display("active")]
    Active,
    /// Finished; no further play expected
    #[display("completed")]
    Completed,
}

/// Fields needed to create or edit a quiz
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuizDraft {
    /// Display name of the quiz
    #[garde(length(chars, min = 1, max = constants::quiz::MAX_NAME_LENGTH))]
    pub name: String,
    /// Where the quiz takes place (may be empty)
    #[garde(length(chars, max = constants::quiz::MAX_VENUE_LENGTH))]
    pub venue: String,
    /// When the quiz takes place
    #[garde(skip)]
    pub date: SystemTime,
}

impl QuizDraft {
    /// Creates a draft, trimming surrounding whitespace from the text fields
    pub fn new(name: &str, venue: &str, date: SystemTime) -> Self {
        Self {
            name: name.trim().to_owned(),
            venue: venue.trim().to_owned(),
            date,
        }
    }

    pub(crate) fn trimmed(self) -> Self {
        Self::new(&self.name, &self.venue, self.date)
    }
}

/// A single pub-quiz event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    id: Id,
    name: String,
    venue: String,
    date: SystemTime,
    status: Status,
    rounds: Vec<Round>,
    /// Number handed to the next round added
    next_round_number: u32,
}

impl Quiz {
    pub(crate) fn new(draft: QuizDraft) -> Self {
        Self {
            id: Id::new(),
            name: draft.name,
            venue: draft.venue,
            date: draft.date,
            status: Status::Planned,
            rounds: Vec::new(),
            next_round_number: 1,
        }
    }

    /// Unique identifier of the quiz
    pub fn id(&self) -> Id {
        self.id
    }

    /// Display name of the quiz
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Venue of the quiz
    pub fn venue(&self) -> &str {
        &self.venue
    }

    /// Date of the quiz
    pub fn date(&self) -> SystemTime {
        self.date
    }

    /// Current lifecycle status
    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether live play is in progress
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Whether the quiz has finished
    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Rounds in the order they are stored
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Looks up a round of this quiz
    pub fn round(&self, round_id: Id) -> Option<&Round> {
        self.rounds.iter().find(|round| round.id() == round_id)
    }

    pub(crate) fn round_mut(&mut self, round_id: Id) -> Option<&mut Round> {
        self.rounds.iter_mut().find(|round| round.id() == round_id)
    }

    /// Whether `round_id` names one of this quiz's rounds
    pub fn has_round(&self, round_id: Id) -> bool {
        self.round(round_id).is_some()
    }

    /// Rounds in definition order
    pub fn sorted_rounds(&self) -> Vec<&Round> {
        self.rounds.iter().sorted_by_key(|round| round.number()).collect_vec()
    }

    /// The first round in definition order that is not completed
    ///
    /// Returns `None` when the quiz has no rounds or all of them are completed.
    pub fn current_round(&self) -> Option<&Round> {
        self.sorted_rounds()
            .into_iter()
            .find(|round| !round.is_completed())
    }

    /// Number of rounds marked as completed
    pub fn completed_rounds_count(&self) -> usize {
        self.rounds.iter().filter(|round| round.is_completed()).count()
    }

    /// Fraction of rounds completed, in `0.0..=1.0`
    ///
    /// A quiz without rounds has no progress.
    pub fn progress(&self) -> f64 {
        if self.rounds.is_empty() {
            0.0
        } else {
            self.completed_rounds_count() as f64 / self.rounds.len() as f64
        }
    }

    pub(crate) fn apply(&mut self, draft: QuizDraft) {
        self.name = draft.name;
        self.venue = draft.venue;
        self.date = draft.date;
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Returns `None` once round numbers are exhausted
    pub(crate) fn push_round(&mut self, draft: RoundDraft) -> Option<Id> {
        let number = self.next_round_number;
        self.next_round_number = number.checked_add(1)?;
        let round = Round::new(draft, number);
        let id = round.id();
        self.rounds.push(round);
        Some(id)
    }

    pub(crate) fn remove_round(&mut self, round_id: Id) -> Option<Round> {
        let index = self.rounds.iter().position(|round| round.id() == round_id)?;
        Some(self.rounds.remove(index))
    }
}
