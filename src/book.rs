//! The persisted aggregate of teams, quizzes and memberships
//!
//! Teams are owned by a global registry rather than by any quiz. Which teams
//! play in which quiz is recorded in a separate membership relation of
//! `(quiz, team)` pairs, so a team can take part in several quizzes while
//! keeping a single record.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{id::Id, quiz::Quiz, teams::Team};

/// Serialization helper for Book struct
#[derive(Deserialize)]
struct BookSerde {
    teams: IndexMap<Id, Team>,
    quizzes: IndexMap<Id, Quiz>,
    members: IndexSet<(Id, Id)>,
}

/// All quizzes and teams known to a scorekeeper
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(from = "BookSerde")]
pub struct Book {
    /// Global team registry in creation order
    teams: IndexMap<Id, Team>,
    /// Quizzes in creation order
    quizzes: IndexMap<Id, Quiz>,
    /// Membership relation of `(quiz, team)` pairs in joining order
    members: IndexSet<(Id, Id)>,
}

impl From<BookSerde> for Book {
    /// Reconstructs the Book from serialized data
    ///
    /// Memberships naming unknown quizzes or teams are dropped, as are
    /// scores for rounds that do not belong to a quiz the team plays in and
    /// scores above their round's cap.
    fn from(serde: BookSerde) -> Self {
        let BookSerde {
            mut teams,
            quizzes,
            members,
        } = serde;

        let members: IndexSet<(Id, Id)> = members
            .into_iter()
            .filter(|(quiz, team)| quizzes.contains_key(quiz) && teams.contains_key(team))
            .collect();

        let round_owner: HashMap<Id, (Id, u32)> = quizzes
            .values()
            .flat_map(|quiz| {
                quiz.rounds()
                    .iter()
                    .map(move |round| (round.id(), (quiz.id(), round.max_points())))
            })
            .collect();

        for team in teams.values_mut() {
            let team_id = team.id();
            team.retain_scores(|round_id, points| {
                round_owner
                    .get(&round_id)
                    .is_some_and(|(quiz_id, max_points)| {
                        points <= *max_points && members.contains(&(*quiz_id, team_id))
                    })
            });
        }

        Self {
            teams,
            quizzes,
            members,
        }
    }
}

impl Book {
    /// Looks up a team in the registry
    pub fn team(&self, team_id: Id) -> Option<&Team> {
        self.teams.get(&team_id)
    }

    pub(crate) fn team_mut(&mut self, team_id: Id) -> Option<&mut Team> {
        self.teams.get_mut(&team_id)
    }

    /// All registered teams in creation order
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    /// Looks up a quiz
    pub fn quiz(&self, quiz_id: Id) -> Option<&Quiz> {
        self.quizzes.get(&quiz_id)
    }

    pub(crate) fn quiz_mut(&mut self, quiz_id: Id) -> Option<&mut Quiz> {
        self.quizzes.get_mut(&quiz_id)
    }

    /// All quizzes in creation order
    pub fn quizzes(&self) -> impl Iterator<Item = &Quiz> {
        self.quizzes.values()
    }

    /// Whether the team takes part in the quiz
    pub fn is_member(&self, quiz_id: Id, team_id: Id) -> bool {
        self.members.contains(&(quiz_id, team_id))
    }

    /// Teams of a quiz in joining order
    pub fn quiz_teams(&self, quiz_id: Id) -> Vec<&Team> {
        self.members
            .iter()
            .filter(|(quiz, _)| *quiz == quiz_id)
            .filter_map(|(_, team)| self.teams.get(team))
            .collect_vec()
    }

    /// Quizzes a team takes part in
    pub fn team_quizzes(&self, team_id: Id) -> Vec<&Quiz> {
        self.members
            .iter()
            .filter(|(_, team)| *team == team_id)
            .filter_map(|(quiz, _)| self.quizzes.get(quiz))
            .collect_vec()
    }

    /// Number of teams taking part in a quiz
    pub fn quiz_team_count(&self, quiz_id: Id) -> usize {
        self.members.iter().filter(|(quiz, _)| *quiz == quiz_id).count()
    }

    pub(crate) fn insert_team(&mut self, team: Team) {
        self.teams.insert(team.id(), team);
    }

    pub(crate) fn insert_quiz(&mut self, quiz: Quiz) {
        self.quizzes.insert(quiz.id(), quiz);
    }

    /// Returns `false` if the membership already existed
    pub(crate) fn join(&mut self, quiz_id: Id, team_id: Id) -> bool {
        self.members.insert((quiz_id, team_id))
    }

    /// Removes a membership and the team's scores for that quiz's rounds
    pub(crate) fn leave(&mut self, quiz_id: Id, team_id: Id) -> bool {
        if !self.members.shift_remove(&(quiz_id, team_id)) {
            return false;
        }
        if let (Some(quiz), Some(team)) = (self.quizzes.get(&quiz_id), self.teams.get_mut(&team_id))
        {
            team.retain_scores(|round_id, _| !quiz.has_round(round_id));
        }
        true
    }

    /// Removes a team from the registry and from every quiz
    pub(crate) fn remove_team(&mut self, team_id: Id) -> Option<Team> {
        let team = self.teams.shift_remove(&team_id)?;
        self.members.retain(|(_, team)| *team != team_id);
        Some(team)
    }

    /// Removes a quiz with its rounds, memberships and the scores for its rounds
    pub(crate) fn remove_quiz(&mut self, quiz_id: Id) -> Option<Quiz> {
        let quiz = self.quizzes.shift_remove(&quiz_id)?;
        self.members.retain(|(quiz, _)| *quiz != quiz_id);
        for team in self.teams.values_mut() {
            team.retain_scores(|round_id, _| !quiz.has_round(round_id));
        }
        Some(quiz)
    }

    /// Drops every team's score for a round
    pub(crate) fn forget_round(&mut self, round_id: Id) {
        for team in self.teams.values_mut() {
            team.clear_score(round_id);
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use web_time::SystemTime;

    use super::*;
    use crate::{
        quiz::{QuizDraft, round::RoundDraft},
        teams::TeamDraft,
    };

    fn book_with_quiz() -> (Book, Id, Id, Id) {
        let mut book = Book::default();
        let mut quiz = Quiz::new(QuizDraft::new("Quiz", "Pub", SystemTime::UNIX_EPOCH));
        let round_id = quiz.push_round(RoundDraft::new("One", 10)).unwrap();
        let quiz_id = quiz.id();
        book.insert_quiz(quiz);

        let team = Team::new(TeamDraft::new("Team", None));
        let team_id = team.id();
        book.insert_team(team);
        book.join(quiz_id, team_id);
        book.team_mut(team_id).unwrap().set_score(round_id, 5);

        (book, quiz_id, team_id, round_id)
    }

    #[test]
    fn test_book_join_is_idempotent() {
        let (mut book, quiz_id, team_id, _) = book_with_quiz();
        assert!(!book.join(quiz_id, team_id));
        assert_eq!(book.quiz_team_count(quiz_id), 1);
    }

    #[test]
    fn test_book_team_in_several_quizzes() {
        let (mut book, quiz_id, team_id, _) = book_with_quiz();
        let other = Quiz::new(QuizDraft::new("Other", "Pub", SystemTime::UNIX_EPOCH));
        let other_id = other.id();
        book.insert_quiz(other);
        book.join(other_id, team_id);

        let quizzes = book.team_quizzes(team_id).iter().map(|quiz| quiz.id()).collect_vec();
        assert_eq!(quizzes, vec![quiz_id, other_id]);
    }

    #[test]
    fn test_book_leave_prunes_scores() {
        let (mut book, quiz_id, team_id, round_id) = book_with_quiz();
        assert!(book.leave(quiz_id, team_id));
        assert!(!book.is_member(quiz_id, team_id));
        assert!(!book.team(team_id).unwrap().has_score(round_id));
        assert!(!book.leave(quiz_id, team_id));
    }

    #[test]
    fn test_book_remove_team_drops_memberships() {
        let (mut book, quiz_id, team_id, _) = book_with_quiz();
        assert!(book.remove_team(team_id).is_some());
        assert!(book.quiz_teams(quiz_id).is_empty());
        assert!(book.remove_team(team_id).is_none());
    }

    #[test]
    fn test_book_remove_quiz_keeps_teams() {
        let (mut book, quiz_id, team_id, round_id) = book_with_quiz();
        assert!(book.remove_quiz(quiz_id).is_some());
        assert!(book.quiz(quiz_id).is_none());

        let team = book.team(team_id).unwrap();
        assert!(!team.has_score(round_id));
        assert!(book.team_quizzes(team_id).is_empty());
    }

    #[test]
    fn test_book_serialization_keeps_valid_scores() {
        let (book, quiz_id, team_id, round_id) = book_with_quiz();
        let serialized = serde_json::to_string(&book).unwrap();
        let restored: Book = serde_json::from_str(&serialized).unwrap();

        assert!(restored.is_member(quiz_id, team_id));
        assert_eq!(restored.team(team_id).unwrap().score(round_id), 5);
    }

    #[test]
    fn test_book_deserialization_prunes_stale_scores() {
        let (mut book, _, team_id, _) = book_with_quiz();
        let stale_round = Id::new();
        book.team_mut(team_id).unwrap().set_score(stale_round, 3);

        let mut value = serde_json::to_value(&book).unwrap();
        value["members"]
            .as_array_mut()
            .unwrap()
            .push(serde_json::json!([Id::new(), team_id]));

        let restored: Book = serde_json::from_value(value).unwrap();
        assert!(!restored.team(team_id).unwrap().has_score(stale_round));
        assert_eq!(restored.team_quizzes(team_id).len(), 1);
    }

    #[test]
    fn test_book_deserialization_drops_over_cap_scores() {
        let (book, quiz_id, team_id, round_id) = book_with_quiz();
        let mut value = serde_json::to_value(&book).unwrap();
        value["teams"][team_id.to_string()]["scores"][round_id.to_string()] = serde_json::json!(999);

        let restored: Book = serde_json::from_value(value).unwrap();
        let team = restored.team(team_id).unwrap();
        assert!(!team.has_score(round_id));
        assert_eq!(team.total_score(restored.quiz(quiz_id).unwrap().rounds()), 0);
    }

    #[test]
    fn test_book_deserialization_keeps_score_at_cap() {
        let (book, _, team_id, round_id) = book_with_quiz();
        let mut value = serde_json::to_value(&book).unwrap();
        value["teams"][team_id.to_string()]["scores"][round_id.to_string()] = serde_json::json!(10);

        let restored: Book = serde_json::from_value(value).unwrap();
        assert_eq!(restored.team(team_id).unwrap().score(round_id), 10);
    }
}
