//! The scoring model
//!
//! The [`Scorekeeper`] is the single entry point used by presentation and
//! export collaborators. It validates every request against the book, applies
//! the mutation in memory, and then commits the book through a [`Store`].
//! A failed save is reported to the caller but the in-memory mutation stays
//! in place; callers can retry the operation to save again.

use enum_map::EnumMap;
use garde::Validate;
use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::{
    Entity, Error, TruncatedVec,
    book::Book,
    config::Options,
    constants,
    id::Id,
    leaderboard::{self, Leaderboard, Standing},
    quiz::{
        Quiz, QuizDraft, Status,
        round::{Round, RoundDraft},
    },
    store::Store,
    teams::{Team, TeamDraft},
};

/// Records scores and derives rankings for a book of quizzes and teams
#[derive(Debug)]
pub struct Scorekeeper<S: Store> {
    book: Book,
    store: S,
    options: Options,
}

impl<S: Store> Scorekeeper<S> {
    /// Creates a scorekeeper with an empty book
    ///
    /// # Errors
    ///
    /// Returns `Error::Invalid` if the options are out of range.
    pub fn new(store: S, options: Options) -> Result<Self, Error> {
        Self::with_book(Book::default(), store, options)
    }

    /// Creates a scorekeeper around an existing book, such as one restored
    /// from a store
    ///
    /// # Errors
    ///
    /// Returns `Error::Invalid` if the options are out of range.
    pub fn with_book(book: Book, store: S, options: Options) -> Result<Self, Error> {
        options.validate()?;
        Ok(Self {
            book,
            store,
            options,
        })
    }

    /// The current book
    pub fn book(&self) -> &Book {
        &self.book
    }

    /// The store the book is saved to
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The options in effect
    pub fn options(&self) -> &Options {
        &self.options
    }

    fn save(&mut self) -> Result<(), Error> {
        self.store.save(&self.book).map_err(|e| {
            warn!(error = %e, "failed to save book");
            Error::Persistence(e.to_string())
        })
    }

    fn find_quiz(&self, quiz_id: Id) -> Result<&Quiz, Error> {
        self.book
            .quiz(quiz_id)
            .ok_or(Error::NotFound(Entity::Quiz, quiz_id))
    }

    fn find_quiz_mut(&mut self, quiz_id: Id) -> Result<&mut Quiz, Error> {
        self.book
            .quiz_mut(quiz_id)
            .ok_or(Error::NotFound(Entity::Quiz, quiz_id))
    }

    fn find_round(&self, quiz_id: Id, round_id: Id) -> Result<&Round, Error> {
        self.find_quiz(quiz_id)?
            .round(round_id)
            .ok_or(Error::NotFound(Entity::Round, round_id))
    }

    fn find_team(&self, team_id: Id) -> Result<&Team, Error> {
        self.book
            .team(team_id)
            .ok_or(Error::NotFound(Entity::Team, team_id))
    }

    /// Looks up a team that takes part in the quiz
    fn find_member(&self, quiz_id: Id, team_id: Id) -> Result<&Team, Error> {
        self.find_quiz(quiz_id)?;
        let team = self.find_team(team_id)?;
        if self.book.is_member(quiz_id, team_id) {
            Ok(team)
        } else {
            Err(Error::NotMember {
                quiz: quiz_id,
                team: team_id,
            })
        }
    }

    /// Looks up a quiz
    pub fn quiz(&self, quiz_id: Id) -> Option<&Quiz> {
        self.book.quiz(quiz_id)
    }

    /// Looks up a team in the registry
    pub fn team(&self, team_id: Id) -> Option<&Team> {
        self.book.team(team_id)
    }

    /// All quizzes, most recent date first
    pub fn quizzes_by_date(&self) -> Vec<&Quiz> {
        self.book
            .quizzes()
            .sorted_by(|a, b| b.date().cmp(&a.date()))
            .collect_vec()
    }

    /// Number of quizzes in each lifecycle status
    pub fn status_counts(&self) -> EnumMap<Status, usize> {
        let mut counts = EnumMap::default();
        for quiz in self.book.quizzes() {
            counts[quiz.status()] += 1;
        }
        counts
    }

    /// Teams taking part in a quiz, in joining order
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the quiz does not exist.
    pub fn quiz_teams(&self, quiz_id: Id) -> Result<Vec<&Team>, Error> {
        self.find_quiz(quiz_id)?;
        Ok(self.book.quiz_teams(quiz_id))
    }

    /// Creates a planned quiz and returns its id
    ///
    /// # Errors
    ///
    /// * `Error::Invalid` - The draft fails validation
    /// * `Error::Persistence` - The quiz was created but not saved
    pub fn create_quiz(&mut self, draft: QuizDraft) -> Result<Id, Error> {
        let draft = draft.trimmed();
        draft.validate()?;

        let quiz = Quiz::new(draft);
        let quiz_id = quiz.id();
        info!(quiz = %quiz_id, name = quiz.name(), "quiz created");
        self.book.insert_quiz(quiz);
        self.save()?;
        Ok(quiz_id)
    }

    /// Changes the name, venue or date of a quiz
    pub fn edit_quiz(&mut self, quiz_id: Id, draft: QuizDraft) -> Result<(), Error> {
        let draft = draft.trimmed();
        draft.validate()?;

        self.find_quiz_mut(quiz_id)?.apply(draft);
        debug!(quiz = %quiz_id, "quiz edited");
        self.save()
    }

    fn transition(&mut self, quiz_id: Id, from: Status, to: Status) -> Result<(), Error> {
        let quiz = self.find_quiz_mut(quiz_id)?;
        if quiz.status() != from {
            return Err(Error::InvalidTransition {
                from: quiz.status(),
                to,
            });
        }
        quiz.set_status(to);
        info!(quiz = %quiz_id, %from, %to, "quiz status changed");
        self.save()
    }

    /// Moves a planned quiz into live play
    ///
    /// # Errors
    ///
    /// * `Error::NotFound` - The quiz does not exist
    /// * `Error::InvalidTransition` - The quiz is not planned
    /// * `Error::Persistence` - The quiz was started but not saved
    pub fn start_quiz(&mut self, quiz_id: Id) -> Result<(), Error> {
        self.transition(quiz_id, Status::Planned, Status::Active)
    }

    /// Marks an active quiz as completed
    ///
    /// # Errors
    ///
    /// * `Error::NotFound` - The quiz does not exist
    /// * `Error::InvalidTransition` - The quiz is not active
    /// * `Error::Persistence` - The quiz was completed but not saved
    pub fn finish_quiz(&mut self, quiz_id: Id) -> Result<(), Error> {
        self.transition(quiz_id, Status::Active, Status::Completed)
    }

    /// Deletes a quiz together with its rounds and the scores for them
    ///
    /// Teams stay in the registry.
    pub fn delete_quiz(&mut self, quiz_id: Id) -> Result<(), Error> {
        self.book
            .remove_quiz(quiz_id)
            .ok_or(Error::NotFound(Entity::Quiz, quiz_id))?;
        info!(quiz = %quiz_id, "quiz deleted");
        self.save()
    }

    /// A round draft using the configured default points cap
    pub fn round_draft(&self, name: &str) -> RoundDraft {
        RoundDraft::new(name, self.options.default_max_points)
    }

    /// Appends a round to a quiz and returns its id
    ///
    /// # Errors
    ///
    /// * `Error::Invalid` - The draft fails validation
    /// * `Error::NotFound` - The quiz does not exist
    /// * `Error::Full` - The quiz already has the maximum number of rounds
    /// * `Error::Persistence` - The round was added but not saved
    pub fn add_round(&mut self, quiz_id: Id, draft: RoundDraft) -> Result<Id, Error> {
        let draft = draft.trimmed();
        draft.validate()?;

        let quiz = self.find_quiz_mut(quiz_id)?;
        if quiz.rounds().len() >= constants::quiz::MAX_ROUNDS_COUNT {
            return Err(Error::Full(Entity::Round, quiz_id));
        }
        let round_id = quiz
            .push_round(draft)
            .ok_or(Error::Full(Entity::Round, quiz_id))?;
        debug!(quiz = %quiz_id, round = %round_id, "round added");
        self.save()?;
        Ok(round_id)
    }

    /// Renames a round or changes its points cap
    ///
    /// # Errors
    ///
    /// Returns `Error::ScoreOutOfRange` if a team already holds more points
    /// for the round than the new cap allows; nothing is changed in that case.
    pub fn edit_round(&mut self, quiz_id: Id, round_id: Id, draft: RoundDraft) -> Result<(), Error> {
        let draft = draft.trimmed();
        draft.validate()?;

        self.find_round(quiz_id, round_id)?;
        if let Some(points) = self
            .book
            .quiz_teams(quiz_id)
            .iter()
            .map(|team| team.score(round_id))
            .max()
            .filter(|points| *points > draft.max_points)
        {
            return Err(Error::ScoreOutOfRange {
                points,
                max_points: draft.max_points,
            });
        }

        if let Some(round) = self.find_quiz_mut(quiz_id)?.round_mut(round_id) {
            round.apply(draft);
        }
        debug!(quiz = %quiz_id, round = %round_id, "round edited");
        self.save()
    }

    /// Removes a round and every team's score for it
    pub fn remove_round(&mut self, quiz_id: Id, round_id: Id) -> Result<(), Error> {
        self.find_quiz_mut(quiz_id)?
            .remove_round(round_id)
            .ok_or(Error::NotFound(Entity::Round, round_id))?;
        self.book.forget_round(round_id);
        debug!(quiz = %quiz_id, round = %round_id, "round removed");
        self.save()
    }

    fn set_round_completed(
        &mut self,
        quiz_id: Id,
        round_id: Id,
        completed: bool,
    ) -> Result<(), Error> {
        let round = self
            .find_quiz_mut(quiz_id)?
            .round_mut(round_id)
            .ok_or(Error::NotFound(Entity::Round, round_id))?;
        if round.is_completed() == completed {
            debug!(round = %round_id, completed, "round already in requested state");
            return Ok(());
        }
        round.set_completed(completed);
        info!(quiz = %quiz_id, round = %round_id, completed, "round completion changed");
        self.save()
    }

    /// Marks a round as completed
    ///
    /// Completing a round that is already completed does nothing. Scores and
    /// the quiz status are left untouched.
    pub fn complete_round(&mut self, quiz_id: Id, round_id: Id) -> Result<(), Error> {
        self.set_round_completed(quiz_id, round_id, true)
    }

    /// Marks a completed round as open again without touching the quiz status
    pub fn reopen_round(&mut self, quiz_id: Id, round_id: Id) -> Result<(), Error> {
        self.set_round_completed(quiz_id, round_id, false)
    }

    /// Adds a team to the registry and returns its id
    ///
    /// # Errors
    ///
    /// * `Error::Invalid` - The draft fails validation
    /// * `Error::Persistence` - The team was created but not saved
    pub fn create_team(&mut self, draft: TeamDraft) -> Result<Id, Error> {
        let draft = draft.trimmed();
        draft.validate()?;

        let team = Team::new(draft);
        let team_id = team.id();
        info!(team = %team_id, name = team.name(), color = %team.color(), "team created");
        self.book.insert_team(team);
        self.save()?;
        Ok(team_id)
    }

    /// Renames or recolors a team
    pub fn edit_team(&mut self, team_id: Id, draft: TeamDraft) -> Result<(), Error> {
        let draft = draft.trimmed();
        draft.validate()?;

        self.book
            .team_mut(team_id)
            .ok_or(Error::NotFound(Entity::Team, team_id))?
            .apply(draft);
        debug!(team = %team_id, "team edited");
        self.save()
    }

    /// Removes a team from the registry and from every quiz
    pub fn delete_team(&mut self, team_id: Id) -> Result<(), Error> {
        self.book
            .remove_team(team_id)
            .ok_or(Error::NotFound(Entity::Team, team_id))?;
        info!(team = %team_id, "team deleted");
        self.save()
    }

    /// Enters a team into a quiz
    ///
    /// Entering a team that already takes part does nothing.
    ///
    /// # Errors
    ///
    /// * `Error::NotFound` - The quiz or team does not exist
    /// * `Error::Full` - The quiz already has the maximum number of teams
    /// * `Error::Persistence` - The team joined but the book was not saved
    pub fn join_quiz(&mut self, quiz_id: Id, team_id: Id) -> Result<(), Error> {
        self.find_quiz(quiz_id)?;
        self.find_team(team_id)?;
        if self.book.is_member(quiz_id, team_id) {
            return Ok(());
        }
        if self.book.quiz_team_count(quiz_id) >= constants::quiz::MAX_TEAMS_COUNT {
            return Err(Error::Full(Entity::Team, quiz_id));
        }

        self.book.join(quiz_id, team_id);
        info!(quiz = %quiz_id, team = %team_id, "team joined quiz");
        self.save()
    }

    /// Withdraws a team from a quiz, dropping its scores for that quiz
    pub fn leave_quiz(&mut self, quiz_id: Id, team_id: Id) -> Result<(), Error> {
        self.find_member(quiz_id, team_id)?;
        self.book.leave(quiz_id, team_id);
        info!(quiz = %quiz_id, team = %team_id, "team left quiz");
        self.save()
    }

    /// Records a team's points for a round, replacing any earlier value
    ///
    /// # Errors
    ///
    /// * `Error::NotFound` - The quiz, round or team does not exist
    /// * `Error::NotMember` - The team does not take part in the quiz
    /// * `Error::ScoreOutOfRange` - `points` exceeds the round's cap; the
    ///   stored score is left unchanged
    /// * `Error::Persistence` - The score was recorded but not saved
    pub fn update_score(
        &mut self,
        quiz_id: Id,
        team_id: Id,
        round_id: Id,
        points: u32,
    ) -> Result<(), Error> {
        let round = self.find_round(quiz_id, round_id)?;
        let max_points = round.max_points();
        self.find_member(quiz_id, team_id)?;
        if !round.accepts(points) {
            return Err(Error::ScoreOutOfRange { points, max_points });
        }

        if let Some(team) = self.book.team_mut(team_id) {
            team.set_score(round_id, points);
        }
        debug!(quiz = %quiz_id, team = %team_id, round = %round_id, points, "score updated");
        self.save()
    }

    /// Forgets a team's points for a round so that it counts as unscored
    pub fn clear_score(&mut self, quiz_id: Id, team_id: Id, round_id: Id) -> Result<(), Error> {
        self.find_round(quiz_id, round_id)?;
        self.find_member(quiz_id, team_id)?;

        let cleared = self
            .book
            .team_mut(team_id)
            .and_then(|team| team.clear_score(round_id));
        if cleared.is_none() {
            return Ok(());
        }
        debug!(quiz = %quiz_id, team = %team_id, round = %round_id, "score cleared");
        self.save()
    }

    /// Points a team holds for a round, `0` when not yet scored
    ///
    /// # Errors
    ///
    /// * `Error::NotFound` - The quiz, round or team does not exist
    /// * `Error::NotMember` - The team does not take part in the quiz
    pub fn score(&self, quiz_id: Id, team_id: Id, round_id: Id) -> Result<u32, Error> {
        self.find_round(quiz_id, round_id)?;
        Ok(self.find_member(quiz_id, team_id)?.score(round_id))
    }

    /// Sum of a team's points over the quiz's rounds
    pub fn total_score(&self, quiz_id: Id, team_id: Id) -> Result<u64, Error> {
        let team = self.find_member(quiz_id, team_id)?;
        Ok(team.total_score(self.find_quiz(quiz_id)?.rounds()))
    }

    /// Teams of a quiz ordered by total score, best first
    ///
    /// Equal totals are ordered by name ignoring case, then by joining order.
    pub fn sorted_teams_by_score(&self, quiz_id: Id) -> Result<Vec<&Team>, Error> {
        let quiz = self.find_quiz(quiz_id)?;
        Ok(leaderboard::rank(quiz, self.book.quiz_teams(quiz_id))
            .into_iter()
            .map(|(team, _)| team)
            .collect_vec())
    }

    /// The first round of the quiz that is not completed
    pub fn current_round(&self, quiz_id: Id) -> Result<Option<&Round>, Error> {
        Ok(self.find_quiz(quiz_id)?.current_round())
    }

    /// Number of completed rounds in the quiz
    pub fn completed_rounds_count(&self, quiz_id: Id) -> Result<usize, Error> {
        Ok(self.find_quiz(quiz_id)?.completed_rounds_count())
    }

    /// Fraction of the quiz's rounds that are completed
    pub fn progress(&self, quiz_id: Id) -> Result<f64, Error> {
        Ok(self.find_quiz(quiz_id)?.progress())
    }

    /// Full standings and round statistics of a quiz
    pub fn leaderboard(&self, quiz_id: Id) -> Result<Leaderboard, Error> {
        let quiz = self.find_quiz(quiz_id)?;
        Ok(Leaderboard::new(quiz, self.book.quiz_teams(quiz_id)))
    }

    /// The best standings of a quiz, limited by the configured leaderboard size
    pub fn top_standings(&self, quiz_id: Id) -> Result<TruncatedVec<Standing>, Error> {
        Ok(self.leaderboard(quiz_id)?.top(self.options.leaderboard_limit))
    }
}
