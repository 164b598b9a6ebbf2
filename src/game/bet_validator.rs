use chrono::{DateTime, Utc};
use serde::Serialize;

/// Why a bet submission was turned down. Every variant is something the user
/// can fix on the form, except `Locked` which only time explains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BetRejection {
    #[error("Match started or ended, cannot change bets.")]
    Locked,

    #[error("Teams have not yet been selected.")]
    TeamsNotSet,

    #[error("No result selected.")]
    NoResult,

    #[error("Scores must be whole numbers of zero or more.")]
    InvalidScore,

    #[error("Selected goal scorer is not valid.")]
    InvalidGoalScorer,

    #[error("Selected goal scorer does not play in this match.")]
    GoalScorerNotInMatch,
}

impl BetRejection {
    pub fn code(&self) -> &'static str {
        match self {
            BetRejection::Locked => "locked",
            BetRejection::TeamsNotSet => "teams-not-set",
            BetRejection::NoResult => "no-result",
            BetRejection::InvalidScore => "invalid-score",
            BetRejection::InvalidGoalScorer => "invalid-goal-scorer",
            BetRejection::GoalScorerNotInMatch => "goal-scorer-not-in-match",
        }
    }
}

impl Serialize for BetRejection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

/// A bet as submitted, before any checks. Scores and the scorer are raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct BetSubmission {
    pub prediction_id: i32,
    pub home_team_id: Option<String>,
    pub away_team_id: Option<String>,
    pub match_start_date: DateTime<Utc>,
    pub home_team_score: Option<String>,
    pub away_team_score: Option<String>,
    pub goal_scorer_id: Option<String>,
}

/// A bet that passed validation, holding exactly the values to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBet {
    pub prediction_id: i32,
    pub home_team_id: String,
    pub away_team_id: String,
    pub home_team_score: i32,
    pub away_team_score: i32,
    pub goal_scorer_id: Option<i32>,
}

impl ValidatedBet {
    /// `scorer_team_id` is the team of the picked scorer as known to the store,
    /// `None` when no such player exists.
    pub fn ensure_goal_scorer_plays_for(
        self,
        scorer_team_id: Option<&str>,
    ) -> Result<Self, BetRejection> {
        if self.goal_scorer_id.is_none() {
            return Ok(self);
        }

        match scorer_team_id {
            Some(team_id) if team_id == self.home_team_id || team_id == self.away_team_id => Ok(self),
            _ => Err(BetRejection::GoalScorerNotInMatch),
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_non_negative(value: &str) -> Option<i32> {
    value.parse::<i32>().ok().filter(|parsed| *parsed >= 0)
}

/// Runs the bet submission checks in their fixed order; the first failing
/// check decides the rejection.
#[derive(Debug, Default)]
pub struct BetValidator;

impl BetValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(
        &self,
        submission: &BetSubmission,
        now: DateTime<Utc>,
    ) -> Result<ValidatedBet, BetRejection> {
        self.validate_not_locked(submission.match_start_date, now)?;

        let (home_team_id, away_team_id) =
            match (present(&submission.home_team_id), present(&submission.away_team_id)) {
                (Some(home), Some(away)) => (home.to_string(), away.to_string()),
                _ => return Err(BetRejection::TeamsNotSet),
            };

        let (home_team_score, away_team_score) = self.validate_scores(
            &submission.home_team_score,
            &submission.away_team_score,
        )?;

        let goal_scorer_id = self.normalize_goal_scorer(&submission.goal_scorer_id)?;

        Ok(ValidatedBet {
            prediction_id: submission.prediction_id,
            home_team_id,
            away_team_id,
            home_team_score,
            away_team_score,
            goal_scorer_id,
        })
    }

    /// Betting closes once the match has started.
    pub fn validate_not_locked(
        &self,
        match_start_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), BetRejection> {
        if now > match_start_date {
            return Err(BetRejection::Locked);
        }
        Ok(())
    }

    /// Both scores must be supplied together and be integers of zero or more.
    pub fn validate_scores(
        &self,
        home_team_score: &Option<String>,
        away_team_score: &Option<String>,
    ) -> Result<(i32, i32), BetRejection> {
        let (home, away) = match (present(home_team_score), present(away_team_score)) {
            (Some(home), Some(away)) => (home, away),
            _ => return Err(BetRejection::NoResult),
        };

        match (parse_non_negative(home), parse_non_negative(away)) {
            (Some(home), Some(away)) => Ok((home, away)),
            _ => Err(BetRejection::InvalidScore),
        }
    }

    /// `0` (or nothing) means "no scorer picked".
    pub fn normalize_goal_scorer(
        &self,
        goal_scorer_id: &Option<String>,
    ) -> Result<Option<i32>, BetRejection> {
        let Some(raw) = present(goal_scorer_id) else {
            return Ok(None);
        };

        match parse_non_negative(raw) {
            Some(0) => Ok(None),
            Some(player_id) => Ok(Some(player_id)),
            None => Err(BetRejection::InvalidGoalScorer),
        }
    }
}
