// src/models/game.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub flag: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchStage {
    Group,
    Playoff,
}

impl MatchStage {
    /// Stage segment used in betting form URLs, e.g. `playoff-stage`.
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        match segment {
            "group-stage" => Some(MatchStage::Group),
            "playoff-stage" => Some(MatchStage::Playoff),
            _ => None,
        }
    }
}

/// A scheduled fixture. Teams stay unset until the fixture is finalised
/// (e.g. a playoff slot whose qualifier is not known yet).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Match {
    pub id: i32,
    pub home_team: Option<Team>,
    pub away_team: Option<Team>,
    pub stadium: String,
    pub stage: MatchStage,
    pub group_name: Option<String>,
    pub playoff_round: Option<String>,
    pub start_date: DateTime<Utc>,
}

impl Match {
    pub fn home_team_id(&self) -> Option<&str> {
        self.home_team.as_ref().map(|team| team.id.as_str())
    }

    pub fn away_team_id(&self) -> Option<&str> {
        self.away_team.as_ref().map(|team| team.id.as_str())
    }
}

/// A user's prediction for one match.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserMatch {
    pub id: i32,
    pub home_team_score: Option<i32>,
    pub away_team_score: Option<i32>,
    pub goal_scorer_id: Option<i32>,
    pub r#match: Match,
}

/// Flat row of `user_matches` joined with its match and both (optional) teams.
#[derive(Debug, FromRow)]
pub struct UserMatchRow {
    pub id: i32,
    pub home_team_score: Option<i32>,
    pub away_team_score: Option<i32>,
    pub goal_scorer_id: Option<i32>,
    pub match_id: i32,
    pub stadium: String,
    pub stage: MatchStage,
    pub group_name: Option<String>,
    pub playoff_round: Option<String>,
    pub start_date: DateTime<Utc>,
    pub home_team_id: Option<String>,
    pub home_team_name: Option<String>,
    pub home_team_flag: Option<String>,
    pub away_team_id: Option<String>,
    pub away_team_name: Option<String>,
    pub away_team_flag: Option<String>,
}

fn joined_team(id: Option<String>, name: Option<String>, flag: Option<String>) -> Option<Team> {
    match (id, name) {
        (Some(id), Some(name)) => Some(Team { id, name, flag }),
        _ => None,
    }
}

impl From<UserMatchRow> for UserMatch {
    fn from(row: UserMatchRow) -> Self {
        UserMatch {
            id: row.id,
            home_team_score: row.home_team_score,
            away_team_score: row.away_team_score,
            goal_scorer_id: row.goal_scorer_id,
            r#match: Match {
                id: row.match_id,
                home_team: joined_team(row.home_team_id, row.home_team_name, row.home_team_flag),
                away_team: joined_team(row.away_team_id, row.away_team_name, row.away_team_flag),
                stadium: row.stadium,
                stage: row.stage,
                group_name: row.group_name,
                playoff_round: row.playoff_round,
                start_date: row.start_date,
            },
        }
    }
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: i32,
    pub name: String,
    pub team_id: String,
    /// Whether this player is the user's current goal scorer pick.
    #[sqlx(skip)]
    #[serde(default)]
    pub selected: bool,
}

/// JSON bundle carried in the hidden form field and echoed back on submit.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HiddenBetFields {
    pub prediction_id: i32,
    #[serde(default)]
    pub home_team_id: Option<String>,
    #[serde(default)]
    pub away_team_id: Option<String>,
    pub match_start_date: DateTime<Utc>,
}

impl From<&UserMatch> for HiddenBetFields {
    fn from(user_match: &UserMatch) -> Self {
        HiddenBetFields {
            prediction_id: user_match.id,
            home_team_id: user_match.r#match.home_team_id().map(str::to_owned),
            away_team_id: user_match.r#match.away_team_id().map(str::to_owned),
            match_start_date: user_match.r#match.start_date,
        }
    }
}

/// Form-encoded body of a bet submission. Everything arrives as text.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BetForm {
    pub hidden: String,
    #[serde(default)]
    pub home_team_score: Option<String>,
    #[serde(default)]
    pub away_team_score: Option<String>,
    #[serde(default)]
    pub goal_scorer_id: Option<String>,
}

/// Everything the client needs to render the betting form for one match.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BetFormView {
    pub user_match: UserMatch,
    pub home_team_players: Vec<Player>,
    pub away_team_players: Vec<Player>,
    pub hidden: HiddenBetFields,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpcomingMatches {
    pub user_id: Uuid,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub groups: Vec<crate::game::window::DayBucket<UserMatch>>,
}
