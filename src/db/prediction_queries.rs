use sqlx::PgPool;
use uuid::Uuid;
use tracing::{debug, info};

use crate::game::bet_validator::ValidatedBet;
use crate::game::window::MatchWindow;
use crate::models::game::{Player, UserMatch, UserMatchRow};

const USER_MATCH_SELECT: &str = r#"
    SELECT
        um.id,
        um.home_team_score,
        um.away_team_score,
        um.goal_scorer_id,
        m.id AS match_id,
        m.stadium,
        m.stage,
        m.group_name,
        m.playoff_round,
        m.start_date,
        ht.id AS home_team_id,
        ht.name AS home_team_name,
        ht.flag AS home_team_flag,
        awt.id AS away_team_id,
        awt.name AS away_team_name,
        awt.flag AS away_team_flag
    FROM user_matches um
    JOIN matches m ON m.id = um.match_id
    LEFT JOIN teams ht ON ht.id = m.home_team_id
    LEFT JOIN teams awt ON awt.id = m.away_team_id
"#;

#[derive(Debug)]
pub struct PredictionQueries {
    pool: PgPool,
}

impl PredictionQueries {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the empty predictions a user is missing, e.g. for matches added
    /// after registration. Returns how many rows were created.
    pub async fn ensure_predictions(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_matches (user_id, match_id)
            SELECT $1, id FROM matches
            ON CONFLICT (user_id, match_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            info!("Created {} missing predictions for user {}", result.rows_affected(), user_id);
        }
        Ok(result.rows_affected())
    }

    /// The user's predictions whose match starts inside `window`, earliest first.
    pub async fn fetch_upcoming(
        &self,
        user_id: Uuid,
        window: &MatchWindow,
    ) -> Result<Vec<UserMatch>, sqlx::Error> {
        debug!("Fetching predictions of user {} between {} and {}", user_id, window.start, window.end);

        let rows = sqlx::query_as::<_, UserMatchRow>(&format!(
            r#"{}
            WHERE um.user_id = $1 AND m.start_date >= $2 AND m.start_date < $3
            ORDER BY m.start_date ASC, um.id ASC
            "#,
            USER_MATCH_SELECT
        ))
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserMatch::from).collect())
    }

    pub async fn find_for_match(
        &self,
        user_id: Uuid,
        match_id: i32,
    ) -> Result<Option<UserMatch>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserMatchRow>(&format!(
            "{} WHERE um.user_id = $1 AND m.id = $2",
            USER_MATCH_SELECT
        ))
        .bind(user_id)
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserMatch::from))
    }

    /// Looks a prediction up by id, but only among the user's own predictions.
    pub async fn find_by_id(
        &self,
        user_id: Uuid,
        prediction_id: i32,
    ) -> Result<Option<UserMatch>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserMatchRow>(&format!(
            "{} WHERE um.user_id = $1 AND um.id = $2",
            USER_MATCH_SELECT
        ))
        .bind(user_id)
        .bind(prediction_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserMatch::from))
    }

    pub async fn players_of_teams(&self, team_ids: &[String]) -> Result<Vec<Player>, sqlx::Error> {
        if team_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Player>(
            r#"
            SELECT id, name, team_id
            FROM players
            WHERE team_id = ANY($1)
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(team_ids)
        .fetch_all(&self.pool)
        .await
    }

    /// Team of a player, `None` when the player does not exist.
    pub async fn player_team(&self, player_id: i32) -> Result<Option<String>, sqlx::Error> {
        let team = sqlx::query_as::<_, (String,)>("SELECT team_id FROM players WHERE id = $1")
            .bind(player_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(team.map(|(team_id,)| team_id))
    }

    /// Writes scores and scorer of one prediction. Returns the number of rows
    /// touched, which is 0 when the prediction does not belong to the user.
    pub async fn update_prediction(
        &self,
        user_id: Uuid,
        bet: &ValidatedBet,
    ) -> Result<u64, sqlx::Error> {
        info!("Saving bet {}:{} on prediction {}", bet.home_team_score, bet.away_team_score, bet.prediction_id);

        let result = sqlx::query(
            r#"
            UPDATE user_matches
            SET
                home_team_score = $3,
                away_team_score = $4,
                goal_scorer_id = $5
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(bet.prediction_id)
        .bind(user_id)
        .bind(bet.home_team_score)
        .bind(bet.away_team_score)
        .bind(bet.goal_scorer_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
