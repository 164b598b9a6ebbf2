use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub async fn insert_team(pool: &PgPool, id: &str, name: &str) {
    sqlx::query("INSERT INTO teams (id, name, flag) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(name)
        .bind(format!("https://flags.example.com/{}.png", id.to_lowercase()))
        .execute(pool)
        .await
        .expect("Failed to insert team");
}

pub async fn insert_player(pool: &PgPool, name: &str, team_id: &str) -> i32 {
    let (id,): (i32,) = sqlx::query_as("INSERT INTO players (name, team_id) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(team_id)
        .fetch_one(pool)
        .await
        .expect("Failed to insert player");
    id
}

pub async fn insert_match(
    pool: &PgPool,
    home_team_id: Option<&str>,
    away_team_id: Option<&str>,
    stage: &str,
    start_date: DateTime<Utc>,
) -> i32 {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO matches (home_team_id, away_team_id, stadium, stage, group_name, playoff_round, start_date)
        VALUES ($1, $2, 'Lusail Stadium', $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(home_team_id)
    .bind(away_team_id)
    .bind(stage)
    .bind(if stage == "group" { Some("C") } else { None })
    .bind(if stage == "playoff" { Some("Round of 16") } else { None })
    .bind(start_date)
    .fetch_one(pool)
    .await
    .expect("Failed to insert match");
    id
}

pub async fn user_id_of(pool: &PgPool, username: &str) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_one(pool)
        .await
        .expect("Failed to fetch user");
    id
}

/// (prediction id, home score, away score, scorer) of the user's prediction for a match.
pub async fn prediction_of(
    pool: &PgPool,
    user_id: Uuid,
    match_id: i32,
) -> (i32, Option<i32>, Option<i32>, Option<i32>) {
    sqlx::query_as(
        r#"
        SELECT id, home_team_score, away_team_score, goal_scorer_id
        FROM user_matches
        WHERE user_id = $1 AND match_id = $2
        "#,
    )
    .bind(user_id)
    .bind(match_id)
    .fetch_one(pool)
    .await
    .expect("Failed to fetch prediction")
}
