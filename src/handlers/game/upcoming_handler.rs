use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::config::game::GameSettings;
use crate::db::prediction_queries::PredictionQueries;
use crate::game::clock::Clock;
use crate::game::error::GameError;
use crate::game::window::{group_user_matches, MatchWindow};
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::game::UpcomingMatches;

/// List the user's predictions for matches starting between today's midnight
/// and the end of the betting window, grouped into day buckets.
#[tracing::instrument(
    name = "Get upcoming user matches",
    skip(pool, claims, game_settings, clock),
    fields(
        username = %claims.username
    )
)]
pub async fn get_upcoming_user_matches(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
    game_settings: web::Data<GameSettings>,
    clock: web::Data<dyn Clock>,
) -> Result<HttpResponse, GameError> {
    let user_id = claims.user_id().ok_or(GameError::AuthRequired)?;
    let now = clock.now();
    let offset = game_settings.offset();
    let window = MatchWindow::for_day_of(now, offset);

    let queries = PredictionQueries::new(pool.get_ref().clone());
    let unavailable = |e: sqlx::Error| {
        tracing::error!("Failed to fetch upcoming matches: {}", e);
        GameError::ListingUnavailable(e)
    };

    queries.ensure_predictions(user_id).await.map_err(unavailable)?;
    let user_matches = queries
        .fetch_upcoming(user_id, &window)
        .await
        .map_err(unavailable)?;

    tracing::info!("Found {} upcoming matches for user {}", user_matches.len(), user_id);

    let groups = group_user_matches(user_matches, now, offset);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Upcoming matches retrieved",
        UpcomingMatches {
            user_id,
            window_start: window.start,
            window_end: window.end,
            groups,
        },
    )))
}
