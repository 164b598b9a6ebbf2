// src/routes/game.rs
use actix_web::{get, post, web, HttpResponse};
use sqlx::PgPool;

use crate::config::game::GameSettings;
use crate::game::clock::Clock;
use crate::game::error::GameError;
use crate::handlers::game::{bet_handler, upcoming_handler};
use crate::handlers::game::bet_handler::BetPath;
use crate::middleware::auth::Claims;
use crate::models::game::BetForm;

/// Predictions for today's and tomorrow's matches, grouped by day.
/// Mounted on the bare `/game` scope path in `init_routes`.
pub async fn get_upcoming_matches(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
    game_settings: web::Data<GameSettings>,
    clock: web::Data<dyn Clock>,
) -> Result<HttpResponse, GameError> {
    upcoming_handler::get_upcoming_user_matches(pool, claims, game_settings, clock).await
}

/// Betting form data for a single match
#[get("/{stage}/{stage_id}/{match_slug}")]
async fn get_bet_form(
    path: web::Path<BetPath>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, GameError> {
    bet_handler::get_bet_form(path, pool, claims).await
}

/// Submit a bet for a single match
#[post("/{stage}/{stage_id}/{match_slug}")]
async fn submit_bet(
    path: web::Path<BetPath>,
    form: web::Form<BetForm>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
    clock: web::Data<dyn Clock>,
) -> Result<HttpResponse, GameError> {
    bet_handler::submit_bet(path, form, pool, claims, clock).await
}
