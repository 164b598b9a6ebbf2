use actix_web::{http::header, web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::prediction_queries::PredictionQueries;
use crate::game::bet_validator::{BetRejection, BetSubmission, BetValidator};
use crate::game::clock::Clock;
use crate::game::error::GameError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::game::{BetForm, BetFormView, HiddenBetFields, MatchStage, Player, UserMatch};

/// Path of a betting form: `/game/{stage}/{stage_id}/{match_slug}`.
#[derive(Debug, Deserialize)]
pub struct BetPath {
    pub stage: String,
    pub stage_id: String,
    pub match_slug: String,
}

impl BetPath {
    /// Stage and match id encoded in the path. Unknown stages and malformed
    /// slugs are reported as the match not being found.
    pub fn target(&self) -> Result<(MatchStage, i32), GameError> {
        MatchStage::from_path_segment(&self.stage)
            .zip(parse_match_slug(&self.match_slug))
            .ok_or_else(|| self.not_found())
    }

    /// A match reached through another stage's path does not exist there.
    pub fn ensure_stage(&self, stage: MatchStage, user_match: UserMatch) -> Result<UserMatch, GameError> {
        if user_match.r#match.stage == stage {
            Ok(user_match)
        } else {
            tracing::info!(
                "Match {} is a {:?} match, not reachable through {}",
                user_match.r#match.id,
                user_match.r#match.stage,
                self.stage
            );
            Err(self.not_found())
        }
    }

    fn not_found(&self) -> GameError {
        GameError::NotFound(self.match_slug.clone())
    }

    /// Listing of the competition stage the match belongs to.
    pub fn stage_url(&self) -> String {
        format!("/game/{}/{}", self.stage, self.stage_id)
    }

    fn unavailable(&self, source: sqlx::Error) -> GameError {
        tracing::error!("Store failure for match {}: {}", self.match_slug, source);
        GameError::MatchUnavailable {
            match_slug: self.match_slug.clone(),
            source,
        }
    }
}

/// `match-12` -> `12`
pub fn parse_match_slug(slug: &str) -> Option<i32> {
    slug.strip_prefix("match-")?.parse::<i32>().ok().filter(|id| *id > 0)
}

fn user_id_from(claims: &Claims) -> Result<Uuid, GameError> {
    claims.user_id().ok_or(GameError::AuthRequired)
}

/// Load the prediction, match and both squads needed to render the betting form.
#[tracing::instrument(
    name = "Get betting form",
    skip(path, pool, claims),
    fields(
        match_slug = %path.match_slug,
        username = %claims.username
    )
)]
pub async fn get_bet_form(
    path: web::Path<BetPath>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, GameError> {
    let user_id = user_id_from(&claims)?;
    let (stage, match_id) = path.target()?;

    let queries = PredictionQueries::new(pool.get_ref().clone());
    queries
        .ensure_predictions(user_id)
        .await
        .map_err(|e| path.unavailable(e))?;
    let user_match = queries
        .find_for_match(user_id, match_id)
        .await
        .map_err(|e| path.unavailable(e))?
        .ok_or_else(|| path.not_found())?;
    let user_match = path.ensure_stage(stage, user_match)?;

    let fixture = &user_match.r#match;
    let team_ids: Vec<String> = [fixture.home_team_id(), fixture.away_team_id()]
        .into_iter()
        .flatten()
        .map(str::to_owned)
        .collect();

    let players = queries
        .players_of_teams(&team_ids)
        .await
        .map_err(|e| path.unavailable(e))?;

    let (home_team_players, away_team_players) =
        split_squads(players, fixture.home_team_id(), user_match.goal_scorer_id);

    tracing::debug!(
        "Loaded match {} with {} home and {} away players",
        match_id,
        home_team_players.len(),
        away_team_players.len()
    );

    let hidden = HiddenBetFields::from(&user_match);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Match loaded",
        BetFormView {
            user_match,
            home_team_players,
            away_team_players,
            hidden,
        },
    )))
}

/// Separate players into home and away squads and flag the current scorer pick.
pub fn split_squads(
    players: Vec<Player>,
    home_team_id: Option<&str>,
    goal_scorer_id: Option<i32>,
) -> (Vec<Player>, Vec<Player>) {
    players
        .into_iter()
        .map(|player| Player {
            selected: Some(player.id) == goal_scorer_id,
            ..player
        })
        .partition(|player| Some(player.team_id.as_str()) == home_team_id)
}

/// Validate a submitted bet and, when accepted, store it and send the user
/// back to the stage listing.
#[tracing::instrument(
    name = "Submit bet",
    skip(path, form, pool, claims, clock),
    fields(
        match_slug = %path.match_slug,
        username = %claims.username
    )
)]
pub async fn submit_bet(
    path: web::Path<BetPath>,
    form: web::Form<BetForm>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
    clock: web::Data<dyn Clock>,
) -> Result<HttpResponse, GameError> {
    let user_id = user_id_from(&claims)?;
    let (stage, match_id) = path.target()?;
    let form = form.into_inner();

    let hidden: HiddenBetFields = serde_json::from_str(&form.hidden).map_err(|e| {
        tracing::info!("Malformed hidden bet fields: {}", e);
        GameError::MalformedForm(e)
    })?;

    let queries = PredictionQueries::new(pool.get_ref().clone());
    let stored = queries
        .find_by_id(user_id, hidden.prediction_id)
        .await
        .map_err(|e| path.unavailable(e))?
        .filter(|user_match| user_match.r#match.id == match_id)
        .ok_or_else(|| path.not_found())?;
    let stored = path.ensure_stage(stage, stored)?;

    let server_fields = HiddenBetFields::from(&stored);
    if server_fields != hidden {
        tracing::warn!(
            "Submitted match data for prediction {} differs from the stored match, using stored values",
            stored.id
        );
    }

    let submission = BetSubmission {
        prediction_id: stored.id,
        home_team_id: server_fields.home_team_id,
        away_team_id: server_fields.away_team_id,
        match_start_date: server_fields.match_start_date,
        home_team_score: form.home_team_score.clone(),
        away_team_score: form.away_team_score.clone(),
        goal_scorer_id: form.goal_scorer_id.clone(),
    };

    let now = clock.now();
    let reject = |rejection: BetRejection| {
        tracing::info!("Bet on prediction {} rejected: {}", stored.id, rejection);
        GameError::Rejected {
            rejection,
            fields: form.clone(),
        }
    };

    let mut bet = BetValidator::new().validate(&submission, now).map_err(reject)?;

    if let Some(scorer_id) = bet.goal_scorer_id {
        let scorer_team = queries
            .player_team(scorer_id)
            .await
            .map_err(|e| path.unavailable(e))?;
        bet = bet
            .ensure_goal_scorer_plays_for(scorer_team.as_deref())
            .map_err(reject)?;
    }

    let updated = queries
        .update_prediction(user_id, &bet)
        .await
        .map_err(|e| path.unavailable(e))?;

    if updated == 0 {
        return Err(path.not_found());
    }

    tracing::info!("Bet on prediction {} saved", bet.prediction_id);

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, path.stage_url()))
        .finish())
}
