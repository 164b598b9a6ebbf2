use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

use crate::game::bet_validator::BetRejection;
use crate::models::game::BetForm;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("You must be logged in to play a game.")]
    AuthRequired,

    #[error("Match with id \"{0}\" not found.")]
    NotFound(String),

    #[error("The submitted betting form is malformed.")]
    MalformedForm(#[source] serde_json::Error),

    /// The submitted values travel back so the form can be re-rendered.
    #[error("{rejection}")]
    Rejected {
        rejection: BetRejection,
        fields: BetForm,
    },

    #[error("There was an error loading match by the id {match_slug}. Sorry.")]
    MatchUnavailable {
        match_slug: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("There was an error loading your matches. Sorry.")]
    ListingUnavailable(#[source] sqlx::Error),
}

impl ResponseError for GameError {
    fn status_code(&self) -> StatusCode {
        match self {
            GameError::AuthRequired => StatusCode::UNAUTHORIZED,
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::MalformedForm(_) | GameError::Rejected { .. } => StatusCode::BAD_REQUEST,
            GameError::MatchUnavailable { .. } | GameError::ListingUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            GameError::AuthRequired => json!({
                "success": false,
                "message": self.to_string(),
                "login": "/login"
            }),
            GameError::Rejected { rejection, fields } => json!({
                "success": false,
                "message": "Bet was not saved",
                "formError": rejection.to_string(),
                "reason": rejection,
                "fields": fields
            }),
            _ => json!({
                "success": false,
                "message": self.to_string()
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
