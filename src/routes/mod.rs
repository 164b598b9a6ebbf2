use actix_web::web;

pub mod auth;
pub mod backend_health;
pub mod game;
pub mod registration;

use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(registration::register)
        .service(backend_health::backend_health)
        .service(auth::login);

    // Game routes (require authentication)
    cfg.service(
        web::scope("/game")
            .wrap(AuthMiddleware)
            .route("", web::get().to(game::get_upcoming_matches))
            .service(game::get_bet_form)
            .service(game::submit_bet)
    );
}
