pub mod auth;
pub mod common;
pub mod game;
pub mod user;
