pub mod game;
pub mod jwt;
pub mod settings;
