pub mod bet_handler;
pub mod upcoming_handler;
