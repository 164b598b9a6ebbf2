pub mod bet_validator;
pub mod clock;
pub mod error;
pub mod window;
