pub mod auth;
pub mod tts;
pub mod user;
