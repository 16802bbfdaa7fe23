pub mod access_tokens;
pub mod attempt;
pub mod quiz;
pub mod user;
