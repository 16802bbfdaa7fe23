pub mod access_tokens;
pub mod attempt;
pub mod quiz;
pub mod user;
pub mod util;

pub use sea_orm;
