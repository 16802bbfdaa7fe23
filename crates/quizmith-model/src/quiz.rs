pub mod attempt;
pub mod generated;
pub mod question;
pub mod quiz;
