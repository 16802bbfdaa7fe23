pub mod explain;
pub mod extract;
pub mod generate;
pub mod llm_config;
pub mod status;
pub mod validate;
