use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to run migration on db: {0}")]
    MigrationFailed(String),

    #[error("DB error occurred")]
    SeaOrm(#[from] sea_orm::DbErr),

    #[error("Unknown database type {0}")]
    UnknownDbType(String),
}
