pub(crate) mod error;

use sea_orm::{ConnectionTrait, Database};
use url::Url;

use crate::db::error::DbError;

/// Applies the embedded schema for the backend named by the url scheme.
/// Every statement is `IF NOT EXISTS`-guarded, so running this on an
/// already-migrated database is a no-op.
pub(crate) async fn migration(url: &Url) -> Result<(), DbError> {
    let Some(db_type) = url.scheme().split('+').next() else {
        return Err(DbError::UnknownDbType("NO_TYPE".to_string()));
    };

    let schema = match db_type {
        #[cfg(feature = "sqlite")]
        "sqlite" => include_str!("db/migrations/sqlite.sql"),
        #[cfg(feature = "postgres")]
        "postgresql" => include_str!("db/migrations/postgres.sql"),
        _ => return Err(DbError::UnknownDbType(db_type.to_string())),
    };

    tracing::debug!(%db_type, "running migrations");
    let conn = Database::connect(url.as_str()).await?;
    conn.execute_unprepared(schema)
        .await
        .map_err(|err| DbError::MigrationFailed(err.to_string()))?;
    Ok(())
}
