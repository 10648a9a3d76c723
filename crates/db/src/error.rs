use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url is not configured (set BOOKLY_DATABASE__URL or DATABASE_URL)")]
    MissingUrl,

    #[error("invalid database url: {0}")]
    InvalidUrl(#[source] sqlx::Error),

    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("migration {module}/{id} failed: {source}")]
    Migration {
        module: String,
        id: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Query(#[from] sqlx::Error),
}
