use bookinv_types::ValidationErrors;
use tracing::error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

type GenericError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures of repository operations.
///
/// Storage engine errors are translated when they cross into this type, so
/// callers only ever see these four kinds (plus migration failure on startup).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationErrors),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage unavailable")]
    StorageUnavailable(#[source] GenericError),

    #[error("Database migration failed: {0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),
}

impl Error {
    pub(crate) fn storage<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        error!("Storage error: {e}");
        Error::StorageUnavailable(Box::new(e))
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Error::RecordNotFound("Book".to_string()),
            sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
                Error::Conflict("Book with this author email already exists".to_string())
            }
            e => Error::storage(e),
        }
    }
}
