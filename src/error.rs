use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("repository not found")]
    NotFound,

    #[error("repository {0:?} already exists")]
    AlreadyExists(String),

    #[error("remote rejected the request as malformed")]
    BadRequest,

    #[error("remote internal server error")]
    InternalError,

    /// Catch-all for remote status codes without a dedicated variant, so new
    /// server codes degrade into a recognizable error instead of a panic.
    #[error("unexpected remote status {0}")]
    Remote(u16),

    /// Transport-level I/O failure, surfaced only after the client's own
    /// retries are spent. Not part of the remote taxonomy.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote answered 2xx but the body did not parse. A local bug or a
    /// protocol mismatch, never a remote condition.
    #[error("malformed remote response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Policy(String),

    #[error("unable to find a free repository id after {0} attempts")]
    IdSpaceExhausted(usize),

    #[error("store matched {matched} records for project {project_id}, expected exactly 1")]
    StoreMismatch { project_id: String, matched: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
