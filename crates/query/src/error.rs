//! Query error types

/// Errors that can occur while storing or aggregating sales
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// Query execution failed
    #[error("query execution failed: {0}")]
    Execution(String),

    /// Aggregation referenced a column the sales table does not have
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Aggregation applied to a column that cannot hold numbers
    #[error("field '{0}' is not numeric")]
    NonNumericField(String),

    /// Invalid time window
    #[error("invalid time window: {0}")]
    InvalidWindow(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(e) => QueryError::Io(e),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                QueryError::Connection(err.to_string())
            }
            other => QueryError::Execution(other.to_string()),
        }
    }
}

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;
