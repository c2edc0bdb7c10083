use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection configuration: {0}")]
    ConnectionConfigError(String),

    #[error("Failed to connect to the database: {0}")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Database statement failed: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Failed to release the database connection: {0}")]
    ReleaseError(#[source] sqlx::Error),
}

impl DbError {
    /// True when the store could not be reached at all, as opposed to a
    /// statement failing on an open connection.
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            DbError::ConnectionConfigError(_) | DbError::ConnectionError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinguishes_acquisition_from_statement_failures() {
        assert!(DbError::ConnectionError(sqlx::Error::PoolTimedOut).is_connection_failure());
        assert!(DbError::ConnectionConfigError("bad url".into()).is_connection_failure());
        assert!(!DbError::QueryError(sqlx::Error::RowNotFound).is_connection_failure());
    }
}
