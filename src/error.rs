use sqlx::Error as SqlxError;
use std::time::Duration;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AccountsError {
    #[error("Store unreachable: {0}")]
    Connection(#[source] SqlxError),

    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Schema initialization failed: {0}")]
    Schema(#[source] Box<AccountsError>),

    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Invalid database url: {0}")]
    InvalidDatabaseUrl(#[source] SqlxError),

    #[error("Insert affected {0} rows, expected exactly one")]
    UnexpectedRowCount(u64),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl AccountsError {
    /// True when the store could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        match self {
            AccountsError::Connection(_) | AccountsError::Timeout(_) => true,
            AccountsError::Schema(inner) => inner.is_unavailable(),
            _ => false,
        }
    }
}

impl From<SqlxError> for AccountsError {
    fn from(e: SqlxError) -> Self {
        match e {
            // No bound known here; acquisition paths use `acquire_error`.
            SqlxError::PoolTimedOut => AccountsError::Timeout(Duration::ZERO),
            SqlxError::Io(_)
            | SqlxError::Tls(_)
            | SqlxError::PoolClosed
            | SqlxError::WorkerCrashed
            | SqlxError::Configuration(_) => AccountsError::Connection(e),
            other => AccountsError::Database(other),
        }
    }
}

impl From<figment::Error> for AccountsError {
    fn from(e: figment::Error) -> Self {
        AccountsError::Config(Box::new(e))
    }
}

/// Classify an error raised while acquiring a connection.
///
/// Anything that goes wrong before a statement runs means the store could not
/// be reached, except for the pool's own acquire timeout.
pub(crate) fn acquire_error(e: SqlxError, bound: Duration) -> AccountsError {
    match e {
        SqlxError::PoolTimedOut => AccountsError::Timeout(bound),
        other => AccountsError::Connection(other),
    }
}

pub(crate) fn is_connection_failure(e: &AccountsError) -> bool {
    matches!(e, AccountsError::Connection(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_maps_to_timeout_with_bound() {
        let err = acquire_error(SqlxError::PoolTimedOut, Duration::from_secs(3));
        assert!(matches!(err, AccountsError::Timeout(d) if d == Duration::from_secs(3)));
        assert!(err.is_unavailable());
    }

    #[test]
    fn pool_closed_is_a_connection_error() {
        let err: AccountsError = SqlxError::PoolClosed.into();
        assert!(matches!(err, AccountsError::Connection(_)));
        assert!(is_connection_failure(&err));
    }

    #[test]
    fn row_not_found_is_not_unavailable() {
        let err: AccountsError = SqlxError::RowNotFound.into();
        assert!(matches!(err, AccountsError::Database(_)));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn schema_error_inherits_unavailability() {
        let err = AccountsError::Schema(Box::new(SqlxError::PoolClosed.into()));
        assert!(err.is_unavailable());
        assert!(err.to_string().starts_with("Schema initialization failed"));
    }
}
