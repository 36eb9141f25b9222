use crate::db::models::{DbProfile, DbUser};
use crate::db::schema::SQLITE_INIT;
use crate::error::{AccountsError, acquire_error, is_connection_failure};
use crate::service::password::{PasswordScheme, Plaintext};
use crate::types::account::{NewUser, RegisterOutcome, UserAccount, UserProfile};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, Connection, Pool, Sqlite};
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub type SqlitePool = Pool<Sqlite>;

/// Stand-in compared against when the username does not exist, so an unknown
/// user costs the same verification as a wrong password.
const ABSENT_PASSWORD: &str = "\u{0}absent\u{0}";

/// Connection target and bounds for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub database_url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub query_timeout: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://user_management.db".to_string(),
            max_connections: 4,
            connect_timeout: Duration::from_secs(5),
            query_timeout: Duration::from_secs(5),
        }
    }
}

/// Account storage over a SQLite pool.
///
/// Every operation checks a connection out of the pool, runs a single
/// statement and hands the connection back when the guard drops, whichever
/// way the call returns.
#[derive(Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
    connect_opts: SqliteConnectOptions,
    connect_timeout: Duration,
    query_timeout: Duration,
    scheme: Arc<dyn PasswordScheme>,
}

impl CredentialStore {
    /// Wrap an existing pool. Timeouts come from `settings`; the connect
    /// target is read back from the pool.
    pub fn new(pool: SqlitePool, settings: &StoreSettings) -> Self {
        let connect_opts = (*pool.connect_options()).clone();
        Self {
            pool,
            connect_opts,
            connect_timeout: settings.connect_timeout,
            query_timeout: settings.query_timeout,
            scheme: Arc::new(Plaintext),
        }
    }

    /// Build a pool that connects on first use. Nothing touches the database
    /// here, so an unreachable store only shows up once an operation runs.
    pub fn connect_lazy(settings: &StoreSettings) -> Result<Self, AccountsError> {
        let connect_opts = SqliteConnectOptions::from_str(&settings.database_url)
            .map_err(AccountsError::InvalidDatabaseUrl)?
            .create_if_missing(false)
            .busy_timeout(settings.query_timeout);
        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections.max(1))
            .acquire_timeout(settings.connect_timeout)
            .connect_lazy_with(connect_opts);
        Ok(Self::new(pool, settings))
    }

    pub fn with_scheme(mut self, scheme: Arc<dyn PasswordScheme>) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Make sure the database file and the `users` table exist.
    ///
    /// When the database cannot be opened it is created and the table
    /// creation retried once.
    pub async fn ensure_schema(&self) -> Result<(), AccountsError> {
        match self.create_tables().await {
            Ok(()) => {}
            Err(e) if is_connection_failure(&e) => {
                warn!(error = %e, "could not open database; attempting to create it");
                self.create_database()
                    .await
                    .map_err(|e| AccountsError::Schema(Box::new(e)))?;
                self.create_tables()
                    .await
                    .map_err(|e| AccountsError::Schema(Box::new(e)))?;
                info!("database created");
            }
            Err(e) => return Err(AccountsError::Schema(Box::new(e))),
        }
        info!("users table created or already exists");
        Ok(())
    }

    /// Insert one account. A taken username is an outcome, not an error.
    pub async fn register(&self, user: &NewUser) -> Result<RegisterOutcome, AccountsError> {
        let stored = self.scheme.encode(&user.password);
        let mut conn = self.acquire().await?;
        let result = self
            .bounded(
                sqlx::query(
                    r#"INSERT INTO users (user_type, name, phone, username, password, location)
                       VALUES (?, ?, ?, ?, ?, ?)"#,
                )
                .bind(user.user_type.as_str())
                .bind(user.name.as_str())
                .bind(user.phone.as_str())
                .bind(user.username.as_str())
                .bind(stored.as_str())
                .bind(user.location.as_deref())
                .execute(&mut *conn),
            )
            .await;

        match result {
            Ok(done) if done.rows_affected() == 1 => {
                let id = done.last_insert_rowid();
                info!(username = %user.username, user_type = %user.user_type, id, "user registered");
                Ok(RegisterOutcome::Created(id))
            }
            Ok(done) => Err(AccountsError::UnexpectedRowCount(done.rows_affected())),
            Err(AccountsError::Database(sqlx::Error::Database(db))) if db.is_unique_violation() => {
                info!(username = %user.username, "username already exists");
                Ok(RegisterOutcome::UsernameTaken)
            }
            Err(e) => {
                warn!(username = %user.username, error = %e, "user registration failed");
                Err(e)
            }
        }
    }

    /// True iff `username` exists and `password` verifies against it.
    /// Unknown usernames and wrong passwords are not told apart.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool, AccountsError> {
        let mut conn = self.acquire().await?;
        let stored = self
            .bounded(
                sqlx::query_scalar::<_, String>("SELECT password FROM users WHERE username = ?")
                    .bind(username)
                    .fetch_optional(&mut *conn),
            )
            .await?;

        let verified = match stored.as_deref() {
            Some(stored) => self.scheme.verify(password, stored),
            None => {
                let _ = self.scheme.verify(password, ABSENT_PASSWORD);
                false
            }
        };

        if verified {
            info!(username = %username, "login successful");
        } else {
            debug!(username = %username, "invalid username or password");
        }
        Ok(verified)
    }

    pub async fn lookup(&self, username: &str) -> Result<Option<UserProfile>, AccountsError> {
        let mut conn = self.acquire().await?;
        let row = self
            .bounded(
                sqlx::query_as::<_, DbProfile>(
                    "SELECT user_type, name, phone, location FROM users WHERE username = ?",
                )
                .bind(username)
                .fetch_optional(&mut *conn),
            )
            .await?;
        Ok(row.map(UserProfile::try_from).transpose()?)
    }

    pub async fn account(&self, username: &str) -> Result<Option<UserAccount>, AccountsError> {
        let mut conn = self.acquire().await?;
        let row = self
            .bounded(
                sqlx::query_as::<_, DbUser>(
                    r#"SELECT id, user_type, name, phone, username, location, created_at
                       FROM users WHERE username = ?"#,
                )
                .bind(username)
                .fetch_optional(&mut *conn),
            )
            .await?;
        Ok(row.map(UserAccount::try_from).transpose()?)
    }

    /// Check that a connection can be acquired and used.
    pub async fn ping(&self) -> Result<(), AccountsError> {
        let mut conn = self.acquire().await?;
        self.bounded(sqlx::query("SELECT 1").execute(&mut *conn))
            .await?;
        Ok(())
    }

    async fn create_tables(&self) -> Result<(), AccountsError> {
        let mut conn = self.acquire().await?;
        // execute statements one by one (sqlx::query runs a single statement)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            self.bounded(sqlx::query(s).execute(&mut *conn)).await?;
        }
        Ok(())
    }

    async fn create_database(&self) -> Result<(), AccountsError> {
        let opts = self.connect_opts.clone().create_if_missing(true);
        let conn = tokio::time::timeout(self.connect_timeout, opts.connect())
            .await
            .map_err(|_| AccountsError::Timeout(self.connect_timeout))?
            .map_err(AccountsError::Connection)?;
        conn.close().await.map_err(AccountsError::Connection)?;
        info!(
            filename = %self.connect_opts.get_filename().display(),
            "database created or already exists"
        );
        Ok(())
    }

    async fn acquire(&self) -> Result<PoolConnection<Sqlite>, AccountsError> {
        self.pool
            .acquire()
            .await
            .map_err(|e| acquire_error(e, self.connect_timeout))
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, sqlx::Error>>,
    ) -> Result<T, AccountsError> {
        tokio::time::timeout(self.query_timeout, fut)
            .await
            .map_err(|_| AccountsError::Timeout(self.query_timeout))?
            .map_err(AccountsError::from)
    }
}
