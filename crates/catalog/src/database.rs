use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, Executor, Row};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::errors::DatabaseError;
use crate::schema::TABLE_CREATION_ORDER;

/// `ER_NO_REFERENCED_ROW_2` and its pre-5.1 form `ER_NO_REFERENCED_ROW`.
/// `INSERT IGNORE` downgrades both to warnings.
const FOREIGN_KEY_WARNINGS: [u32; 2] = [1452, 1216];

/// A positional value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SqlParam {
    Int(i64),
    Text(String),
    Null,
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Int(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlParam::Null, Into::into)
    }
}

/// Result of a single insert-if-absent statement.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written.
    Inserted,
    /// The statement ran but a unique key collision made the server skip the row.
    Ignored,
    /// The server refused the row. Carries the server message.
    Rejected(String),
}

impl InsertOutcome {
    /// `true` if the statement executed without a row-level error.
    pub fn succeeded(&self) -> bool {
        !matches!(self, InsertOutcome::Rejected(_))
    }
}

/// Insert and commit surface used while seeding.
///
/// Row-level failures come back as [`InsertOutcome::Rejected`]; an `Err`
/// means the connection itself is unusable.
#[async_trait]
pub trait SeedTarget: Send {
    async fn execute_insert(
        &mut self,
        query: &str,
        params: &[SqlParam],
    ) -> Result<InsertOutcome, DatabaseError>;

    async fn commit(&mut self) -> Result<(), DatabaseError>;
}

/// Owns the single MySQL connection used to bootstrap the catalog.
pub struct Database {
    config: DatabaseConfig,
    connection: Option<MySqlConnection>,
}

impl Database {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            connection: None,
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn connection(&mut self) -> Result<&mut MySqlConnection, DatabaseError> {
        self.connection.as_mut().ok_or(DatabaseError::NotConnected)
    }

    /// Opens the server connection. No database is selected yet.
    ///
    /// Autocommit is switched off for the session so inserts become visible
    /// only on [`SeedTarget::commit`].
    pub async fn connect(&mut self) -> Result<(), DatabaseError> {
        let mut options = MySqlConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .username(&self.config.user)
            .charset(&self.config.charset);
        if let Some(password) = self.config.password() {
            options = options.password(password);
        }

        let connect_error = |source| DatabaseError::Connect {
            host: self.config.host.clone(),
            port: self.config.port,
            source,
        };

        let mut connection = MySqlConnection::connect_with(&options)
            .await
            .map_err(connect_error)?;

        sqlx::raw_sql("SET autocommit = 0")
            .execute(&mut connection)
            .await
            .map_err(connect_error)?;

        self.connection = Some(connection);
        info!(
            "Connected to {}:{} as {}",
            self.config.host, self.config.port, self.config.user
        );
        Ok(())
    }

    /// Creates the configured database if absent and selects it.
    pub async fn create_database(&mut self) -> Result<(), DatabaseError> {
        let name = self.config.name.clone();
        let create_error = |source| DatabaseError::CreateDatabase {
            name: name.clone(),
            source,
        };

        let conn = self.connection()?;
        sqlx::raw_sql(&format!("CREATE DATABASE IF NOT EXISTS `{name}`"))
            .execute(&mut *conn)
            .await
            .map_err(create_error)?;
        sqlx::raw_sql(&format!("USE `{name}`"))
            .execute(&mut *conn)
            .await
            .map_err(create_error)?;
        sqlx::raw_sql("COMMIT")
            .execute(&mut *conn)
            .await
            .map_err(create_error)?;

        info!("Database '{}' ready", name);
        Ok(())
    }

    /// Creates the four catalog tables if absent. Commits once at the end.
    pub async fn create_tables(&mut self) -> Result<(), DatabaseError> {
        let conn = self.connection()?;

        for (table, ddl) in TABLE_CREATION_ORDER {
            sqlx::raw_sql(ddl)
                .execute(&mut *conn)
                .await
                .map_err(|source| DatabaseError::CreateTable { table, source })?;
        }

        sqlx::raw_sql("COMMIT").execute(&mut *conn).await?;

        info!("Created {} tables", TABLE_CREATION_ORDER.len());
        Ok(())
    }

    /// Releases the connection. Does nothing if it was never opened.
    pub async fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            if let Err(e) = connection.close().await {
                warn!("Error while closing connection: {e}");
            }
            info!("Connection closed");
        }
    }
}

#[async_trait]
impl SeedTarget for Database {
    async fn execute_insert(
        &mut self,
        query: &str,
        params: &[SqlParam],
    ) -> Result<InsertOutcome, DatabaseError> {
        let conn = self.connection()?;

        let mut statement = sqlx::query(query);
        for param in params {
            statement = match param {
                SqlParam::Int(value) => statement.bind(*value),
                SqlParam::Text(value) => statement.bind(value.as_str()),
                SqlParam::Null => statement.bind(None::<String>),
            };
        }

        let rows_affected = match statement.execute(&mut *conn).await {
            Ok(result) => result.rows_affected(),
            Err(sqlx::Error::Database(e)) => return Ok(InsertOutcome::Rejected(e.to_string())),
            Err(e) => return Err(e.into()),
        };
        if rows_affected > 0 {
            return Ok(InsertOutcome::Inserted);
        }

        // Text protocol: preparing a statement would clear the diagnostics area.
        let rows = conn.fetch_all("SHOW WARNINGS").await?;
        let warnings = rows
            .iter()
            .map(|row| -> Result<(u32, String), sqlx::Error> {
                Ok((
                    row.try_get_unchecked::<u32, _>("Code")?,
                    row.try_get_unchecked::<String, _>("Message")?,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(skipped_row_outcome(&warnings))
    }

    async fn commit(&mut self) -> Result<(), DatabaseError> {
        let conn = self.connection()?;
        sqlx::query("COMMIT").execute(&mut *conn).await?;
        Ok(())
    }
}

/// Classifies an insert that affected no row from the warnings it raised.
/// A missing referenced row is a rejection; anything else is a duplicate.
fn skipped_row_outcome(warnings: &[(u32, String)]) -> InsertOutcome {
    warnings
        .iter()
        .find(|(code, _)| FOREIGN_KEY_WARNINGS.contains(code))
        .map_or(InsertOutcome::Ignored, |(_, message)| {
            InsertOutcome::Rejected(message.clone())
        })
}
