use crate::error::DbError;
use crate::store::{PgStoreConnection, StoreConnection};
use async_trait::async_trait;
use configuration::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use std::str::FromStr;

/// Hands out store connections to request handlers.
///
/// Every call to [`ConnectionManager::acquire`] yields a connection owned by
/// one request. The caller must give it back with
/// [`StoreConnection::release`] on every exit path. A failed acquisition
/// returns an error and leaves nothing to release.
#[async_trait]
pub trait ConnectionManager: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn StoreConnection>, DbError>;
}

/// Opens a brand-new PostgreSQL connection for every request. Nothing is pooled.
#[derive(Debug, Clone)]
pub struct PgConnectionManager {
    options: PgConnectOptions,
}

impl PgConnectionManager {
    pub fn new(options: PgConnectOptions) -> Self {
        Self { options }
    }

    /// Builds the manager from the configured settings, unless `DATABASE_URL`
    /// is set in the environment, in which case the URL wins.
    pub fn from_settings(settings: &DatabaseSettings) -> Result<Self, DbError> {
        let options = match std::env::var("DATABASE_URL") {
            Ok(url) => PgConnectOptions::from_str(&url)
                .map_err(|e| DbError::ConnectionConfigError(e.to_string()))?,
            Err(_) => connect_options(settings),
        };
        Ok(Self::new(options))
    }

    pub fn options(&self) -> &PgConnectOptions {
        &self.options
    }
}

#[async_trait]
impl ConnectionManager for PgConnectionManager {
    async fn acquire(&self) -> Result<Box<dyn StoreConnection>, DbError> {
        let conn = PgConnection::connect_with(&self.options)
            .await
            .map_err(DbError::ConnectionError)?;
        tracing::debug!(
            host = %self.options.get_host(),
            database = ?self.options.get_database(),
            "Opened database connection."
        );
        Ok(Box::new(PgStoreConnection::new(conn)))
    }
}

/// Translates the fixed connection settings into driver options.
pub fn connect_options(settings: &DatabaseSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .database(&settings.name)
        .username(&settings.user)
        .password(&settings.password)
        .application_name("fitness-center")
}
