use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

/// Where the HTTP API listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Fixed connection parameters used to open one store connection per request.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    /// Name of the database holding the `Members` and `WorkoutSessions` tables.
    pub name: String,
    pub user: String,
    pub password: String,
}

/// Log verbosity and optional file output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, e.g. `info` or `web_server=debug,sqlx=warn`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---
// These allow any section, or the whole file, to be omitted.

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            name: "fitness_center_db".to_string(),
            user: "root".to_string(),
            password: "password".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

// The password never appears in logs or `show-config` output.
impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Settings {
    /// Rejects settings that could never produce a working server.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("database.host", &self.database.host),
            ("database.name", &self.database.name),
            ("database.user", &self.database.user),
            ("server.host", &self.server.host),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!("`{key}` must not be empty")));
            }
        }
        if self.database.port == 0 {
            return Err(ConfigError::ValidationError(
                "`database.port` must not be 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The `host:port` string the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Command-line values that take precedence over the loaded settings.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct Overrides {
    /// Interface to bind the HTTP server to.
    #[cfg_attr(feature = "clap", arg(long))]
    pub host: Option<String>,
    /// Port to bind the HTTP server to.
    #[cfg_attr(feature = "clap", arg(long))]
    pub port: Option<u16>,
    /// Database host to connect to.
    #[cfg_attr(feature = "clap", arg(long))]
    pub db_host: Option<String>,
    /// Log filter directive, e.g. `debug`.
    #[cfg_attr(feature = "clap", arg(long))]
    pub log_level: Option<String>,
}

impl Overrides {
    pub fn apply(self, settings: &mut Settings) {
        if let Some(host) = self.host {
            settings.server.host = host;
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(db_host) = self.db_host {
            settings.database.host = db_host;
        }
        if let Some(level) = self.log_level {
            settings.logging.level = level;
        }
    }
}
