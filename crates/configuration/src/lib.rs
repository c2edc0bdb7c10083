use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{DatabaseSettings, LoggingSettings, Overrides, ServerSettings, Settings};

/// The file read when no explicit path is given. Its absence is not an error.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `FITNESS__DATABASE__HOST=db`.
pub const ENV_PREFIX: &str = "FITNESS";

/// Loads the application settings.
///
/// Sources, lowest precedence first: compiled-in defaults, the TOML file at
/// `path` (or an optional `config.toml` in the working directory), then
/// `FITNESS__SECTION__KEY` environment variables. The result is validated
/// before it is returned.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
