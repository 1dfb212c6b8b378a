//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a default so an empty file is valid.

pub mod app;
pub mod cache;
pub mod completion;
pub mod logging;
pub mod realtime;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::cache::CacheConfig;
pub use self::completion::CompletionConfig;
pub use self::logging::LoggingConfig;
pub use self::realtime::{OverflowPolicy, RealtimeConfig};

use crate::error::AppError;

/// Environment variable consulted when no completion API key is configured.
pub const API_KEY_FALLBACK_ENV: &str = "OPENAI_API_KEY";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Broadcast hub settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Cache provider settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Chat-completion backend settings.
    #[serde(default)]
    pub completion: CompletionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `{dir}/default.toml` with the `{dir}/{env}.toml` overlay and
    /// environment variables prefixed with `CHATCAST__`. Both files are
    /// optional.
    pub fn load(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CHATCAST")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let mut loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        if loaded.completion.api_key.is_empty() {
            loaded.completion.api_key = std::env::var(API_KEY_FALLBACK_ENV).unwrap_or_default();
        }

        Ok(loaded)
    }

    /// Override the bind address from a `host:port` string.
    ///
    /// Used by the `--addr` command-line flag. A bare `:port` keeps the
    /// configured host.
    pub fn apply_addr(&mut self, addr: &str) -> Result<(), AppError> {
        let addr = addr.trim();
        if addr.is_empty() {
            return Err(AppError::configuration("addr cannot be empty"));
        }

        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| AppError::configuration(format!("Invalid addr '{addr}': missing port")))?;

        let port: u16 = port
            .parse()
            .map_err(|_| AppError::configuration(format!("Invalid port in addr '{addr}'")))?;

        if !host.is_empty() {
            self.server.host = host.trim_start_matches('[').trim_end_matches(']').to_string();
        }
        self.server.port = port;
        Ok(())
    }
}
