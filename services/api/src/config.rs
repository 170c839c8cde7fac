//! HTTP server settings

use config::{Config, ConfigError, Environment, Source};
use serde::Deserialize;
use std::path::PathBuf;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration
///
/// # Environment Variables
/// - `HOST`: Interface to bind (default: 0.0.0.0)
/// - `PORT`: Port to listen on (default: 3000)
/// - `PUBLIC_DIR`: Directory holding the HTML pages and assets (default: public)
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub public_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default().try_parsing(true))
    }

    fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("public_dir", "public")?
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
