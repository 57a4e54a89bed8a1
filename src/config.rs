use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub engine: EngineSettings,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSettings {
    pub log_level: String,
    pub log_format: String,
}

/// Tunables for the transfer/conversion engines.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Upper bound in milliseconds on waiting for exclusive access to an
    /// account before the operation fails with a lock timeout.
    pub lock_wait_ms: u64,
}

impl EngineSettings {
    pub fn lock_wait(&self) -> Duration {
        Duration::from_millis(self.lock_wait_ms)
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self { lock_wait_ms: 1000 }
    }
}

impl Settings {
    pub fn new() -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"));

        Ok(builder.build()?.try_deserialize()?)
    }
}
