//! Launcher settings, read from `UDL_*` environment variables.

use std::time::Duration;

use confique::Config;

use crate::builder::DEFAULT_PREFIXES;
use crate::error::UdlError;

#[derive(Config, Debug, PartialEq)]
pub struct Settings {
    /// Log verbosity: trace, debug, info, warn, error, fatal or disabled.
    #[config(env = "UDL_LOGGING_LEVEL")]
    pub logging_level: Option<String>,

    /// Comma-separated prefixes stripped from directive names. An empty entry
    /// accepts unprefixed names.
    #[config(
        env = "UDL_ENV_PREFIXES",
        parse_env = confique::env::parse::list_by_comma,
        default = ["", "APPSETTING_"]
    )]
    pub env_prefixes: Vec<String>,

    /// Seconds to wait for the wrapped program after forwarding a shutdown
    /// signal before killing it.
    #[config(env = "UDL_KILL_DELAY_SECS", default = 10)]
    pub kill_delay_secs: u64,
}

impl Settings {
    /// Load from the process environment, falling back to defaults.
    pub fn load() -> Result<Self, UdlError> {
        Ok(Settings::builder().env().load()?)
    }

    pub fn kill_delay(&self) -> Duration {
        Duration::from_secs(self.kill_delay_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            logging_level: None,
            env_prefixes: DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect(),
            kill_delay_secs: 10,
        }
    }
}
