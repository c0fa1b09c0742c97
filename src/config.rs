use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{LotteryError, Result};

pub const DEFAULT_STORE_PATH: &str = "data/archives.db";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_path: PathBuf,
    pub timeout: Duration,
    pub use_store: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_store: true,
        }
    }
}

pub fn load() -> Result<Config> {
    from_lookup(|key| env::var(key).ok())
}

fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let mut config = Config::default();

    if let Some(path) = lookup("LOTTERY_STORE_PATH") {
        config.store_path = PathBuf::from(path);
    }

    if let Some(secs) = lookup("LOTTERY_FETCH_TIMEOUT_SECS") {
        let secs = secs
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| {
                LotteryError::Config(format!(
                    "LOTTERY_FETCH_TIMEOUT_SECS must be a positive integer, got '{secs}'"
                ))
            })?;
        config.timeout = Duration::from_secs(secs);
    }

    if let Some(flag) = lookup("LOTTERY_USE_STORE") {
        config.use_store = match flag.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => {
                return Err(LotteryError::Config(format!(
                    "LOTTERY_USE_STORE must be a boolean, got '{other}'"
                )));
            }
        };
    }

    Ok(config)
}
