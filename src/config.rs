use std::env;
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;

use dotenv::dotenv;
use tracing::info;

use crate::error::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8088";
pub const DEFAULT_POOL_SIZE: u32 = 8;
/// The range bcrypt accepts for its cost factor.
pub const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub pool_size: u32,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Reads the environment, picking up a `.env` file if there is one.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            bind_addr: try_load("BIND_ADDR", DEFAULT_BIND_ADDR.to_string())?,
            pool_size: try_load("DB_POOL_SIZE", DEFAULT_POOL_SIZE)?,
            bcrypt_cost: try_load("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that parse but would fail later, when the pool is built
    /// or the first password is hashed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_POOL_SIZE",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !BCRYPT_COST_RANGE.contains(&self.bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                reason: format!(
                    "must be between {} and {}",
                    BCRYPT_COST_RANGE.start(),
                    BCRYPT_COST_RANGE.end()
                ),
            });
        }
        Ok(())
    }
}

fn try_load<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        Err(_) => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}
