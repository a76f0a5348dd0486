use std::env::var;
use std::time::Duration;

use dotenvy::dotenv;
use thiserror::Error;

const DATABASE_REQUIRED: [&str; 5] = ["DB_HOST", "DB_PORT", "DB_NAME", "DB_USER", "DB_PASSWORD"];

const GATEWAY_REQUIRED: [&str; 3] = ["EVOLUTION_API_URL", "EVOLUTION_INSTANCE", "EVOLUTION_API_KEY"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub gateway: GatewayConfig,
    pub dispatch: DispatchConfig,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

#[derive(Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub instance: String,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchConfig {
    pub max_messages: Option<usize>,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_messages: None,
            min_delay: Duration::from_secs(10),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Loads `.env` if present and reads the process environment.
    pub fn try_parse() -> Result<Config, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(|name| var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source. Every
    /// missing required variable is reported at once; empty counts as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let missing = missing_of(DATABASE_REQUIRED.iter().chain(&GATEWAY_REQUIRED), &get);
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }
        let required = |name: &'static str| get(name).unwrap_or_default();

        let database = DatabaseConfig::from_lookup(&get)?;

        let defaults = DispatchConfig::default();
        let max_messages = get("DISPATCH_MAX_MESSAGES")
            .map(|v| parse_value::<usize>("DISPATCH_MAX_MESSAGES", v))
            .transpose()?;
        if max_messages == Some(0) {
            return Err(ConfigError::Invalid {
                name: "DISPATCH_MAX_MESSAGES",
                value: "0".to_string(),
            });
        }
        let min_delay = get("DISPATCH_DELAY_MIN_SECS")
            .map(|v| parse_value::<u64>("DISPATCH_DELAY_MIN_SECS", v).map(Duration::from_secs))
            .transpose()?
            .unwrap_or(defaults.min_delay);
        let max_delay = get("DISPATCH_DELAY_MAX_SECS")
            .map(|v| parse_value::<u64>("DISPATCH_DELAY_MAX_SECS", v).map(Duration::from_secs))
            .transpose()?
            .unwrap_or(defaults.max_delay);
        if min_delay > max_delay {
            return Err(ConfigError::Invalid {
                name: "DISPATCH_DELAY_MIN_SECS",
                value: format!("{} > {}", min_delay.as_secs(), max_delay.as_secs()),
            });
        }
        let timeout = get("EVOLUTION_TIMEOUT_SECS")
            .map(|v| parse_value::<u64>("EVOLUTION_TIMEOUT_SECS", v).map(Duration::from_secs))
            .transpose()?
            .unwrap_or(Duration::from_secs(30));

        Ok(Config {
            database,
            gateway: GatewayConfig {
                base_url: normalize_base_url(&required("EVOLUTION_API_URL")),
                instance: required("EVOLUTION_INSTANCE"),
                api_key: required("EVOLUTION_API_KEY"),
                timeout,
            },
            dispatch: DispatchConfig {
                max_messages,
                min_delay,
                max_delay,
            },
        })
    }
}

impl DatabaseConfig {
    /// Ledger settings only, for commands that never reach the gateway.
    pub fn try_parse() -> Result<DatabaseConfig, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(|name| var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<DatabaseConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let missing = missing_of(DATABASE_REQUIRED.iter(), &get);
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }
        let required = |name: &'static str| get(name).unwrap_or_default();

        Ok(DatabaseConfig {
            host: required("DB_HOST"),
            port: parse_value::<u16>("DB_PORT", required("DB_PORT"))?,
            name: required("DB_NAME"),
            user: required("DB_USER"),
            password: required("DB_PASSWORD"),
        })
    }
}

fn missing_of<'a, G>(names: impl Iterator<Item = &'a &'static str>, get: G) -> Vec<&'static str>
where
    G: Fn(&str) -> Option<String>,
{
    names.copied().filter(|name| get(name).is_none()).collect()
}

fn parse_value<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    let parsed = value.trim().parse::<T>();
    parsed.map_err(|_| ConfigError::Invalid { name, value })
}

/// Keeps an explicit scheme, defaults to https and drops trailing slashes.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("instance", &self.instance)
            .field("api_key", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}
