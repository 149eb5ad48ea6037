use std::{env, fmt::Display, str::FromStr};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// How registered passwords are kept in the user store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordStorage {
    #[default]
    Plaintext,
    Bcrypt,
}

impl FromStr for PasswordStorage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" => Ok(PasswordStorage::Plaintext),
            "bcrypt" => Ok(PasswordStorage::Bcrypt),
            other => Err(format!("expected `plaintext` or `bcrypt`, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub session_ttl_hours: i64,
    pub session_cookie: String,
    pub cookie_secure: bool,
    pub sweep_interval_secs: u64,
    pub password_storage: PasswordStorage,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3498,
            session_ttl_hours: 24,
            session_cookie: "forum.sid".into(),
            cookie_secure: false,
            sweep_interval_secs: 300,
            password_storage: PasswordStorage::Plaintext,
        }
    }
}

/// Accepted range for `FORUM_SESSION_TTL_HOURS`: one hour to one year.
pub const SESSION_TTL_HOURS: std::ops::RangeInclusive<i64> = 1..=8760;

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys fall back to the
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let session_ttl_hours = parse_or(
            &lookup,
            "FORUM_SESSION_TTL_HOURS",
            defaults.session_ttl_hours,
        )?;
        if !SESSION_TTL_HOURS.contains(&session_ttl_hours) {
            return Err(ConfigError::Invalid {
                key: "FORUM_SESSION_TTL_HOURS",
                value: session_ttl_hours.to_string(),
                reason: format!(
                    "must be between {} and {} hours",
                    SESSION_TTL_HOURS.start(),
                    SESSION_TTL_HOURS.end()
                ),
            });
        }

        Ok(Self {
            host: lookup("FORUM_HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            session_ttl_hours,
            session_cookie: lookup("FORUM_SESSION_COOKIE").unwrap_or(defaults.session_cookie),
            cookie_secure: parse_or(&lookup, "FORUM_COOKIE_SECURE", defaults.cookie_secure)?,
            sweep_interval_secs: parse_or(
                &lookup,
                "FORUM_SWEEP_INTERVAL_SECS",
                defaults.sweep_interval_secs,
            )?,
            password_storage: parse_or(
                &lookup,
                "FORUM_PASSWORD_STORAGE",
                defaults.password_storage,
            )?,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };

    let parsed = value.trim().parse::<T>();
    match parsed {
        Ok(parsed) => {
            info!("{key} loaded from environment");
            Ok(parsed)
        }
        Err(e) => Err(ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }),
    }
}
