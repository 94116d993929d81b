//! Runtime settings read from the environment (after `.env` is loaded by the binary).

use crate::error::ConfigError;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://movies.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    /// Optional JSON fixture loaded into empty tables at startup.
    pub seed_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: DEFAULT_DATABASE_URL.into(),
            bind_addr: DEFAULT_BIND_ADDR.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            seed_path: None,
        }
    }
}

impl Settings {
    /// `DATABASE_URL`, `BIND_ADDR`, `MAX_CONNECTIONS`, `SEED_PATH`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let max_connections = match lookup("MAX_CONNECTIONS") {
            Some(raw) => {
                let n: u32 = raw.trim().parse().map_err(|_| ConfigError::InvalidSetting {
                    key: "MAX_CONNECTIONS",
                    message: format!("expected a positive integer, got '{}'", raw),
                })?;
                if n == 0 {
                    return Err(ConfigError::InvalidSetting {
                        key: "MAX_CONNECTIONS",
                        message: "must be at least 1".into(),
                    });
                }
                n
            }
            None => defaults.max_connections,
        };
        Ok(Settings {
            database_url: lookup("DATABASE_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.database_url),
            bind_addr: lookup("BIND_ADDR")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.bind_addr),
            max_connections,
            seed_path: lookup("SEED_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let s = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(s.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(s.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(s.seed_path.is_none());
    }

    #[test]
    fn reads_overrides() {
        let s = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("MAX_CONNECTIONS", "2"),
            ("SEED_PATH", "fixtures/movies.json"),
        ]))
        .unwrap();
        assert_eq!(s.database_url, "sqlite::memory:");
        assert_eq!(s.bind_addr, "0.0.0.0:8080");
        assert_eq!(s.max_connections, 2);
        assert_eq!(s.seed_path, Some(PathBuf::from("fixtures/movies.json")));
    }

    #[test]
    fn rejects_bad_pool_size() {
        let err = Settings::from_lookup(lookup_from(&[("MAX_CONNECTIONS", "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { key: "MAX_CONNECTIONS", .. }));
        let err = Settings::from_lookup(lookup_from(&[("MAX_CONNECTIONS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { .. }));
    }
}
