use anyhow::{Result, anyhow};

const DEFAULT_DATABASE: &str = "sample_mflix";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_JWT_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongodb_uri: String,
    pub database: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
}

/// Token signing settings. The `token` command needs only these.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("JWT_SECRET not set"))?;

        let ttl_hours = match lookup("JWT_TTL_HOURS") {
            Some(v) => v
                .parse::<i64>()
                .map_err(|_| anyhow!("JWT_TTL_HOURS must be an integer, got {:?}", v))?,
            None => DEFAULT_JWT_TTL_HOURS,
        };

        Ok(Self { secret, ttl_hours })
    }
}

impl AppConfig {
    /// Reads settings from the process environment (`.env` is loaded by `main`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongodb_uri = lookup("MONGODB_URI")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("MONGODB_URI not set"))?;
        let jwt = JwtConfig::from_lookup(&lookup)?;

        let database = lookup("MFLIX_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        Ok(Self {
            mongodb_uri,
            database,
            bind_addr,
            jwt_secret: jwt.secret,
            jwt_ttl_hours: jwt.ttl_hours,
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.database, "sample_mflix");
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.jwt_ttl_hours, 24);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://db:27017"),
            ("JWT_SECRET", "secret"),
            ("MFLIX_DATABASE", "mflix_test"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("JWT_TTL_HOURS", "2"),
        ]))
        .unwrap();

        assert_eq!(config.mongodb_uri, "mongodb://db:27017");
        assert_eq!(config.database, "mflix_test");
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.jwt_ttl_hours, 2);
    }

    #[test]
    fn test_missing_required() {
        assert!(AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "secret")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("MONGODB_URI", "mongodb://x")])).is_err());
        assert!(
            AppConfig::from_lookup(lookup_from(&[("MONGODB_URI", ""), ("JWT_SECRET", "s")]))
                .is_err()
        );
    }

    #[test]
    fn test_jwt_config_without_database_settings() {
        let jwt = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "secret"),
            ("JWT_TTL_HOURS", "6"),
        ]))
        .unwrap();
        assert_eq!(jwt.secret, "secret");
        assert_eq!(jwt.ttl_hours, 6);

        assert!(JwtConfig::from_lookup(lookup_from(&[("MONGODB_URI", "mongodb://x")])).is_err());
    }

    #[test]
    fn test_bad_ttl() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://x"),
            ("JWT_SECRET", "s"),
            ("JWT_TTL_HOURS", "soon"),
        ]));
        assert!(result.is_err());
    }
}
