use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub const DEFAULT_REGION_API_URL: &str = "https://www.emsifa.com/api-wilayah-indonesia/api";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: String,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expire_minutes: i64,
    pub bcrypt_cost: u32,
    pub region_api_url: String,
    pub region_api_timeout_secs: u64,
    /// Admin account created at startup when both are set.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub admin_phone: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").context("JWT_SECRET must be set")?;

        Ok(Self {
            server_port: get("SERVER_PORT").unwrap_or_else(|| "3000".into()),
            database_url: get("DATABASE_URL"),
            db_max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 5)?,
            jwt_secret,
            jwt_expire_minutes: parse_or(&get, "JWT_EXPIRE_MINUTES", 1440)?,
            bcrypt_cost: parse_or(&get, "BCRYPT_COST", 10)?,
            region_api_url: get("REGION_API_URL")
                .unwrap_or_else(|| DEFAULT_REGION_API_URL.into()),
            region_api_timeout_secs: parse_or(&get, "REGION_API_TIMEOUT_SECS", 10)?,
            admin_email: get("ADMIN_EMAIL"),
            admin_password: get("ADMIN_PASSWORD"),
            admin_phone: get("ADMIN_PHONE").unwrap_or_else(|| "08123456783".into()),
        })
    }
}

fn parse_or<T, F>(get: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {v:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let cfg = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(cfg.server_port, "3000");
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.jwt_expire_minutes, 1440);
        assert_eq!(cfg.bcrypt_cost, 10);
        assert_eq!(cfg.db_max_connections, 5);
        assert_eq!(cfg.region_api_url, DEFAULT_REGION_API_URL);
        assert_eq!(cfg.region_api_timeout_secs, 10);
        assert_eq!(cfg.admin_email, None);
    }

    #[test]
    fn missing_secret_is_an_error() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("JWT_SECRET", "  ")])).is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "x"),
            ("SERVER_PORT", "8080"),
            ("DATABASE_URL", "sqlite://data/shop.db"),
            ("BCRYPT_COST", "4"),
            ("JWT_EXPIRE_MINUTES", "15"),
        ]))
        .unwrap();
        assert_eq!(cfg.server_port, "8080");
        assert_eq!(cfg.database_url.as_deref(), Some("sqlite://data/shop.db"));
        assert_eq!(cfg.bcrypt_cost, 4);
        assert_eq!(cfg.jwt_expire_minutes, 15);

        let bad = Config::from_lookup(lookup(&[("JWT_SECRET", "x"), ("BCRYPT_COST", "lots")]));
        assert!(bad.is_err());
    }
}
