use anyhow::Context;
use serde::Deserialize;

/// Deployment environment, read from `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    fn parse(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim) {
            Some("test") => Environment::Test,
            Some("production") => Environment::Production,
            _ => Environment::Development,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection string; wins over the split settings when present.
    pub url: Option<String>,
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: Environment,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub weather: WeatherConfig,
    pub host: String,
    pub port: u16,
    /// Empty means permissive CORS.
    pub cors_origins: Vec<String>,
    pub require_auth: bool,
    /// Reject signups whose email is not shaped like an address.
    pub strict_email: bool,
}

/// One year.
const MAX_TTL_MINUTES: i64 = 60 * 24 * 366;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:5174";

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Environment::parse(lookup("NODE_ENV"));
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL"),
            name: or("DB_NAME", "fitfusion"),
            user: or("DB_USER", "postgres"),
            password: or("DB_PASSWORD", ""),
            host: or("DB_HOST", "localhost"),
            port: parse_or(&lookup, "DB_PORT", 5432)?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
        };

        let secret = match (lookup("JWT_SECRET"), env) {
            (Some(secret), _) => secret,
            (None, Environment::Test) => "test-secret".to_string(),
            (None, _) => anyhow::bail!("JWT_SECRET must be set"),
        };
        let jwt = JwtConfig {
            secret,
            issuer: or("JWT_ISSUER", "fitfusion"),
            audience: or("JWT_AUDIENCE", "fitfusion-users"),
            ttl_minutes: parse_or(&lookup, "JWT_TTL_MINUTES", 60 * 24)?,
        };
        if !(1..=MAX_TTL_MINUTES).contains(&jwt.ttl_minutes) {
            anyhow::bail!("JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}");
        }

        let weather = WeatherConfig {
            api_key: or("WEATHER_API_KEY", ""),
            base_url: or("WEATHER_BASE_URL", "https://api.openweathermap.org"),
        };

        let cors_origins = parse_origins(&or("CORS_ORIGINS", DEFAULT_CORS_ORIGINS));

        Ok(Self {
            env,
            database,
            jwt,
            weather,
            host: or("APP_HOST", "0.0.0.0"),
            port: parse_or(&lookup, "APP_PORT", 3000)?,
            cors_origins,
            require_auth: parse_or(&lookup, "REQUIRE_AUTH", false)?,
            strict_email: parse_or(&lookup, "STRICT_EMAIL", false)?,
        })
    }

    /// Configuration used by `AppState::fake` and unit tests.
    pub fn for_tests() -> Self {
        Self {
            env: Environment::Test,
            database: DatabaseConfig {
                url: None,
                name: "fitfusion_test".into(),
                user: "postgres".into(),
                password: "postgres".into(),
                host: "localhost".into(),
                port: 5432,
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 60 * 24,
            },
            weather: WeatherConfig {
                api_key: "test-key".into(),
                base_url: "http://127.0.0.1:9".into(),
            },
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: Vec::new(),
            require_auth: false,
            strict_email: false,
        }
    }

    pub fn uses_memory_store(&self) -> bool {
        self.env == Environment::Test
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    if raw.trim() == "*" {
        return Vec::new();
    }
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
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
    fn defaults_apply_when_only_secret_is_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.database.port, 5432);
        assert_eq!(cfg.jwt.ttl_minutes, 1440);
        assert_eq!(cfg.cors_origins.len(), 2);
        assert!(!cfg.require_auth);
        assert!(!cfg.strict_email);
        assert!(!cfg.uses_memory_store());
    }

    #[test]
    fn missing_secret_is_an_error_outside_test() {
        let err = AppConfig::from_lookup(lookup_from(&[("NODE_ENV", "production")])).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_env_selects_memory_store_and_default_secret() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("NODE_ENV", " test ")])).unwrap();
        assert!(cfg.uses_memory_store());
        assert_eq!(cfg.jwt.secret, "test-secret");
    }

    #[test]
    fn split_database_settings_are_read() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "x"),
            ("DB_NAME", "fit"),
            ("DB_USER", "coach"),
            ("DB_PASSWORD", "pw"),
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
        ]))
        .unwrap();
        assert_eq!(cfg.database.name, "fit");
        assert_eq!(cfg.database.user, "coach");
        assert_eq!(cfg.database.host, "db.internal");
        assert_eq!(cfg.database.port, 6543);
        assert!(cfg.database.url.is_none());
    }

    #[test]
    fn invalid_number_is_reported() {
        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "x"), ("APP_PORT", "http")]))
            .unwrap_err();
        assert!(err.to_string().contains("APP_PORT"));
    }

    #[test]
    fn token_lifetime_is_bounded() {
        for raw in ["0", "-1", "9223372036854775807"] {
            let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "x"), ("JWT_TTL_MINUTES", raw)]))
                .unwrap_err();
            assert!(err.to_string().contains("JWT_TTL_MINUTES"), "{raw}");
        }
        let cfg = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "x"), ("JWT_TTL_MINUTES", "90")])).unwrap();
        assert_eq!(cfg.jwt.ttl_minutes, 90);
    }

    #[test]
    fn wildcard_cors_means_permissive() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "x"), ("CORS_ORIGINS", "*")]))
            .unwrap();
        assert!(cfg.cors_origins.is_empty());
    }
}
