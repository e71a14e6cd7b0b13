use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use taskward_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_API_HOST: &str = "127.0.0.1";
const DEFAULT_API_PORT: u16 = 3001;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
const MIN_SESSION_SECRET_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(env::args().nth(1).as_deref(), |name| env::var(name).ok())
    }

    fn from_lookup(
        first_argument: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::Validation(format!("{name} is required")))
        };

        let database_url = required("DATABASE_URL")?;
        let bootstrap_token = required("AUTH_BOOTSTRAP_TOKEN")?;
        let session_secret = required("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "SESSION_SECRET must be at least {MIN_SESSION_SECRET_LENGTH} characters"
            )));
        }

        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_owned());
        let api_host = lookup("API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.to_owned());
        let api_port = lookup("API_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_API_PORT);
        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS);
        let cookie_secure = lookup("SESSION_COOKIE_SECURE")
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));

        Ok(Self {
            migrate_only: first_argument == Some("migrate"),
            database_url,
            database_max_connections,
            frontend_url,
            bootstrap_token,
            api_host,
            api_port,
            cookie_secure,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use taskward_core::AppError;

    use super::ApiConfig;

    fn lookup(values: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = values
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        move |name| values.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://localhost/taskward"),
        ("AUTH_BOOTSTRAP_TOKEN", "bootstrap"),
        ("SESSION_SECRET", "0123456789abcdef0123456789abcdef"),
    ];

    #[test]
    fn defaults_apply_when_optional_values_are_missing() {
        let config = ApiConfig::from_lookup(None, lookup(&REQUIRED));
        assert!(config.as_ref().is_ok_and(|config| {
            config.api_port == 3001
                && config.database_max_connections == 10
                && config.frontend_url == "http://localhost:3000"
                && !config.cookie_secure
                && !config.migrate_only
        }));
        assert!(
            config
                .and_then(|config| config.socket_address())
                .is_ok_and(|address| address.to_string() == "127.0.0.1:3001")
        );
    }

    #[test]
    fn short_session_secret_is_rejected() {
        let mut values = REQUIRED.to_vec();
        values[2] = ("SESSION_SECRET", "too-short");

        let config = ApiConfig::from_lookup(None, lookup(&values));
        assert!(matches!(config, Err(AppError::Validation(_))));
    }

    #[test]
    fn missing_database_url_is_rejected() {
        let config = ApiConfig::from_lookup(None, lookup(&REQUIRED[1..]));
        assert!(matches!(config, Err(AppError::Validation(message)) if message.contains("DATABASE_URL")));
    }

    #[test]
    fn migrate_argument_and_overrides_are_read() {
        let mut values = REQUIRED.to_vec();
        values.extend([
            ("API_PORT", "8080"),
            ("SESSION_COOKIE_SECURE", "TRUE"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
        ]);

        let config = ApiConfig::from_lookup(Some("migrate"), lookup(&values));
        assert!(config.is_ok_and(|config| {
            config.migrate_only
                && config.api_port == 8080
                && config.cookie_secure
                && config.database_max_connections == 10
        }));
    }
}
