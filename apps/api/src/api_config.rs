use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use folio_core::AppError;
use folio_domain::UserId;
use tracing_subscriber::EnvFilter;

const MIN_INTERNAL_SECRET_LENGTH: usize = 32;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub api_host: String,
    pub api_port: u16,
    pub internal_api_secret: String,
    pub dev_admin_user_id: Option<UserId>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());
        if migrate_only && database_url.is_none() {
            return Err(AppError::Validation(
                "DATABASE_URL is required to run migrations".to_owned(),
            ));
        }

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(10);

        let internal_api_secret = required_non_empty_env("INTERNAL_API_SECRET")?;
        if internal_api_secret.len() < MIN_INTERNAL_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "INTERNAL_API_SECRET must be at least {MIN_INTERNAL_SECRET_LENGTH} characters"
            )));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let dev_admin_user_id = env::var("DEV_ADMIN_USER_ID")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                UserId::from_str(value.trim()).map_err(|error| {
                    AppError::Validation(format!("invalid DEV_ADMIN_USER_ID: {error}"))
                })
            })
            .transpose()?;

        Ok(Self {
            migrate_only,
            database_url,
            database_max_connections,
            api_host,
            api_port,
            internal_api_secret,
            dev_admin_user_id,
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

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
