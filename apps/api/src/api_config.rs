use std::env::{self, VarError};
use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use rolegate_application::{EffectivePermissions, GuardPaths};
use rolegate_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpAuthorityConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub enum PermissionAuthorityConfig {
    Http(HttpAuthorityConfig),
    Static(EffectivePermissions),
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub cookie_secure: bool,
    pub session_idle_timeout: Duration,
    pub guard_paths: GuardPaths,
    pub permission_authority: PermissionAuthorityConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = parse_env("API_PORT", env::var("API_PORT"), 3001_u16)?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let cookie_secure = parse_flag(
            "SESSION_COOKIE_SECURE",
            env::var("SESSION_COOKIE_SECURE"),
            false,
        )?;
        let session_idle_timeout = parse_idle_timeout(env::var("SESSION_IDLE_TIMEOUT_SECONDS"))?;

        let defaults = GuardPaths::default();
        let guard_paths = GuardPaths {
            sign_in: path_env("SIGN_IN_PATH", defaults.sign_in)?,
            pending_approval: path_env("PENDING_APPROVAL_PATH", defaults.pending_approval)?,
            default_fallback: path_env("GUARD_FALLBACK_PATH", defaults.default_fallback)?,
        };

        let permission_authority = match env::var("PERMISSION_AUTHORITY_PROVIDER")
            .unwrap_or_else(|_| "http".to_owned())
            .as_str()
        {
            "http" => {
                let raw_url = required_non_empty_env("PERMISSION_AUTHORITY_URL")?;
                let base_url = Url::parse(raw_url.as_str()).map_err(|error| {
                    AppError::Validation(format!("invalid PERMISSION_AUTHORITY_URL: {error}"))
                })?;
                let timeout_ms = parse_env(
                    "PERMISSION_AUTHORITY_TIMEOUT_MS",
                    env::var("PERMISSION_AUTHORITY_TIMEOUT_MS"),
                    10_000_u64,
                )?;
                PermissionAuthorityConfig::Http(HttpAuthorityConfig {
                    base_url,
                    timeout: Duration::from_millis(timeout_ms),
                })
            }
            "static" => PermissionAuthorityConfig::Static(EffectivePermissions {
                role: env::var("STATIC_PERMISSION_ROLE").unwrap_or_else(|_| "viewer".to_owned()),
                is_super_admin: parse_flag(
                    "STATIC_PERMISSION_SUPER_ADMIN",
                    env::var("STATIC_PERMISSION_SUPER_ADMIN"),
                    false,
                )?,
                permissions: env::var("STATIC_PERMISSIONS")
                    .map(|value| split_list(value.as_str()))
                    .unwrap_or_default(),
            }),
            other => {
                return Err(AppError::Validation(format!(
                    "PERMISSION_AUTHORITY_PROVIDER must be either 'http' or 'static', got '{other}'"
                )));
            }
        };

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            cookie_secure,
            session_idle_timeout,
            guard_paths,
            permission_authority,
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

pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Parses an optional variable, using `default` only when it is unset.
fn parse_env<T>(name: &str, raw: Result<String, VarError>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}"))),
        Err(VarError::NotPresent) => Ok(default),
        Err(VarError::NotUnicode(_)) => Err(AppError::Validation(format!(
            "{name} must be valid unicode"
        ))),
    }
}

/// Parses an optional `true`/`false` flag.
fn parse_flag(name: &str, raw: Result<String, VarError>, default: bool) -> Result<bool, AppError> {
    let value = match raw {
        Ok(value) => value,
        Err(VarError::NotPresent) => return Ok(default),
        Err(VarError::NotUnicode(_)) => {
            return Err(AppError::Validation(format!("{name} must be valid unicode")));
        }
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "{name} must be either 'true' or 'false', got '{value}'"
        ))),
    }
}

fn parse_idle_timeout(raw: Result<String, VarError>) -> Result<Duration, AppError> {
    let seconds = parse_env("SESSION_IDLE_TIMEOUT_SECONDS", raw, 1_800_u64)?;
    if seconds == 0 {
        return Err(AppError::Validation(
            "SESSION_IDLE_TIMEOUT_SECONDS must be greater than zero".to_owned(),
        ));
    }

    Ok(Duration::from_secs(seconds))
}

fn path_env(name: &str, default: String) -> Result<String, AppError> {
    let value = env::var(name).unwrap_or(default);
    if !value.starts_with('/') {
        return Err(AppError::Validation(format!(
            "{name} must be an absolute path, got '{value}'"
        )));
    }

    Ok(value)
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
