use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::workflows::messaging::GenerationPolicy;
use crate::workflows::onboarding::{SessionLimits, DEFAULT_PAGE_SIZE};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub messaging: MessagingConfig,
    pub onboarding: OnboardingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let latency_ms = numeric_var("APP_MESSAGE_LATENCY_MS", 800)?;
        let timeout_ms = numeric_var("APP_MESSAGE_TIMEOUT_MS", 5_000)?;
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidNumber {
                key: "APP_MESSAGE_TIMEOUT_MS",
            });
        }
        let max_retries = numeric_var("APP_MESSAGE_MAX_RETRIES", 1)?;
        let retry_backoff_ms = numeric_var("APP_MESSAGE_RETRY_BACKOFF_MS", 250)?;

        let page_size = numeric_var("APP_QUIZ_PAGE_SIZE", DEFAULT_PAGE_SIZE as u64)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidNumber {
                key: "APP_QUIZ_PAGE_SIZE",
            });
        }
        let session_limits = SessionLimits::default();
        let session_ttl_secs =
            numeric_var("APP_ONBOARDING_SESSION_TTL_SECS", session_limits.ttl.as_secs())?;
        let max_sessions = numeric_var(
            "APP_ONBOARDING_MAX_SESSIONS",
            session_limits.max_sessions as u64,
        )?;
        if max_sessions == 0 {
            return Err(ConfigError::InvalidNumber {
                key: "APP_ONBOARDING_MAX_SESSIONS",
            });
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            messaging: MessagingConfig {
                latency: Duration::from_millis(latency_ms),
                timeout: Duration::from_millis(timeout_ms),
                max_retries: u32::try_from(max_retries).map_err(|_| {
                    ConfigError::InvalidNumber {
                        key: "APP_MESSAGE_MAX_RETRIES",
                    }
                })?,
                retry_backoff: Duration::from_millis(retry_backoff_ms),
            },
            onboarding: OnboardingConfig {
                page_size: usize::try_from(page_size).map_err(|_| ConfigError::InvalidNumber {
                    key: "APP_QUIZ_PAGE_SIZE",
                })?,
                session_ttl: Duration::from_secs(session_ttl_secs),
                max_sessions: usize::try_from(max_sessions).map_err(|_| {
                    ConfigError::InvalidNumber {
                        key: "APP_ONBOARDING_MAX_SESSIONS",
                    }
                })?,
            },
        })
    }
}

fn numeric_var(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Simulated generation latency plus the timeout/retry policy around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessagingConfig {
    pub latency: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl MessagingConfig {
    pub fn policy(&self) -> GenerationPolicy {
        GenerationPolicy {
            timeout: self.timeout,
            max_retries: self.max_retries,
            retry_backoff: self.retry_backoff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingConfig {
    pub page_size: usize,
    pub session_ttl: Duration,
    pub max_sessions: usize,
}

impl OnboardingConfig {
    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            ttl: self.session_ttl,
            max_sessions: self.max_sessions,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a positive whole number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
