use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use crate::finance::FinanceConfig;
use crate::inventory::OfficeCredentials;
use crate::leads::{EmailJsCredentials, LeadSettings, RateLimitConfig, RetryAfterPolicy};

/// Longest accepted rate limit window, one day.
pub const MAX_RATE_LIMIT_WINDOW_SECS: i64 = 86_400;

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
    pub finance: FinanceConfig,
    pub rate_limit: RateLimitConfig,
    pub relay: RelayConfig,
    pub office: Option<OfficeCredentials>,
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

        let finance = FinanceConfig {
            vat_percent: parse_var("FINANCE_VAT_PERCENT", 7.0)?,
            ..FinanceConfig::default()
        };

        let window_secs: i64 = parse_var("RATE_LIMIT_WINDOW_SECS", 300)?;
        let limit: u32 = parse_var("RATE_LIMIT_MAX", 3)?;
        if !(1..=MAX_RATE_LIMIT_WINDOW_SECS).contains(&window_secs) || limit == 0 {
            return Err(ConfigError::InvalidRateLimit);
        }
        let window =
            chrono::Duration::try_seconds(window_secs).ok_or(ConfigError::InvalidRateLimit)?;
        let retry_after = match env::var("LEADS_RETRY_AFTER_POLICY") {
            Ok(value) => RetryAfterPolicy::parse(&value)
                .ok_or(ConfigError::InvalidRetryAfterPolicy { value })?,
            Err(_) => RetryAfterPolicy::default(),
        };
        let rate_limit = RateLimitConfig {
            policy: crate::leads::RateLimitPolicy {
                window,
                limit,
            },
            retry_after,
            fail_open: parse_var("RATE_LIMIT_FAIL_OPEN", false)?,
        };

        let relay = RelayConfig {
            emailjs: emailjs_credentials(),
            timeout: Duration::from_secs(parse_var("EMAILJS_TIMEOUT_SECS", 12)?),
            retry_delay: Duration::from_millis(parse_var("EMAILJS_RETRY_DELAY_MS", 600)?),
            fallback_contact: non_empty_var("LEADS_FALLBACK_CONTACT"),
        };

        let office = match (non_empty_var("OFFICE_USERNAME"), non_empty_var("OFFICE_PASSWORD")) {
            (Some(username), Some(password)) => Some(OfficeCredentials { username, password }),
            _ => None,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            finance,
            rate_limit,
            relay,
            office,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue { name, raw }),
        None => Ok(default),
    }
}

fn emailjs_credentials() -> Option<EmailJsCredentials> {
    Some(EmailJsCredentials {
        service_id: non_empty_var("EMAILJS_SERVICE_ID")?,
        template_id: non_empty_var("EMAILJS_TEMPLATE_ID")?,
        public_key: non_empty_var("EMAILJS_PUBLIC_KEY")?,
        private_key: non_empty_var("EMAILJS_PRIVATE_KEY")?,
    })
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

/// Lead relay credentials and delivery timing.
#[derive(Clone)]
pub struct RelayConfig {
    pub emailjs: Option<EmailJsCredentials>,
    pub timeout: Duration,
    pub retry_delay: Duration,
    pub fallback_contact: Option<String>,
}

impl RelayConfig {
    pub fn lead_settings(&self) -> LeadSettings {
        LeadSettings {
            retry_delay: self.retry_delay,
            fallback_contact: self.fallback_contact.clone(),
        }
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("emailjs_configured", &self.emailjs.is_some())
            .field("timeout", &self.timeout)
            .field("retry_delay", &self.retry_delay)
            .field("fallback_contact", &self.fallback_contact)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValue { name: &'static str, raw: String },
    InvalidRateLimit,
    InvalidRetryAfterPolicy { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValue { name, raw } => {
                write!(f, "{name} has an unparseable value '{raw}'")
            }
            ConfigError::InvalidRateLimit => write!(
                f,
                "RATE_LIMIT_WINDOW_SECS must be between 1 and {MAX_RATE_LIMIT_WINDOW_SECS} and RATE_LIMIT_MAX positive"
            ),
            ConfigError::InvalidRetryAfterPolicy { value } => write!(
                f,
                "LEADS_RETRY_AFTER_POLICY must be 'longest' or 'shortest', got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
