use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::quote::HtmlStyle;

const DEFAULT_SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

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
    pub mail: MailConfig,
    pub notification: NotificationConfig,
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

        let mail = MailConfig {
            api_key: non_empty_var("SENDGRID_API_KEY"),
            to: non_empty_var("MAIL_TO"),
            from: non_empty_var("MAIL_FROM"),
            api_url: non_empty_var("SENDGRID_API_URL")
                .unwrap_or_else(|| DEFAULT_SENDGRID_URL.to_string()),
        };

        let style = match non_empty_var("QUOTE_HTML_STYLE") {
            Some(raw) => HtmlStyle::parse(&raw).ok_or(ConfigError::InvalidHtmlStyle(raw))?,
            None => HtmlStyle::Branded,
        };
        let notification = NotificationConfig {
            logo_url: non_empty_var("LOGO_URL"),
            style,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            mail,
            notification,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Mail provider credentials and addressing.
///
/// The three addressing values stay optional at load time: a missing value is
/// reported on every quote request instead of preventing the service from
/// starting.
#[derive(Clone, Default)]
pub struct MailConfig {
    pub api_key: Option<String>,
    pub to: Option<String>,
    pub from: Option<String>,
    pub api_url: String,
}

impl MailConfig {
    /// Returns the addressing pair when every required value is present.
    pub fn recipients(&self) -> Option<Recipients<'_>> {
        self.api_key.as_ref()?;
        Some(Recipients {
            to: self.to.as_deref()?,
            from: self.from.as_deref()?,
        })
    }

    /// Names of the required variables that are unset.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.is_none() {
            missing.push("SENDGRID_API_KEY");
        }
        if self.to.is_none() {
            missing.push("MAIL_TO");
        }
        if self.from.is_none() {
            missing.push("MAIL_FROM");
        }
        missing
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("to", &self.to)
            .field("from", &self.from)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Destination mailbox and verified sender for a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipients<'a> {
    pub to: &'a str,
    pub from: &'a str,
}

/// Presentation settings for the rendered notification.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub logo_url: Option<String>,
    pub style: HtmlStyle,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            logo_url: None,
            style: HtmlStyle::Branded,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidHtmlStyle(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidHtmlStyle(value) => {
                write!(f, "QUOTE_HTML_STYLE must be 'branded' or 'plain', got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort | ConfigError::InvalidHtmlStyle(_) => None,
        }
    }
}
