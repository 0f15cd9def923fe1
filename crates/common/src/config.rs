//! Application configuration.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Payment processor credentials.
    #[serde(default)]
    pub processors: ProcessorsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait when opening a new connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Seconds to wait for a free pooled connection.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    /// Seconds an unused connection may sit idle before it is closed.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Log every SQL statement at debug level.
    #[serde(default = "default_log_statements")]
    pub log_statements: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
    /// Fallback filter directive when `RUST_LOG` is unset.
    #[serde(default)]
    pub filter: Option<String>,
}

/// Credentials for each payment processor.
///
/// A processor without a section is skipped during sync.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessorsConfig {
    /// Stripe settings.
    #[serde(default)]
    pub stripe: Option<StripeConfig>,
    /// `PayPal` settings.
    #[serde(default)]
    pub paypal: Option<PayPalConfig>,
}

/// Stripe API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeConfig {
    /// Secret API key (`sk_...`).
    pub secret_key: String,
    /// Pinned Stripe API version.
    #[serde(default = "default_stripe_api_version")]
    pub api_version: String,
    /// API base URL.
    #[serde(default = "default_stripe_base_url")]
    pub base_url: String,
}

/// `PayPal` deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayPalEnvironment {
    /// Sandbox API.
    #[default]
    Sandbox,
    /// Production API.
    Live,
}

/// `PayPal` REST API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PayPalConfig {
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Which `PayPal` environment to talk to.
    #[serde(default)]
    pub environment: PayPalEnvironment,
    /// Overrides the environment's base URL.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl PayPalConfig {
    /// Base URL of the REST API for the configured environment.
    #[must_use]
    pub fn api_base(&self) -> &str {
        if let Some(url) = &self.base_url {
            return url;
        }
        match self.environment {
            PayPalEnvironment::Live => "https://api-m.paypal.com",
            PayPalEnvironment::Sandbox => "https://api-m.sandbox.paypal.com",
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

const fn default_acquire_timeout_secs() -> u64 {
    10
}

const fn default_idle_timeout_secs() -> u64 {
    600
}

const fn default_log_statements() -> bool {
    true
}

fn default_stripe_api_version() -> String {
    "2023-10-16".to_string()
}

fn default_stripe_base_url() -> String {
    "https://api.stripe.com".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `.env` (if present)
    /// 2. `config/default.toml`
    /// 3. `config/{environment}.toml` (based on `DISPUTE_DESK_ENV`)
    /// 4. Environment variables with `DISPUTE_DESK__` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let env =
            std::env::var("DISPUTE_DESK_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DISPUTE_DESK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
