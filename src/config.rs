use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub citation: CitationConfig,
    #[serde(default)]
    pub discography: DiscographyConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base: default_api_base(),
            auth_url: default_auth_url(),
            country_code: default_country_code(),
            page_limit: default_page_limit(),
        }
    }
}

fn default_api_base() -> String {
    "https://openapi.tidal.com".to_string()
}
fn default_auth_url() -> String {
    "https://auth.tidal.com/v1/oauth2/token".to_string()
}
fn default_country_code() -> String {
    "US".to_string()
}
fn default_page_limit() -> u32 {
    50
}

impl CatalogConfig {
    /// Client credentials, or an error naming what is missing.
    pub fn credentials(&self) -> Result<(String, String)> {
        let id = self
            .client_id
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("catalog.client_id not set (config or WAFER_CLIENT_ID)")
            })?;
        let secret = self
            .client_secret
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("catalog.client_secret not set (config or WAFER_CLIENT_SECRET)")
            })?;
        Ok((id, secret))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_request_interval_ms")]
    pub request_interval_ms: u64,
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            request_interval_ms: default_request_interval_ms(),
            max_retries: 0,
            user_agent: default_user_agent(),
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    3
}
fn default_read_timeout_secs() -> u64 {
    5
}
fn default_request_interval_ms() -> u64 {
    1000
}
fn default_user_agent() -> String {
    concat!("wafer/", env!("CARGO_PKG_VERSION")).to_string()
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Whole-request budget: connect plus read.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs + self.read_timeout_secs)
    }

    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CitationConfig {
    #[serde(default = "default_require_rating")]
    pub require_rating: bool,
}

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            require_rating: true,
        }
    }
}

fn default_require_rating() -> bool {
    true
}

/// What the neighbor resolver does when it meets a withheld release.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnavailablePolicy {
    /// Stop and report no neighbor.
    #[default]
    Abort,
    /// Treat it as some other album and keep scanning.
    Skip,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DiscographyConfig {
    #[serde(default)]
    pub unavailable_policy: UnavailablePolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./albums")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    apply_env_overrides(&mut config);
    validate(&config)?;

    Ok(config)
}

/// Config used when no file exists and the command needs no credentials.
pub fn default_config() -> Config {
    let mut config = Config::default();
    apply_env_overrides(&mut config);
    config
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(id) = std::env::var("WAFER_CLIENT_ID") {
        config.catalog.client_id = Some(id);
    }
    if let Ok(secret) = std::env::var("WAFER_CLIENT_SECRET") {
        config.catalog.client_secret = Some(secret);
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.http.connect_timeout_secs == 0 {
        anyhow::bail!("http.connect_timeout_secs must be > 0");
    }
    if config.http.read_timeout_secs == 0 {
        anyhow::bail!("http.read_timeout_secs must be > 0");
    }
    if !(1..=100).contains(&config.catalog.page_limit) {
        anyhow::bail!("catalog.page_limit must be in [1, 100]");
    }
    if config.catalog.country_code.len() != 2 {
        anyhow::bail!(
            "catalog.country_code must be a two-letter code, got '{}'",
            config.catalog.country_code
        );
    }
    Ok(())
}
