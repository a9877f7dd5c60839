//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Blob and quota configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Preview URL cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Demo tenant bootstrap configuration.
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Per-user storage quota in bytes.
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: u64,
    /// Largest single upload accepted, in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl StorageConfig {
    /// Default quota: 5 GiB.
    pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024 * 1024;
    /// Default max file size: 100 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            quota_bytes: default_quota_bytes(),
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_quota_bytes() -> u64 {
    StorageConfig::DEFAULT_QUOTA_BYTES
}

fn default_max_file_size() -> u64 {
    StorageConfig::DEFAULT_MAX_FILE_SIZE
}

/// Preview URL cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// How long a resolved URL stays valid, in seconds.
    #[serde(default = "default_url_ttl_secs")]
    pub url_ttl_secs: u64,
    /// Maximum number of cached URLs.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl CacheConfig {
    /// Default URL TTL: 5 minutes.
    pub const DEFAULT_URL_TTL_SECS: u64 = 300;
    /// Default capacity.
    pub const DEFAULT_MAX_CAPACITY: u64 = 10_000;
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url_ttl_secs: default_url_ttl_secs(),
            max_capacity: default_max_capacity(),
        }
    }
}

fn default_url_ttl_secs() -> u64 {
    CacheConfig::DEFAULT_URL_TTL_SECS
}

fn default_max_capacity() -> u64 {
    CacheConfig::DEFAULT_MAX_CAPACITY
}

/// Demo tenant configuration.
///
/// Seeding must only ever run in demo environments, so it is off unless
/// `enabled` is set explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    /// Whether fixture seeding runs at startup.
    #[serde(default)]
    pub enabled: bool,
    /// User that owns the fixture documents.
    #[serde(default = "default_demo_user_id")]
    pub user_id: String,
    /// Organization that owns the fixture documents.
    #[serde(default = "default_demo_org_id")]
    pub org_id: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            user_id: default_demo_user_id(),
            org_id: default_demo_org_id(),
        }
    }
}

fn default_demo_user_id() -> String {
    "70a44906-2efe-4481-b3f7-d2765391c525".to_string()
}

fn default_demo_org_id() -> String {
    "27bf5a34-833b-496b-b81f-f6adba91dc30".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        Self::load_with(&run_mode, environment())
    }

    fn load_with(run_mode: &str, env: config::Environment) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(env)
            .build()?;

        config.try_deserialize()
    }
}

/// `DOCVAULT__SECTION__KEY` environment overrides.
fn environment() -> config::Environment {
    config::Environment::with_prefix("DOCVAULT")
        .separator("__")
        .try_parsing(true)
}
