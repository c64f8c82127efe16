//! vnm-config - 配置加载库

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 输出 JSON 格式日志（生产环境默认开启）
    #[serde(default)]
    pub json: bool,
    /// 是否安装 Prometheus 记录器
    #[serde(default)]
    pub metrics: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
            metrics: false,
        }
    }
}

/// JWT 配置
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_audience")]
    pub audience: String,
}

fn default_expires_in() -> i64 {
    3600
}

fn default_issuer() -> String {
    "vnmarket".to_string()
}

fn default_audience() -> String {
    "vnmarket-api".to_string()
}

/// 查询缓存后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// 进程内 (moka)
    #[default]
    Local,
    /// Redis
    Redis,
}

/// 查询缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_max_capacity")]
    pub max_capacity: u64,
}

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_cache_max_capacity() -> u64 {
    10_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            ttl_secs: default_cache_ttl_secs(),
            max_capacity: default_cache_max_capacity(),
        }
    }
}

/// Redis 配置
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: Secret<String>,
    /// 商品事件发布频道
    #[serde(default = "default_event_channel")]
    pub event_channel: String,
}

fn default_event_channel() -> String {
    "catalog.events".to_string()
}

/// 市场配置
#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_currency")]
    pub default_currency: String,
    #[serde(default = "default_supported_currencies")]
    pub supported_currencies: Vec<String>,
    /// 创建商品时要求卖家具备本市场的 region/currency claim
    #[serde(default)]
    pub enforce_region_claims: bool,
}

fn default_region() -> String {
    "VN".to_string()
}

fn default_currency() -> String {
    "VND".to_string()
}

fn default_supported_currencies() -> Vec<String> {
    vec!["VND".to_string(), "USD".to_string()]
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            default_currency: default_currency(),
            supported_currencies: default_supported_currencies(),
            enforce_region_claims: false,
        }
    }
}

/// 批量操作配置
#[derive(Debug, Clone, Deserialize)]
pub struct BulkConfig {
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

fn default_max_batch_size() -> usize {
    500
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub redis: Option<RedisConfig>,
    #[serde(default)]
    pub marketplace: MarketplaceConfig,
    #[serde(default)]
    pub bulk: BulkConfig,
}

fn default_app_env() -> String {
    "development".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 优先级: `default.toml` < `{APP_ENV}.toml` < `VNM_` 前缀环境变量
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let figment = Figment::new()
            .merge(Serialized::default("app_env", &env))
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("VNM_").split("__"));

        Self::from_figment(figment)
    }

    /// 从任意 figment 提取并校验
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.backend == CacheBackend::Redis && self.redis.is_none() {
            return Err(ConfigError::Invalid(
                "cache.backend = \"redis\" requires a [redis] section".to_string(),
            ));
        }
        if self.bulk.max_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "bulk.max_batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

#[cfg(test)]
mod tests;
