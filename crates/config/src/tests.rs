use crate::{AppConfig, CacheBackend, ConfigError, JwtConfig};
use figment::{
    Figment, Jail,
    providers::{Format, Toml},
};
use secrecy::{ExposeSecret, Secret};

const MINIMAL: &str = r#"
app_name = "catalog"

[jwt]
secret = "dev-secret"
"#;

#[test]
fn test_secret_redaction() {
    let config = JwtConfig {
        secret: Secret::new("super-secret-signing-key".to_string()),
        expires_in: 3600,
        issuer: "vnmarket".to_string(),
        audience: "vnmarket-api".to_string(),
    };
    let debug_output = format!("{:?}", config);
    assert!(!debug_output.contains("super-secret-signing-key"));
    assert!(debug_output.contains("REDACTED"));
}

#[test]
fn test_defaults_applied() {
    let config = AppConfig::from_figment(Figment::from(Toml::string(MINIMAL))).unwrap();

    assert_eq!(config.app_env, "development");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.telemetry.log_level, "info");
    assert_eq!(config.cache.backend, CacheBackend::Local);
    assert_eq!(config.cache.ttl_secs, 60);
    assert_eq!(config.marketplace.region, "VN");
    assert_eq!(config.marketplace.default_currency, "VND");
    assert!(!config.marketplace.enforce_region_claims);
    assert_eq!(config.bulk.max_batch_size, 500);
    assert!(config.redis.is_none());
    assert!(config.is_development());
}

#[test]
fn test_redis_backend_requires_redis_section() {
    let toml = format!("{}\n[cache]\nbackend = \"redis\"\n", MINIMAL);
    let result = AppConfig::from_figment(Figment::from(Toml::string(&toml)));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_load_merges_env_file_and_env_vars() {
    Jail::expect_with(|jail| {
        jail.create_dir("config")?;
        jail.create_file("config/default.toml", MINIMAL)?;
        jail.create_file(
            "config/production.toml",
            r#"
            [telemetry]
            json = true

            [server]
            port = 9000
            "#,
        )?;
        jail.set_env("APP_ENV", "production");
        jail.set_env("VNM_JWT__SECRET", "from-env");
        jail.set_env("VNM_BULK__MAX_BATCH_SIZE", "50");

        let config = AppConfig::load("config").map_err(|e| e.to_string())?;

        assert!(config.is_production());
        assert!(config.telemetry.json);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.jwt.secret.expose_secret(), "from-env");
        assert_eq!(config.bulk.max_batch_size, 50);
        Ok(())
    });
}
