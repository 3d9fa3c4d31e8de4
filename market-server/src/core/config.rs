use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::auth::JwtConfig;
use crate::core::MarketResult;
use crate::pricing::FeePolicy;

/// Bootstrap administrator credentials
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// Server configuration
///
/// # Environment
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | ./data | database, uploads and logs live here |
/// | HTTP_HOST | 0.0.0.0 | bind address |
/// | HTTP_PORT | 5000 | HTTP port |
/// | ENVIRONMENT | development | development / production |
/// | LOG_LEVEL | info | tracing filter |
/// | LOG_JSON | false | JSON log lines |
/// | FEE_POLICY | percentage | percentage / flat_per_unit |
/// | FEE_RATE | 0.15 | percentage policy rate |
/// | FEE_FLAT_DEDUCTION | 5 | flat policy deduction per unit |
/// | MIN_LISTING_QUANTITY | 10 | smallest quantity a producer may list |
/// | AUTO_APPROVE_THRESHOLD | 60 | quality score strictly above this auto-approves |
/// | QUALITY_PLACEHOLDER_SCORE | 0 | score reported for listings with an image |
/// | STORE_TIMEOUT_MS | 5000 | bound on every store call |
/// | ORDER_MAX_RETRIES | 3 | re-check attempts for a contested order |
/// | DB_CONNECT_ATTEMPTS | 5 | store open attempts at startup |
/// | DB_RETRY_BACKOFF_MS | 200 | initial backoff between open attempts |
/// | RECENT_ACTIVITY_LIMIT | 20 | admin feed length |
/// | MAX_UPLOAD_BYTES | 5242880 | upload size limit |
/// | ADMIN_EMAIL / ADMIN_PASSWORD / ADMIN_NAME | unset | bootstrap administrator |
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_host: String,
    pub http_port: u16,
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub jwt: JwtConfig,
    pub fee_policy: FeePolicy,
    pub min_listing_quantity: Decimal,
    pub auto_approve_threshold: u8,
    pub quality_placeholder_score: u8,
    pub store_timeout: Duration,
    pub order_max_retries: u32,
    pub db_connect_attempts: u32,
    pub db_retry_backoff: Duration,
    pub recent_activity_limit: usize,
    pub max_upload_bytes: usize,
    pub admin: Option<AdminBootstrap>,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load from environment variables, falling back to defaults.
    ///
    /// Fails only when a value parses but is semantically invalid
    /// (e.g. a fee rate above 1).
    pub fn from_env() -> MarketResult<Self> {
        let fee_policy = FeePolicy::from_parts(
            &std::env::var("FEE_POLICY").unwrap_or_else(|_| "percentage".into()),
            env_or("FEE_RATE", FeePolicy::DEFAULT_RATE),
            env_or("FEE_FLAT_DEDUCTION", FeePolicy::DEFAULT_FLAT_DEDUCTION),
        )?;

        let admin = match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminBootstrap {
                    email,
                    password,
                    display_name: std::env::var("ADMIN_NAME")
                        .unwrap_or_else(|_| "Administrator".into()),
                })
            }
            _ => None,
        };

        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_host: std::env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            http_port: env_or("HTTP_PORT", 5000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_or("LOG_JSON", false),
            jwt: JwtConfig::from_env()?,
            fee_policy,
            min_listing_quantity: env_or("MIN_LISTING_QUANTITY", Decimal::TEN),
            auto_approve_threshold: env_or("AUTO_APPROVE_THRESHOLD", 60),
            quality_placeholder_score: env_or("QUALITY_PLACEHOLDER_SCORE", 0),
            store_timeout: Duration::from_millis(env_or("STORE_TIMEOUT_MS", 5000)),
            order_max_retries: env_or("ORDER_MAX_RETRIES", 3),
            db_connect_attempts: env_or("DB_CONNECT_ATTEMPTS", 5),
            db_retry_backoff: Duration::from_millis(env_or("DB_RETRY_BACKOFF_MS", 200)),
            recent_activity_limit: env_or("RECENT_ACTIVITY_LIMIT", 20),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 5 * 1024 * 1024),
            admin,
        })
    }

    /// Defaults with a custom work dir and a fixed JWT secret
    ///
    /// Used by tests and embedded setups that must not read the environment.
    pub fn with_overrides(work_dir: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_host: "127.0.0.1".into(),
            http_port: 0,
            environment: "test".into(),
            log_level: "info".into(),
            log_json: false,
            jwt: JwtConfig::with_secret(jwt_secret),
            fee_policy: FeePolicy::default(),
            min_listing_quantity: Decimal::TEN,
            auto_approve_threshold: 60,
            quality_placeholder_score: 0,
            store_timeout: Duration::from_millis(5000),
            order_max_retries: 3,
            db_connect_attempts: 1,
            db_retry_backoff: Duration::from_millis(50),
            recent_activity_limit: 20,
            max_upload_bytes: 5 * 1024 * 1024,
            admin: None,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the work directory layout if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.uploads_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_use_documented_defaults() {
        let config = Config::with_overrides("/tmp/market", "x".repeat(32));
        assert_eq!(config.fee_policy, FeePolicy::default());
        assert_eq!(config.min_listing_quantity, Decimal::TEN);
        assert_eq!(config.auto_approve_threshold, 60);
        assert_eq!(config.recent_activity_limit, 20);
        assert_eq!(config.uploads_dir(), PathBuf::from("/tmp/market/uploads"));
        assert!(!config.is_production());
    }

    #[test]
    fn work_dir_structure_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(tmp.path().to_string_lossy(), "x".repeat(32));
        config.ensure_work_dir_structure().unwrap();
        assert!(config.database_dir().is_dir());
        assert!(config.uploads_dir().is_dir());
        assert!(config.logs_dir().is_dir());
    }
}
