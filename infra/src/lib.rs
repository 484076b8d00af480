//! # Infrastructure Layer
//!
//! Concrete adapters for the verified-session cache:
//! - **Cache**: Redis client and the Redis persistence port
//! - **Logging**: tracing subscriber setup
//! - **Bootstrap**: configuration loading and cache construction

use std::path::{Path, PathBuf};
use std::sync::Arc;

use vsc_core::errors::DomainError;
use vsc_core::repositories::{InMemoryPersistence, PersistencePort};
use vsc_core::services::session_cache::{
    EnvTtlSource, SessionCacheFactory, SystemClock, VerifiedSessionCache,
};
use vsc_shared::config::{AppConfig, Environment, SessionStoreKind};

/// Cache module - Redis client and persistence port
pub mod cache;

/// Tracing subscriber setup
pub mod logging;

pub use logging::init_tracing;

/// Infrastructure service container
#[derive(Clone)]
pub struct InfrastructureServices {
    /// Loaded configuration
    pub config: AppConfig,
    /// The verified-session cache, or its no-op stand-in
    pub session_cache: Arc<dyn VerifiedSessionCache>,
}

/// Initialize infrastructure services
///
/// This function:
/// - Loads `.env` and the application configuration
/// - Installs the tracing subscriber
/// - Connects the selected persistence backend
/// - Builds the session cache (capability check included)
pub async fn initialize() -> Result<InfrastructureServices, InfrastructureError> {
    let config = load_config()?;
    init_tracing(&config.logging);

    tracing::info!(
        environment = %config.environment,
        store = ?config.store,
        "Initializing infrastructure services..."
    );

    let session_cache = build_session_cache(&config).await?;

    tracing::info!("Infrastructure services initialized successfully");

    Ok(InfrastructureServices {
        config,
        session_cache,
    })
}

/// Build the session cache for `config`
///
/// The TTL is re-read from the environment on every write.
pub async fn build_session_cache(
    config: &AppConfig,
) -> Result<Arc<dyn VerifiedSessionCache>, InfrastructureError> {
    match config.store {
        SessionStoreKind::Memory => {
            Ok(build_with_port(Arc::new(InMemoryPersistence::new()), config).await)
        }
        SessionStoreKind::Redis => {
            let port = cache::RedisPersistence::connect(&config.redis).await?;
            Ok(build_with_port(Arc::new(port), config).await)
        }
    }
}

async fn build_with_port<P>(port: Arc<P>, config: &AppConfig) -> Arc<dyn VerifiedSessionCache>
where
    P: PersistencePort + 'static,
{
    SessionCacheFactory::build(
        port,
        &config.session_cache,
        Arc::new(EnvTtlSource::default()),
        Arc::new(SystemClock),
    )
    .await
}

/// Load configuration from the environment and the `.env` files
///
/// The environment-specific file (e.g. `.env.production`) is read before
/// `.env`. Variables already set are never overridden.
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    let loaded = load_env_files(Path::new("."), Environment::from_env());
    tracing::debug!(files = ?loaded, "Loaded environment files");

    let config = AppConfig::from_env();
    if config.session_cache.namespace.is_empty() || config.session_cache.cache_name.is_empty() {
        return Err(InfrastructureError::Config(
            "Session cache namespace and name must not be empty".to_string(),
        ));
    }

    Ok(config)
}

/// Load `<dir>/<env file>` then `<dir>/.env`, returning the files found
pub fn load_env_files(dir: &Path, environment: Environment) -> Vec<PathBuf> {
    [environment.env_file(), ".env"]
        .into_iter()
        .map(|name| dir.join(name))
        .filter(|path| dotenvy::from_path(path).is_ok())
        .collect()
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Config(message) => DomainError::Internal { message },
            cache @ InfrastructureError::Cache(_) => DomainError::Persistence {
                message: cache.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infrastructure_error_to_domain_error() {
        let redis_err = redis::RedisError::from((redis::ErrorKind::IoError, "connection reset"));
        let err: DomainError = InfrastructureError::from(redis_err).into();
        match err {
            DomainError::Persistence { message } => assert!(message.contains("connection reset")),
            other => panic!("Expected persistence error, got {:?}", other),
        }

        let err: DomainError = InfrastructureError::Config("bad url".to_string()).into();
        assert!(matches!(err, DomainError::Internal { .. }));
    }

    #[test]
    fn test_environment_file_loaded_before_dotenv() {
        let dir = std::env::temp_dir().join(format!("vsc_infra_env_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(".env.staging"),
            "VSC_INFRA_TEST_ENV_SOURCE=staging\nVSC_INFRA_TEST_STAGING_ONLY=yes\n",
        )
        .unwrap();
        std::fs::write(dir.join(".env"), "VSC_INFRA_TEST_ENV_SOURCE=dotenv\n").unwrap();

        let loaded = load_env_files(&dir, Environment::Staging);

        assert_eq!(loaded, vec![dir.join(".env.staging"), dir.join(".env")]);
        assert_eq!(std::env::var("VSC_INFRA_TEST_ENV_SOURCE").unwrap(), "staging");
        assert_eq!(std::env::var("VSC_INFRA_TEST_STAGING_ONLY").unwrap(), "yes");

        // no .env.production in the directory
        assert_eq!(load_env_files(&dir, Environment::Production), vec![dir.join(".env")]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_memory_store_without_pepper_is_disabled() {
        let config = AppConfig::default();
        let cache = build_session_cache(&config).await.unwrap();

        assert!(!cache.record_verified("66812345678").await);
        assert!(!cache.is_verified("66812345678").await);
    }

    #[tokio::test]
    async fn test_memory_store_with_pepper() {
        let mut config = AppConfig::default();
        config.session_cache.pepper = "infra-test-pepper".to_string();
        config.session_cache.kdf_iterations = vsc_shared::config::MIN_KDF_ITERATIONS;

        let cache = build_session_cache(&config).await.unwrap();
        assert!(cache.record_verified("66812345678").await);
        assert!(cache.is_verified("66812345678").await);
    }
}
