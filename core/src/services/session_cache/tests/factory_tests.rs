//! Tests for cache construction and the capability check

use std::sync::Arc;

use vsc_shared::config::SessionCacheConfig;

use crate::errors::SessionCacheError;
use crate::repositories::InMemoryPersistence;
use crate::services::session_cache::SessionCacheFactory;

use super::mocks::{start_time, test_config, FailingPersistence, MockClock, MockTtl};

const PHONE: &str = "66812345678";

#[tokio::test]
async fn test_build_with_all_capabilities() {
    let port = Arc::new(InMemoryPersistence::new());
    let cache = SessionCacheFactory::build(
        port.clone(),
        &test_config(),
        Arc::new(MockTtl::new(Some("10"))),
        Arc::new(MockClock::new(start_time())),
    )
    .await;

    assert!(cache.record_verified(PHONE).await);
    assert!(cache.is_verified(PHONE).await);
    assert_eq!(port.len().unwrap(), 1);
}

#[tokio::test]
async fn test_missing_pepper_disables_cache() {
    let port = Arc::new(InMemoryPersistence::new());
    let config = SessionCacheConfig::new("");

    assert_eq!(
        SessionCacheFactory::check_capabilities(port.as_ref(), &config).await,
        Err(SessionCacheError::CapabilityUnavailable {
            capability: "pepper".to_string()
        })
    );

    let cache = SessionCacheFactory::build_default(port.clone(), &config).await;
    assert!(!cache.record_verified(PHONE).await);
    assert!(!cache.is_verified(PHONE).await);
    assert!(port.is_empty().unwrap());
}

#[tokio::test]
async fn test_unavailable_port_disables_cache() {
    let port = Arc::new(FailingPersistence::unavailable());

    assert_eq!(
        SessionCacheFactory::check_capabilities(port.as_ref(), &test_config()).await,
        Err(SessionCacheError::CapabilityUnavailable {
            capability: "persistence".to_string()
        })
    );

    let cache = SessionCacheFactory::build_default(port.clone(), &test_config()).await;
    assert!(!cache.record_verified(PHONE).await);
    assert!(cache.lookup_verified(PHONE).await.is_none());
    cache.clear_all().await;
    assert!(port.inner.is_empty().unwrap());
}

#[tokio::test]
async fn test_capability_check_passes() {
    let port = InMemoryPersistence::new();
    assert!(SessionCacheFactory::check_capabilities(&port, &test_config())
        .await
        .is_ok());
}
