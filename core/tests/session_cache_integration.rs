//! Integration tests for the verified-session cache through its public API

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::{Arc, Mutex};

    use vsc_core::services::session_cache::{
        Clock, EncryptedSessionCache, IdentifierHasher, SessionCacheFactory, TtlSource,
        VerifiedSessionCache,
    };
    use vsc_core::{InMemoryPersistence, PersistencePort, StorageEnvelope};
    use vsc_shared::config::{SessionCacheConfig, MIN_KDF_ITERATIONS};

    struct TestClock(Mutex<DateTime<Utc>>);

    impl TestClock {
        fn at(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now = *now + by;
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    struct FixedTtl(Option<&'static str>);

    impl TtlSource for FixedTtl {
        fn raw_ttl_days(&self) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    fn config() -> SessionCacheConfig {
        SessionCacheConfig::new("integration-pepper").with_kdf_iterations(MIN_KDF_ITERATIONS)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    struct Harness {
        store: InMemoryPersistence,
        clock: Arc<TestClock>,
        cache: Arc<dyn VerifiedSessionCache>,
    }

    async fn harness(ttl: Option<&'static str>) -> Harness {
        let store = InMemoryPersistence::new();
        let clock = Arc::new(TestClock::at(now()));
        let cache = SessionCacheFactory::build(
            Arc::new(store.clone()),
            &config(),
            Arc::new(FixedTtl(ttl)),
            clock.clone(),
        )
        .await;
        Harness { store, clock, cache }
    }

    #[tokio::test]
    async fn test_example_scenario_seven_days() {
        let h = harness(Some("7")).await;

        assert!(h.cache.record_verified("66812345678").await);

        let key = IdentifierHasher::from_config(&config()).storage_key_for("66812345678");
        let raw = h.store.get(&key).await.unwrap().unwrap();
        let envelope = StorageEnvelope::from_json(&raw).unwrap();
        assert_eq!(envelope.expires_at, now() + Duration::days(7));

        let session = h.cache.lookup_verified("66812345678").await.unwrap();
        assert_eq!(session.identifier, "66812345678");
        assert_eq!(session.verified_at, now());
        assert_eq!(session.expires_at, now() + Duration::days(7));

        h.clock.advance(Duration::days(8));

        assert!(h.cache.lookup_verified("66812345678").await.is_none());
        assert_eq!(h.store.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_round_trip_ttl_bounds() {
        for (raw, days) in [("7", 7), ("14", 14), ("3", 7), ("30", 14), ("fortnight", 7)] {
            let h = harness(Some(raw)).await;
            h.cache.record_verified("+14155552671").await;

            let session = h.cache.lookup_verified("+14155552671").await.unwrap();
            assert_eq!(session.identifier, "+14155552671");
            assert_eq!(session.expires_at - session.verified_at, Duration::days(days));
        }
    }

    #[tokio::test]
    async fn test_stale_entry_removed_on_lookup() {
        let h = harness(None).await;
        h.cache.record_verified("66812345678").await;
        assert_eq!(h.store.len().unwrap(), 1);

        h.clock.advance(Duration::days(30));

        assert!(!h.cache.is_verified("66812345678").await);
        assert!(h.store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_isolation_between_identifiers() {
        let h = harness(None).await;
        h.cache.record_verified("66812345678").await;

        let hasher = IdentifierHasher::from_config(&config());
        let victim_key = hasher.storage_key_for("66899999999");
        let raw = h
            .store
            .get(&hasher.storage_key_for("66812345678"))
            .await
            .unwrap()
            .unwrap();
        // attacker knows the victim's storage key and plants its own envelope
        h.store.set(&victim_key, &raw).await.unwrap();

        assert!(!h.cache.is_verified("66899999999").await);
        assert!(h.cache.is_verified("66812345678").await);
    }

    #[tokio::test]
    async fn test_tampered_iv_reads_as_absent() {
        let h = harness(None).await;
        h.cache.record_verified("66812345678").await;

        let key = IdentifierHasher::from_config(&config()).storage_key_for("66812345678");
        let raw = h.store.get(&key).await.unwrap().unwrap();
        let mut envelope = StorageEnvelope::from_json(&raw).unwrap();
        let mut iv = BASE64.decode(&envelope.iv).unwrap();
        iv[11] ^= 0x80;
        envelope.iv = BASE64.encode(iv);
        h.store.set(&key, &envelope.to_json().unwrap()).await.unwrap();

        assert!(h.cache.lookup_verified("66812345678").await.is_none());
    }

    #[tokio::test]
    async fn test_clear_one_twice() {
        let h = harness(None).await;
        h.cache.record_verified("66812345678").await;

        h.cache.clear_one("66812345678").await;
        h.cache.clear_one("66812345678").await;
        h.cache.clear_one("66800000001").await;

        assert!(!h.cache.is_verified("66812345678").await);
        assert!(h.store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_clear_all_removes_every_session() {
        let h = harness(None).await;
        let identifiers = ["66812345678", "66887654321", "+14155552671"];
        for id in identifiers {
            assert!(h.cache.record_verified(id).await);
        }
        h.store.set("app:settings:locale", "th").await.unwrap();

        h.cache.clear_all().await;

        for id in identifiers {
            assert!(!h.cache.is_verified(id).await);
        }
        assert!(h
            .store
            .keys_with_prefix(&config().key_prefix())
            .await
            .unwrap()
            .is_empty());
        assert_eq!(h.store.keys().unwrap(), vec!["app:settings:locale".to_string()]);
    }

    #[tokio::test]
    async fn test_namespaces_do_not_interfere() {
        let store = InMemoryPersistence::new();
        let port = Arc::new(store.clone());
        let shop = EncryptedSessionCache::with_defaults(port.clone(), &config().with_names("shop", "vs"));
        let bank = EncryptedSessionCache::with_defaults(port, &config().with_names("bank", "vs"));

        shop.record_verified("66812345678").await;
        bank.record_verified("66812345678").await;
        shop.clear_all().await;

        assert!(!shop.is_verified("66812345678").await);
        assert!(bank.is_verified("66812345678").await);
        assert_eq!(store.len().unwrap(), 1);
    }
}
