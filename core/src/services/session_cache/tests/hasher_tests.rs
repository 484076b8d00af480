//! Tests for storage key hashing

use crate::services::session_cache::IdentifierHasher;

use super::mocks::{test_config, PEPPER};

#[test]
fn test_storage_key_is_deterministic() {
    let hasher = IdentifierHasher::from_config(&test_config());

    let first = hasher.storage_key_for("66812345678");
    let second = hasher.storage_key_for("66812345678");
    assert_eq!(first, second);
}

#[test]
fn test_storage_key_format() {
    let hasher = IdentifierHasher::from_config(&test_config());
    let key = hasher.storage_key_for("66812345678");

    assert!(key.starts_with("app:verified-session:v1:"));
    let digest = key.trim_start_matches("app:verified-session:v1:");
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_storage_key_does_not_contain_identifier() {
    let hasher = IdentifierHasher::from_config(&test_config());
    let key = hasher.storage_key_for("66812345678");

    assert!(!key.contains("66812345678"));
    assert!(!key.contains("12345678"));
}

#[test]
fn test_distinct_identifiers_get_distinct_keys() {
    let hasher = IdentifierHasher::from_config(&test_config());

    assert_ne!(
        hasher.storage_key_for("66812345678"),
        hasher.storage_key_for("66812345679")
    );
}

#[test]
fn test_pepper_changes_key() {
    let a = IdentifierHasher::new(PEPPER.as_bytes(), "p:");
    let b = IdentifierHasher::new(b"another-pepper", "p:");

    assert_ne!(a.hash("66812345678"), b.hash("66812345678"));
}

#[test]
fn test_pepper_and_identifier_boundary_is_unambiguous() {
    // same concatenation, different split
    let a = IdentifierHasher::new(b"pepper1", "p:");
    let b = IdentifierHasher::new(b"pepper", "p:");

    assert_ne!(a.hash("2345"), b.hash("12345"));
}

#[test]
fn test_key_prefix_follows_config() {
    let config = test_config().with_names("shop", "otp-cache");
    let hasher = IdentifierHasher::from_config(&config);

    assert_eq!(hasher.key_prefix(), "shop:otp-cache:v1:");
    assert!(hasher.storage_key_for("66812345678").starts_with("shop:otp-cache:v1:"));
}

#[test]
fn test_debug_hides_pepper() {
    let hasher = IdentifierHasher::from_config(&test_config());
    let rendered = format!("{:?}", hasher);

    assert!(!rendered.contains(PEPPER));
    assert!(rendered.contains("key_prefix"));
}
