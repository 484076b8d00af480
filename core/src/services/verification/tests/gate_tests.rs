//! Unit tests for the verification gate

use std::sync::Arc;

use vsc_shared::config::{SessionCacheConfig, MIN_KDF_ITERATIONS};

use crate::errors::DomainError;
use crate::repositories::InMemoryPersistence;
use crate::services::session_cache::{
    EncryptedSessionCache, NoopSessionCache, VerifiedSessionCache,
};
use crate::services::verification::{ChallengeOutcome, ConfirmOutcome, VerificationGate};

use super::mocks::MockChallengeExchange;

fn session_cache() -> Arc<dyn VerifiedSessionCache> {
    let config = SessionCacheConfig::new("gate-test-pepper").with_kdf_iterations(MIN_KDF_ITERATIONS);
    Arc::new(EncryptedSessionCache::with_defaults(
        Arc::new(InMemoryPersistence::new()),
        &config,
    ))
}

fn gate(exchange: Arc<MockChallengeExchange>) -> VerificationGate<MockChallengeExchange> {
    VerificationGate::new(exchange, session_cache())
}

#[tokio::test]
async fn test_first_request_sends_challenge() {
    let exchange = Arc::new(MockChallengeExchange::new(false));
    let gate = gate(exchange.clone());

    let outcome = gate.begin("66812345678").await.unwrap();
    assert_eq!(
        outcome,
        ChallengeOutcome::ChallengeSent {
            message_id: "mock-msg-1".to_string()
        }
    );
    assert_eq!(exchange.sent_count(), 1);
}

#[tokio::test]
async fn test_confirmed_identifier_skips_next_challenge() {
    let exchange = Arc::new(MockChallengeExchange::new(false));
    let gate = gate(exchange.clone());

    gate.begin("66812345678").await.unwrap();
    let confirmed = gate
        .confirm("66812345678", MockChallengeExchange::CODE)
        .await
        .unwrap();
    assert_eq!(confirmed, ConfirmOutcome::Verified { cached: true });

    match gate.begin("66812345678").await.unwrap() {
        ChallengeOutcome::AlreadyVerified(session) => {
            assert_eq!(session.identifier, "66812345678");
        }
        other => panic!("Expected cached session, got {:?}", other),
    }
    assert_eq!(exchange.sent_count(), 1);
}

#[tokio::test]
async fn test_formatting_variants_share_a_session() {
    let exchange = Arc::new(MockChallengeExchange::new(false));
    let gate = gate(exchange.clone());

    gate.begin("+66 81-234-5678").await.unwrap();
    assert_eq!(exchange.last_sent_to(), Some("+66812345678".to_string()));
    gate.confirm("+66812345678", MockChallengeExchange::CODE)
        .await
        .unwrap();

    assert!(matches!(
        gate.begin(" +66 (81) 234 5678 ").await.unwrap(),
        ChallengeOutcome::AlreadyVerified(_)
    ));
}

#[tokio::test]
async fn test_wrong_code_is_rejected_and_not_cached() {
    let exchange = Arc::new(MockChallengeExchange::new(false));
    let gate = gate(exchange.clone());

    gate.begin("66812345678").await.unwrap();
    assert_eq!(
        gate.confirm("66812345678", "000000").await.unwrap(),
        ConfirmOutcome::Rejected
    );
    assert_eq!(
        gate.confirm("66812345678", "   ").await.unwrap(),
        ConfirmOutcome::Rejected
    );

    assert!(matches!(
        gate.begin("66812345678").await.unwrap(),
        ChallengeOutcome::ChallengeSent { .. }
    ));
    assert_eq!(exchange.sent_count(), 2);
}

#[tokio::test]
async fn test_forget_requires_new_challenge() {
    let exchange = Arc::new(MockChallengeExchange::new(false));
    let gate = gate(exchange.clone());

    gate.begin("66812345678").await.unwrap();
    gate.confirm("66812345678", MockChallengeExchange::CODE)
        .await
        .unwrap();

    gate.forget("668 1234 5678").await;

    assert!(matches!(
        gate.begin("66812345678").await.unwrap(),
        ChallengeOutcome::ChallengeSent { .. }
    ));
}

#[tokio::test]
async fn test_invalid_identifier() {
    let exchange = Arc::new(MockChallengeExchange::new(false));
    let gate = gate(exchange.clone());

    match gate.begin("12345").await.unwrap_err() {
        DomainError::Validation { message } => {
            assert!(message.contains("Invalid phone number format"));
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
    assert!(gate.confirm("not a phone", "482913").await.is_err());
    assert_eq!(exchange.sent_count(), 0);
}

#[tokio::test]
async fn test_exchange_failure_is_internal_error() {
    let exchange = Arc::new(MockChallengeExchange::new(true));
    let gate = gate(exchange);

    assert!(matches!(
        gate.begin("66812345678").await,
        Err(DomainError::Internal { .. })
    ));
    assert!(matches!(
        gate.confirm("66812345678", "482913").await,
        Err(DomainError::Internal { .. })
    ));
}

#[tokio::test]
async fn test_disabled_cache_still_verifies() {
    let exchange = Arc::new(MockChallengeExchange::new(false));
    let gate = VerificationGate::new(
        exchange.clone(),
        Arc::new(NoopSessionCache::new("pepper unavailable")),
    );

    gate.begin("66812345678").await.unwrap();
    assert_eq!(
        gate.confirm("66812345678", MockChallengeExchange::CODE)
            .await
            .unwrap(),
        ConfirmOutcome::Verified { cached: false }
    );

    // nothing was remembered, so the next request is challenged again
    assert!(matches!(
        gate.begin("66812345678").await.unwrap(),
        ChallengeOutcome::ChallengeSent { .. }
    ));
    assert_eq!(exchange.sent_count(), 2);
}
