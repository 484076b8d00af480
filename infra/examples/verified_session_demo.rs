//! Example demonstrating the verified-session cache in front of an OTP flow
//!
//! Run with an in-memory store:
//! ```text
//! SESSION_CACHE_PEPPER=demo-pepper cargo run -p vsc_infra --example verified_session_demo
//! ```
//! Set `SESSION_STORE=redis` and `REDIS_URL` to persist sessions in Redis.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use vsc_core::services::session_cache::VerifiedSessionCache;
use vsc_core::services::verification::{
    ChallengeExchange, ChallengeOutcome, ConfirmOutcome, VerificationGate,
};

/// Prints codes instead of sending SMS
struct ConsoleExchange {
    codes: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl ChallengeExchange for ConsoleExchange {
    async fn send_challenge(&self, identifier: &str) -> Result<String, String> {
        let code = "246810".to_string();
        println!("  [sms] code {} sent to {}", code, identifier);
        self.codes
            .lock()
            .map_err(|e| e.to_string())?
            .insert(identifier.to_string(), code);
        Ok(format!("console-{}", identifier.len()))
    }

    async fn verify_challenge(&self, identifier: &str, code: &str) -> Result<bool, String> {
        let mut codes = self.codes.lock().map_err(|e| e.to_string())?;
        Ok(codes.remove(identifier).is_some_and(|expected| expected == code))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let services = vsc_infra::initialize().await?;

    println!("Verified Session Cache Demo");
    println!("===========================\n");

    let exchange = Arc::new(ConsoleExchange {
        codes: Mutex::new(HashMap::new()),
    });
    let gate = VerificationGate::new(exchange, services.session_cache.clone());
    let phone = "+66 81 234 5678";

    // 1. First login: challenge required
    println!("1. First request for {}", phone);
    match gate.begin(phone).await? {
        ChallengeOutcome::ChallengeSent { message_id } => println!("  challenge sent ({})", message_id),
        ChallengeOutcome::AlreadyVerified(session) => {
            println!("  already verified until {}", session.expires_at)
        }
    }

    // 2. Answer the challenge
    println!("\n2. Confirming code");
    match gate.confirm(phone, "246810").await? {
        ConfirmOutcome::Verified { cached: true } => println!("  verified and remembered"),
        ConfirmOutcome::Verified { cached: false } => {
            println!("  verified, but the cache is disabled (is SESSION_CACHE_PEPPER set?)")
        }
        ConfirmOutcome::Rejected => println!("  code rejected"),
    }

    // 3. Second login: served from the cache
    println!("\n3. Second request for {}", phone);
    match gate.begin(phone).await? {
        ChallengeOutcome::AlreadyVerified(session) => println!(
            "  skipped challenge, verified at {}, valid until {}",
            session.verified_at, session.expires_at
        ),
        ChallengeOutcome::ChallengeSent { .. } => println!("  challenge sent again"),
    }

    // 4. Logout
    println!("\n4. Forgetting {}", phone);
    gate.forget(phone).await;
    println!(
        "  still verified: {}",
        services.session_cache.is_verified("+66812345678").await
    );

    Ok(())
}
