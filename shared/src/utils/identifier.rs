//! Identifier utilities
//!
//! Identifiers are phone numbers in practice. They are normalized before
//! hashing so that "+66 81-234-5678" and "+66812345678" share a cache entry,
//! and masked before they reach any log line.

use once_cell::sync::Lazy;
use regex::Regex;

// International phone number (E.164)
static E164_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9]\d{6,14}$").unwrap());

// National/significant number without the leading plus
static NATIONAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{7,15}$").unwrap());

/// Normalize an identifier by removing common formatting characters.
///
/// Digits are kept; a plus sign is kept only in leading position.
pub fn normalize_identifier(identifier: &str) -> String {
    let trimmed = identifier.trim();
    let mut normalized = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        if c.is_ascii_digit() || (c == '+' && normalized.is_empty()) {
            normalized.push(c);
        }
    }
    normalized
}

/// Check whether an identifier is a plausible phone number
/// (E.164 with a leading plus, or 7-15 bare digits).
pub fn is_valid_phone(identifier: &str) -> bool {
    let normalized = normalize_identifier(identifier);
    E164_REGEX.is_match(&normalized) || NATIONAL_REGEX.is_match(&normalized)
}

/// Mask an identifier for logging (e.g. 668****5678)
pub fn mask_identifier(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    if chars.len() >= 8 {
        let head: String = chars[..3].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}****{}", head, tail)
    } else {
        "****".to_string()
    }
}
