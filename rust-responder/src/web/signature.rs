//! Business Messages webhook signature verification.
//!
//! The platform signs each webhook body with HMAC-SHA512 keyed by the
//! partner key, and sends the base64 digest in the `X-Goog-Signature` header.
//! Reference: https://developers.google.com/business-communications/business-messages/guides/build/receive#verify

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use tracing::warn;

type HmacSha512 = Hmac<Sha512>;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-goog-signature";

/// Compute the base64 HMAC-SHA512 signature of `raw_body`.
pub fn sign_body(raw_body: &[u8], partner_key: &str) -> Result<String, InvalidLength> {
    let mut mac = HmacSha512::new_from_slice(partner_key.as_bytes())?;
    mac.update(raw_body);
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Decide whether a webhook request can be trusted.
///
/// # Arguments
///
/// * `raw_body` - The request body exactly as received
/// * `signature` - The `X-Goog-Signature` header value
/// * `partner_key` - The configured partner key
///
/// # Returns
///
/// `true` when no partner key is configured (verification disabled) or the
/// signature matches, `false` otherwise.
pub fn validate_request(raw_body: &[u8], signature: &str, partner_key: Option<&str>) -> bool {
    let partner_key = match partner_key {
        Some(key) if is_signature_verification_enabled(Some(key)) => key,
        _ => return true,
    };

    let expected_signature = match sign_body(raw_body, partner_key) {
        Ok(s) => s,
        Err(_) => {
            warn!("signature_invalid_key");
            return false;
        }
    };

    // Constant-time comparison to prevent timing attacks
    let valid = constant_time_compare(&expected_signature, signature);

    if !valid {
        warn!(
            expected_length = expected_signature.len(),
            actual_length = signature.len(),
            body_length = raw_body.len(),
            "signature_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Check if signature verification is enabled.
///
/// Only a missing or empty key disables it; any other string, whitespace
/// included, is a valid HMAC key.
pub fn is_signature_verification_enabled(partner_key: Option<&str>) -> bool {
    partner_key.map(|k| !k.is_empty()).unwrap_or(false)
}
