//! Credential generation for partner API keys.

use base64::{Engine as _, engine::general_purpose};
use rand::{Rng, thread_rng};

/// Generate a new opaque partner API key.
///
/// Produces a `pk-` prefixed token carrying 256 bits of cryptographically
/// secure randomness, base64url-encoded without padding.
///
/// # Example
///
/// ```
/// use insightd::crypto::generate_api_key;
///
/// let api_key = generate_api_key();
/// assert!(api_key.starts_with("pk-"));
/// assert_eq!(api_key.len(), 46); // "pk-" + 43 base64url chars
/// ```
pub fn generate_api_key() -> String {
    let mut key_bytes = [0u8; 32];
    thread_rng().fill(&mut key_bytes);

    format!("pk-{}", general_purpose::URL_SAFE_NO_PAD.encode(key_bytes))
}
