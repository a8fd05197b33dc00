use base64::Engine;
use rand::RngCore;

/// Generate a statistically-unique opaque session token.
///
/// 256 random bits encoded as base64url without padding (43 characters).
/// Collisions are treated as negligible, not formally excluded.
pub(crate) fn generate() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
