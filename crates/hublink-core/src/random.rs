// Nonce generation for the OAuth state token.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;

/// Entropy carried by a nonce, in bytes.
pub const NONCE_BYTES: usize = 32;

/// Generate a URL-safe nonce with `NONCE_BYTES` bytes of entropy.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
