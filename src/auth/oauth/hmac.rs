//! HMAC validation for Shopify OAuth callbacks.
//!
//! When Shopify redirects back to the app it signs the callback parameters
//! with the app's client secret. The signature covers every parameter except
//! `hmac` itself, sorted by name and joined as `key=value` pairs with `&`.
//!
//! All comparisons run in constant time.
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::auth::oauth::hmac::compute_signature;
//!
//! let sig = compute_signature("code=abc&shop=demo.myshopify.com", "secret-key");
//! assert_eq!(sig.len(), 64);
//! ```

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::auth::oauth::CallbackQuery;
use crate::config::ApiSecretKey;

type HmacSha256 = Hmac<Sha256>;

/// Computes a lowercase hex HMAC-SHA256 signature of `message`.
#[must_use]
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
pub fn compute_signature(message: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex_encode(&mac.finalize().into_bytes())
}

/// Performs constant-time comparison of two strings.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Validates the `hmac` parameter of an OAuth callback.
///
/// Returns `false` when the callback carries no `hmac` at all.
#[must_use]
pub fn validate_hmac(query: &CallbackQuery, secret: &ApiSecretKey) -> bool {
    let Some(received) = query.hmac() else {
        return false;
    };

    let computed = compute_signature(&query.to_signable_string(), secret.as_ref());
    constant_time_compare(&computed, &received.to_ascii_lowercase())
}

fn hex_encode(bytes: &[u8]) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(char::from(HEX_CHARS[usize::from(byte >> 4)]));
        out.push(char::from(HEX_CHARS[usize::from(byte & 0x0f)]));
    }
    out
}
