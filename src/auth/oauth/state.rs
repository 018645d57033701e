//! State parameter handling for OAuth CSRF protection.
//!
//! A [`StateParam`] is generated for every authorization request, sent to
//! Shopify in the `state` query parameter, and compared against the value
//! Shopify echoes back on the callback.
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::auth::oauth::StateParam;
//!
//! let state = StateParam::new();
//! assert_eq!(state.as_ref().len(), 43);
//! assert!(state.verify(state.as_ref()));
//! assert!(!state.verify("forged"));
//! ```

use crate::auth::oauth::hmac::constant_time_compare;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// OAuth state parameter for CSRF protection.
///
/// Generated values encode 32 bytes from a cryptographically secure RNG as
/// unpadded URL-safe base64, so they need no further escaping in a URL.
///
/// `StateParam` serializes as a plain string, so it can be kept in a cookie
/// or session store across the redirect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateParam(String);

// Verify StateParam is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StateParam>();
};

impl StateParam {
    /// Number of random bytes behind each generated state.
    const ENTROPY_BYTES: usize = 32;

    /// Creates a new state parameter from a secure random source.
    #[must_use]
    pub fn new() -> Self {
        let mut bytes = [0u8; Self::ENTROPY_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Wraps a previously issued state value, e.g. one read back from a cookie.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns `true` if `received` equals this state.
    ///
    /// An empty value on either side never verifies. The comparison runs in
    /// constant time.
    #[must_use]
    pub fn verify(&self, received: &str) -> bool {
        if self.0.is_empty() || received.is_empty() {
            return false;
        }
        constant_time_compare(&self.0, received)
    }
}

impl Default for StateParam {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StateParam {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
