//! OAuth-specific error types.
//!
//! # Error Types
//!
//! - [`OAuthError::InvalidIdentifier`]: the store identifier is malformed
//! - [`OAuthError::MissingConfiguration`]: a required setting is absent
//! - [`OAuthError::TokenExchangeFailed`]: Shopify rejected the code
//! - [`OAuthError::TransportError`]: no response from the token endpoint
//! - [`OAuthError::StateMismatch`]: the callback `state` is not the one we issued
//! - [`OAuthError::InvalidCallback`]: callback parameters are missing or malformed
//! - [`OAuthError::InvalidHmac`]: the callback signature does not verify
//! - [`OAuthError::Storage`]: the credential record could not be persisted
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::auth::oauth::OAuthError;
//!
//! let error = OAuthError::TokenExchangeFailed {
//!     status: 401,
//!     message: "invalid code".to_string(),
//! };
//! assert!(error.to_string().contains("invalid code"));
//! assert!(!error.is_retryable());
//! ```

use crate::auth::store::StoreError;
use thiserror::Error;

/// Errors that can occur during the connect flow.
///
/// Every error is returned to the immediate caller; nothing is retried
/// internally. Presentation code is expected to map each variant to a
/// message for the user.
///
/// # Example
///
/// ```rust
/// use shopify_connect::auth::oauth::OAuthError;
///
/// fn describe(err: &OAuthError) -> &'static str {
///     match err {
///         OAuthError::InvalidIdentifier { .. } => "Check the store name and try again.",
///         OAuthError::MissingConfiguration { .. } => "The app is not configured correctly.",
///         OAuthError::TokenExchangeFailed { .. }
///         | OAuthError::StateMismatch { .. }
///         | OAuthError::InvalidCallback { .. }
///         | OAuthError::InvalidHmac => "Could not connect the store. Please start again.",
///         OAuthError::TransportError { .. } => "Network problem. Please retry.",
///         OAuthError::Storage(_) => "Could not save the connection.",
///     }
/// }
///
/// assert_eq!(describe(&OAuthError::InvalidHmac), "Could not connect the store. Please start again.");
/// ```
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The store identifier does not normalize to `label.myshopify.com`.
    ///
    /// Also raised when the callback names a different store than the one
    /// the flow was started for.
    #[error("Invalid shop identifier '{input}'. Expected format: 'shop-name' or 'shop-name.myshopify.com'.")]
    InvalidIdentifier {
        /// The input that was rejected.
        input: String,
    },

    /// A required configuration value is absent.
    #[error("Missing configuration value '{field}'")]
    MissingConfiguration {
        /// The name of the missing setting.
        field: &'static str,
    },

    /// The token endpoint answered with a non-success status, or with a
    /// success status and an unreadable body.
    ///
    /// Authorization codes are single use, so recovery means restarting the
    /// connect flow rather than retrying the exchange.
    #[error("Token exchange failed with status {status}: {message}")]
    TokenExchangeFailed {
        /// The HTTP status code returned.
        status: u16,
        /// Shopify's `error_description`, or the status text.
        message: String,
    },

    /// The token endpoint could not be reached or did not answer in time.
    #[error("Transport error: {message}")]
    TransportError {
        /// Description of the network failure.
        message: String,
    },

    /// The `state` returned on the callback differs from the one issued.
    ///
    /// This indicates a forged or stale callback. The issued value is kept
    /// for the caller but left out of the message.
    #[error("State parameter mismatch: received '{received}'")]
    StateMismatch {
        /// The state value issued with the authorization request.
        expected: String,
        /// The state value received in the callback.
        received: String,
    },

    /// Callback parameters are missing or malformed.
    #[error("Invalid callback: {reason}")]
    InvalidCallback {
        /// Description of what's invalid about the callback.
        reason: String,
    },

    /// The callback carries an `hmac` that does not match its parameters.
    #[error("HMAC signature validation failed")]
    InvalidHmac,

    /// The credential record could not be written or removed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl OAuthError {
    /// Returns `true` if repeating the same call may succeed.
    ///
    /// Only transport failures qualify; every other error needs corrected
    /// input, corrected configuration, or a fresh connect flow.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TransportError { .. })
    }
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_invalid_identifier_states_expected_format() {
        let error = OAuthError::InvalidIdentifier {
            input: "my store!".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("my store!"));
        assert!(message.contains("shop-name.myshopify.com"));
    }

    #[test]
    fn test_missing_configuration_names_field() {
        let error = OAuthError::MissingConfiguration { field: "client_id" };
        assert!(error.to_string().contains("client_id"));
    }

    #[test]
    fn test_token_exchange_failed_includes_status_and_message() {
        let error = OAuthError::TokenExchangeFailed {
            status: 401,
            message: "invalid code".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("invalid code"));
    }

    #[test]
    fn test_state_mismatch_message_omits_issued_state() {
        let error = OAuthError::StateMismatch {
            expected: "abc123".to_string(),
            received: "xyz789".to_string(),
        };
        let message = error.to_string();
        assert!(!message.contains("abc123"));
        assert!(message.contains("xyz789"));
    }

    #[test]
    fn test_only_transport_errors_are_retryable() {
        assert!(OAuthError::TransportError {
            message: "connection reset".to_string()
        }
        .is_retryable());
        assert!(!OAuthError::InvalidHmac.is_retryable());
        assert!(!OAuthError::MissingConfiguration { field: "scopes" }.is_retryable());
        assert!(!OAuthError::TokenExchangeFailed {
            status: 400,
            message: "bad".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_from_store_error_conversion() {
        let store_error = StoreError::Io {
            path: PathBuf::from("/tmp/shopify_auth.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let oauth_error: OAuthError = store_error.into();
        assert!(matches!(oauth_error, OAuthError::Storage(_)));
        assert!(oauth_error.to_string().contains("shopify_auth.json"));
    }

    #[test]
    fn test_oauth_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OAuthError>();
    }
}
