//! Error types for configuration and validation.
//!
//! Configuration constructors return `Result<T, ConfigError>` so invalid
//! values are rejected as soon as they are built. Errors raised by the
//! connect flow itself live in [`crate::auth::oauth::OAuthError`].
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while building or validating configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key (client id) cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Shopify API key.")]
    EmptyApiKey,

    /// API secret key (client secret) cannot be empty.
    #[error("API secret key cannot be empty. Please provide a valid Shopify API secret key.")]
    EmptyApiSecretKey,

    /// Shop domain does not normalize to a canonical store identifier.
    #[error("Invalid shop domain '{domain}'. Expected format: 'shop-name' or 'shop-name.myshopify.com'.")]
    InvalidShopDomain {
        /// The input that was rejected.
        domain: String,
    },

    /// Scopes are invalid.
    #[error("Invalid scopes: {reason}")]
    InvalidScopes {
        /// The reason the scopes are invalid.
        reason: String,
    },

    /// A required field is missing.
    #[error("Missing required field '{field}'. This field must be set before starting the connect flow.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A URL (redirect URI or proxy base) is invalid.
    #[error("Invalid URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://myapp.example.com').")]
    InvalidHostUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A duration setting could not be parsed.
    #[error("Invalid value '{value}' for {field}: expected a whole number of seconds.")]
    InvalidDuration {
        /// The setting being parsed.
        field: &'static str,
        /// The value that was rejected.
        value: String,
    },
}
