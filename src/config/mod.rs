//! Configuration types for the connect flow.
//!
//! # Overview
//!
//! - [`ConnectConfig`]: static settings for the OAuth flow
//! - [`ConnectConfigBuilder`]: a builder for [`ConnectConfig`]
//! - [`ApiKey`], [`ApiSecretKey`]: validated OAuth client credentials
//! - [`ShopDomain`]: the canonical store identifier
//! - [`HostUrl`]: a validated absolute URL (redirect URI, proxy base)
//!
//! Every field of [`ConnectConfig`] is optional at build time. A missing
//! client id, secret, scope list or redirect URI is a deployment error that
//! [`ConnectConfig::validate`] reports up front, and that the flow operations
//! still reject individually with
//! [`OAuthError::MissingConfiguration`](crate::auth::oauth::OAuthError::MissingConfiguration).
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::{ApiKey, ApiSecretKey, ConnectConfig, HostUrl};
//!
//! let config = ConnectConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("my-secret").unwrap())
//!     .scopes("read_products,write_orders".parse().unwrap())
//!     .redirect_uri(HostUrl::new("https://myapp.example.com/auth/callback").unwrap())
//!     .build();
//!
//! assert!(config.validate().is_ok());
//! assert!(config.proxy_base_url().is_none());
//! ```

mod newtypes;

pub use newtypes::{ApiKey, ApiSecretKey, HostUrl, ShopDomain};

use crate::auth::AuthScopes;
use crate::error::ConfigError;
use std::env;
use std::time::Duration;

/// Environment variable holding the OAuth client id.
pub const ENV_CLIENT_ID: &str = "SHOPIFY_CLIENT_ID";
/// Environment variable holding the OAuth client secret.
pub const ENV_CLIENT_SECRET: &str = "SHOPIFY_CLIENT_SECRET";
/// Environment variable holding the comma-separated scope list.
pub const ENV_SCOPES: &str = "SHOPIFY_SCOPES";
/// Environment variable holding the OAuth redirect URI.
pub const ENV_REDIRECT_URI: &str = "SHOPIFY_REDIRECT_URI";
/// Environment variable holding the optional token-exchange proxy base URL.
pub const ENV_PROXY_URL: &str = "SHOPIFY_API_PROXY_URL";
/// Environment variable holding the request timeout in seconds.
pub const ENV_REQUEST_TIMEOUT: &str = "SHOPIFY_REQUEST_TIMEOUT_SECS";

/// Static configuration for the connect flow.
///
/// `ConnectConfig` is `Clone`, `Send`, and `Sync`, and holds no global state;
/// pass it explicitly to the flow operations.
///
/// # Proxy
///
/// When `proxy_base_url` is set, the token exchange is sent to
/// `<proxy_base_url>/access_token` instead of the store's own endpoint. This
/// keeps the client secret off the public internet in deployments where the
/// caller runs next to an untrusted client.
#[derive(Clone, Debug)]
pub struct ConnectConfig {
    api_key: Option<ApiKey>,
    api_secret_key: Option<ApiSecretKey>,
    scopes: AuthScopes,
    redirect_uri: Option<HostUrl>,
    proxy_base_url: Option<HostUrl>,
    request_timeout: Duration,
}

impl ConnectConfig {
    /// Timeout applied to the token exchange request when none is configured.
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a new builder for constructing a `ConnectConfig`.
    #[must_use]
    pub fn builder() -> ConnectConfigBuilder {
        ConnectConfigBuilder::new()
    }

    /// Reads the configuration from `SHOPIFY_*` environment variables.
    ///
    /// Unset or blank variables leave the corresponding field absent; use
    /// [`validate`](Self::validate) to check that the required ones are there.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut builder = ConnectConfigBuilder::new();

        if let Some(value) = var(ENV_CLIENT_ID) {
            builder = builder.api_key(ApiKey::new(value)?);
        }
        if let Some(value) = var(ENV_CLIENT_SECRET) {
            builder = builder.api_secret_key(ApiSecretKey::new(value)?);
        }
        if let Some(value) = var(ENV_SCOPES) {
            builder = builder.scopes(value.parse()?);
        }
        if let Some(value) = var(ENV_REDIRECT_URI) {
            builder = builder.redirect_uri(HostUrl::new(value)?);
        }
        if let Some(value) = var(ENV_PROXY_URL) {
            builder = builder.proxy_base_url(HostUrl::new(value)?);
        }
        if let Some(value) = var(ENV_REQUEST_TIMEOUT) {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidDuration {
                    field: ENV_REQUEST_TIMEOUT,
                    value: value.clone(),
                })?;
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        Ok(builder.build())
    }

    /// Checks that every field required by the connect flow is present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] naming the first missing
    /// field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_none() {
            return Err(ConfigError::MissingRequiredField { field: "client_id" });
        }
        if self.api_secret_key.is_none() {
            return Err(ConfigError::MissingRequiredField {
                field: "client_secret",
            });
        }
        if self.scopes.is_empty() {
            return Err(ConfigError::MissingRequiredField { field: "scopes" });
        }
        if self.redirect_uri.is_none() {
            return Err(ConfigError::MissingRequiredField {
                field: "redirect_uri",
            });
        }
        Ok(())
    }

    /// Returns the API key (client id), if configured.
    #[must_use]
    pub const fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// Returns the API secret key (client secret), if configured.
    #[must_use]
    pub const fn api_secret_key(&self) -> Option<&ApiSecretKey> {
        self.api_secret_key.as_ref()
    }

    /// Returns the requested OAuth scopes.
    #[must_use]
    pub const fn scopes(&self) -> &AuthScopes {
        &self.scopes
    }

    /// Returns the redirect URI, if configured.
    #[must_use]
    pub const fn redirect_uri(&self) -> Option<&HostUrl> {
        self.redirect_uri.as_ref()
    }

    /// Returns the token-exchange proxy base URL, if configured.
    #[must_use]
    pub const fn proxy_base_url(&self) -> Option<&HostUrl> {
        self.proxy_base_url.as_ref()
    }

    /// Returns the timeout applied to the token exchange request.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

// Verify ConnectConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConnectConfig>();
};

/// Builder for constructing [`ConnectConfig`] instances.
///
/// # Defaults
///
/// - `scopes`: empty
/// - `proxy_base_url`: `None` (exchange directly with the store)
/// - `request_timeout`: [`ConnectConfig::DEFAULT_REQUEST_TIMEOUT`]
/// - everything else: `None`
#[derive(Debug, Default)]
pub struct ConnectConfigBuilder {
    api_key: Option<ApiKey>,
    api_secret_key: Option<ApiSecretKey>,
    scopes: Option<AuthScopes>,
    redirect_uri: Option<HostUrl>,
    proxy_base_url: Option<HostUrl>,
    request_timeout: Option<Duration>,
}

impl ConnectConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (client id).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API secret key (client secret).
    #[must_use]
    pub fn api_secret_key(mut self, key: ApiSecretKey) -> Self {
        self.api_secret_key = Some(key);
        self
    }

    /// Sets the OAuth scopes to request.
    #[must_use]
    pub fn scopes(mut self, scopes: AuthScopes) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Sets the redirect URI Shopify sends the user back to.
    #[must_use]
    pub fn redirect_uri(mut self, uri: HostUrl) -> Self {
        self.redirect_uri = Some(uri);
        self
    }

    /// Routes the token exchange through a proxy at this base URL.
    #[must_use]
    pub fn proxy_base_url(mut self, url: HostUrl) -> Self {
        self.proxy_base_url = Some(url);
        self
    }

    /// Sets the timeout for the token exchange request.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the [`ConnectConfig`].
    ///
    /// Missing fields are not an error here; see [`ConnectConfig::validate`].
    #[must_use]
    pub fn build(self) -> ConnectConfig {
        ConnectConfig {
            api_key: self.api_key,
            api_secret_key: self.api_secret_key,
            scopes: self.scopes.unwrap_or_default(),
            redirect_uri: self.redirect_uri,
            proxy_base_url: self.proxy_base_url,
            request_timeout: self
                .request_timeout
                .unwrap_or(ConnectConfig::DEFAULT_REQUEST_TIMEOUT),
        }
    }
}
