//! OAuth authorization URL generation.
//!
//! [`begin_auth`] is the outbound leg of the connect flow. It normalizes the
//! store identifier the user typed, generates a fresh CSRF state, and builds
//! the URL to send the user to.
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::{ApiKey, ConnectConfig, HostUrl};
//! use shopify_connect::auth::oauth::begin_auth;
//!
//! let config = ConnectConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .scopes("read_products,write_orders".parse().unwrap())
//!     .redirect_uri(HostUrl::new("https://your-app.com/auth/callback").unwrap())
//!     .build();
//!
//! let result = begin_auth(&config, "Example-Shop").unwrap();
//! assert!(result
//!     .auth_url
//!     .starts_with("https://example-shop.myshopify.com/admin/oauth/authorize?"));
//!
//! // Keep `result.pending()` until the callback arrives.
//! let pending = result.pending();
//! assert_eq!(pending.shop.as_ref(), "example-shop.myshopify.com");
//! ```

use crate::auth::oauth::error::OAuthError;
use crate::auth::oauth::state::StateParam;
use crate::config::{ConnectConfig, ShopDomain};
use serde::{Deserialize, Serialize};

/// Result of starting the connect flow.
///
/// The caller redirects the user to `auth_url` and keeps the
/// [`PendingAuthorization`] from [`pending`](Self::pending) until the
/// callback arrives, typically in a short-lived, single-use session entry.
#[derive(Clone, Debug)]
pub struct BeginAuthResult {
    /// The full authorization URL to redirect the user to.
    pub auth_url: String,

    /// The state parameter embedded in `auth_url`.
    pub state: StateParam,

    /// The canonical store identifier the flow targets.
    pub shop: ShopDomain,
}

impl BeginAuthResult {
    /// Returns what must be retained across the redirect.
    #[must_use]
    pub fn pending(&self) -> PendingAuthorization {
        PendingAuthorization {
            state: self.state.clone(),
            shop: self.shop.clone(),
        }
    }
}

/// What the caller keeps between the redirect and the callback.
///
/// Serializable so it can live in a cookie or server-side session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAuthorization {
    /// The state issued with the authorization request.
    pub state: StateParam,

    /// The store the authorization request was sent to.
    pub shop: ShopDomain,
}

/// Builds the authorization URL for a user-entered store identifier.
///
/// The URL points at `https://<shop>/admin/oauth/authorize` and carries
/// `client_id`, `scope`, `redirect_uri`, `state` and `shop` as
/// percent-encoded query parameters. A new state is generated on every call.
///
/// # Errors
///
/// - [`OAuthError::InvalidIdentifier`] if `raw_shop` does not normalize
/// - [`OAuthError::MissingConfiguration`] if the client id, scopes or
///   redirect URI are not configured
pub fn begin_auth(config: &ConnectConfig, raw_shop: &str) -> Result<BeginAuthResult, OAuthError> {
    let shop = ShopDomain::new(raw_shop).map_err(|_| OAuthError::InvalidIdentifier {
        input: raw_shop.to_string(),
    })?;

    let client_id = config
        .api_key()
        .ok_or(OAuthError::MissingConfiguration { field: "client_id" })?;
    if config.scopes().is_empty() {
        return Err(OAuthError::MissingConfiguration { field: "scopes" });
    }
    let redirect_uri = config
        .redirect_uri()
        .ok_or(OAuthError::MissingConfiguration {
            field: "redirect_uri",
        })?;

    let state = StateParam::new();

    let params = [
        ("client_id", client_id.as_ref().to_string()),
        ("scope", config.scopes().to_string()),
        ("redirect_uri", redirect_uri.as_ref().to_string()),
        ("state", state.to_string()),
        ("shop", shop.as_ref().to_string()),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let auth_url = format!(
        "https://{}/admin/oauth/authorize?{}",
        shop.as_ref(),
        query_string
    );

    tracing::debug!("Built authorization URL for {}", shop);

    Ok(BeginAuthResult {
        auth_url,
        state,
        shop,
    })
}

// Verify BeginAuthResult is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BeginAuthResult>();
    assert_send_sync::<PendingAuthorization>();
};
