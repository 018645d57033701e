//! Authorization code exchange.
//!
//! [`exchange_code_for_token`] is the inbound leg of the connect flow: it
//! trades the single-use authorization code from the callback for an access
//! token.
//!
//! # Endpoint
//!
//! The request goes to `https://<shop>/admin/oauth/access_token`, unless the
//! configuration names a proxy, in which case it goes to
//! `<proxy_base_url>/access_token`. The body is the same in both cases:
//!
//! ```json
//! {"client_id": "...", "client_secret": "...", "code": "...", "shop": "demo.myshopify.com"}
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_connect::auth::oauth::exchange_code_for_token;
//!
//! let token = exchange_code_for_token(&config, "code-from-callback", "demo.myshopify.com").await?;
//! println!("Granted scopes: {}", token.scope);
//! ```

use crate::auth::oauth::error::OAuthError;
use crate::auth::session::AccessTokenResponse;
use crate::config::{ConnectConfig, ShopDomain};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Request body for the token exchange.
#[derive(Serialize)]
struct AccessTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    shop: &'a str,
}

/// Error body Shopify returns on a rejected exchange.
#[derive(Deserialize)]
struct TokenErrorResponse {
    error_description: Option<String>,
}

/// Returns the URL the token exchange for `shop` is sent to.
///
/// # Example
///
/// ```rust
/// use shopify_connect::{ConnectConfig, HostUrl, ShopDomain};
/// use shopify_connect::auth::oauth::token_endpoint;
///
/// let shop = ShopDomain::new("demo").unwrap();
///
/// let direct = ConnectConfig::builder().build();
/// assert_eq!(
///     token_endpoint(&direct, &shop),
///     "https://demo.myshopify.com/admin/oauth/access_token"
/// );
///
/// let proxied = ConnectConfig::builder()
///     .proxy_base_url(HostUrl::new("http://localhost:8080/proxy").unwrap())
///     .build();
/// assert_eq!(token_endpoint(&proxied, &shop), "http://localhost:8080/proxy/access_token");
/// ```
#[must_use]
pub fn token_endpoint(config: &ConnectConfig, shop: &ShopDomain) -> String {
    config.proxy_base_url().map_or_else(
        || format!("https://{}/admin/oauth/access_token", shop.as_ref()),
        |proxy| proxy.join("access_token"),
    )
}

/// Exchanges an authorization code for an access token.
///
/// The shop identifier goes through the same normalization as
/// [`ShopDomain::new`]. The call suspends until the endpoint answers or the
/// configured request timeout elapses. Nothing is persisted and nothing is
/// retried.
///
/// # Errors
///
/// - [`OAuthError::InvalidCallback`]: `code` is empty
/// - [`OAuthError::InvalidIdentifier`]: `raw_shop` does not normalize
/// - [`OAuthError::MissingConfiguration`]: client id or secret is absent
/// - [`OAuthError::TransportError`]: no response was received
/// - [`OAuthError::TokenExchangeFailed`]: non-success status, or a success
///   status with a body that is not a token response or carries an empty
///   access token
pub async fn exchange_code_for_token(
    config: &ConnectConfig,
    code: &str,
    raw_shop: &str,
) -> Result<AccessTokenResponse, OAuthError> {
    if code.trim().is_empty() {
        return Err(OAuthError::InvalidCallback {
            reason: "Authorization code is missing".to_string(),
        });
    }

    let shop = ShopDomain::new(raw_shop).map_err(|_| OAuthError::InvalidIdentifier {
        input: raw_shop.to_string(),
    })?;

    let client_id = config
        .api_key()
        .ok_or(OAuthError::MissingConfiguration { field: "client_id" })?;
    let client_secret = config
        .api_secret_key()
        .ok_or(OAuthError::MissingConfiguration {
            field: "client_secret",
        })?;

    let request_body = AccessTokenRequest {
        client_id: client_id.as_ref(),
        client_secret: client_secret.as_ref(),
        code,
        shop: shop.as_ref(),
    };

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .map_err(|e| OAuthError::TransportError {
            message: format!("Failed to build HTTP client: {e}"),
        })?;

    let request = build_request(&client, config, &shop, &request_body).map_err(|e| {
        OAuthError::TransportError {
            message: format!("Failed to build token request: {e}"),
        }
    })?;
    tracing::debug!("Exchanging authorization code for {} via {}", shop, request.url());

    let response = client
        .execute(request)
        .await
        .map_err(|e| OAuthError::TransportError {
            message: format!("Network error: {e}"),
        })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| OAuthError::TransportError {
            message: format!("Failed to read token response: {e}"),
        })?;

    if !status.is_success() {
        let message = error_message(status, &body);
        tracing::warn!(
            "Token exchange for {} failed with status {}: {}",
            shop,
            status.as_u16(),
            message
        );
        return Err(OAuthError::TokenExchangeFailed {
            status: status.as_u16(),
            message,
        });
    }

    let malformed = || OAuthError::TokenExchangeFailed {
        status: status.as_u16(),
        message: "Received a malformed token response".to_string(),
    };

    let token = serde_json::from_str::<AccessTokenResponse>(&body).map_err(|e| {
        tracing::warn!("Token exchange for {} returned an unreadable body: {e}", shop);
        malformed()
    })?;

    if token.access_token.trim().is_empty() {
        tracing::warn!("Token exchange for {} returned an empty access token", shop);
        return Err(malformed());
    }

    Ok(token)
}

fn build_request(
    client: &reqwest::Client,
    config: &ConnectConfig,
    shop: &ShopDomain,
    body: &AccessTokenRequest<'_>,
) -> reqwest::Result<reqwest::Request> {
    client
        .post(token_endpoint(config, shop))
        .json(body)
        .build()
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<TokenErrorResponse>(body)
        .ok()
        .and_then(|error| error.error_description)
        .filter(|description| !description.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}
