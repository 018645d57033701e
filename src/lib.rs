//! # Shopify Connect
//!
//! Link a Shopify store to your application with the OAuth 2.0
//! authorization-code grant, then keep the resulting credential on disk and
//! check whether it is still fresh.
//!
//! ## Overview
//!
//! This crate provides:
//! - Normalization of user-entered store names via [`ShopDomain`]
//! - CSRF-protected authorization URLs via [`auth::oauth::begin_auth`]
//! - Code-for-token exchange, direct or through a proxy, via
//!   [`auth::oauth::exchange_code_for_token`]
//! - A single persisted [`CredentialRecord`] behind the [`SessionStore`] trait
//! - [`ConnectFlow`], which composes the above into three entry points:
//!   start, complete, and check/clear
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_connect::{ApiKey, ApiSecretKey, ConnectConfig, ConnectFlow, HostUrl, MemorySessionStore};
//!
//! let config = ConnectConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .api_secret_key(ApiSecretKey::new("your-api-secret").unwrap())
//!     .scopes("read_products,write_orders".parse().unwrap())
//!     .redirect_uri(HostUrl::new("https://your-app.com/auth/callback").unwrap())
//!     .build();
//!
//! let flow = ConnectFlow::new(config, MemorySessionStore::new());
//!
//! let started = flow.start("https://My-Store.myshopify.com/").unwrap();
//! assert!(started.auth_url.starts_with("https://my-store.myshopify.com/admin/oauth/authorize?"));
//! ```
//!
//! ## Completing the Flow
//!
//! ```rust,ignore
//! use shopify_connect::auth::oauth::CallbackQuery;
//!
//! // In the redirect handler, with the pending authorization kept from `start`
//! let record = flow.complete(&CallbackQuery::parse(query_string), &pending).await?;
//! println!("Connected {}", record.shop);
//!
//! // Later
//! if !flow.is_valid() {
//!     // Ask the user to connect again
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration and storage are passed explicitly
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Secrets stay masked**: `Debug` output never includes the client secret
//!   or the access token
//! - **Async-first**: the token exchange is the only suspension point

pub mod auth;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use auth::{
    AccessTokenResponse, AuthScopes, ConnectFlow, CredentialRecord, FileSessionStore,
    MemorySessionStore, SessionStore, StoreError,
};
pub use config::{ApiKey, ApiSecretKey, ConnectConfig, ConnectConfigBuilder, HostUrl, ShopDomain};
pub use error::ConfigError;

// Re-export OAuth types for convenience
pub use auth::oauth::{
    begin_auth, exchange_code_for_token, BeginAuthResult, CallbackQuery, OAuthError,
    PendingAuthorization, StateParam,
};
