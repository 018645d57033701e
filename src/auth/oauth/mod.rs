//! OAuth 2.0 authorization-code grant for Shopify stores.
//!
//! The flow has two legs:
//!
//! 1. **Authorization** ([`begin_auth`]): normalize the store identifier,
//!    generate a CSRF [`StateParam`], and build the URL to redirect the user
//!    to.
//! 2. **Exchange** ([`exchange_code_for_token`]): trade the authorization
//!    code from the callback for an access token, either directly with the
//!    store or through a configured proxy.
//!
//! [`crate::auth::ConnectFlow`] composes both legs with callback
//! verification and credential persistence.
//!
//! # Security Features
//!
//! - **CSRF Protection**: the callback `state` must equal the issued one
//! - **HMAC Validation**: callbacks that carry an `hmac` are verified against
//!   the client secret
//! - **Constant-Time Comparison**: state and HMAC comparisons do not leak
//!   timing information
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_connect::auth::oauth::{begin_auth, exchange_code_for_token, CallbackQuery};
//!
//! // Outbound: redirect the user, keep the pending authorization.
//! let result = begin_auth(&config, "example-shop")?;
//! let pending = result.pending();
//!
//! // Inbound: verify the callback and exchange the code.
//! let query = CallbackQuery::parse(request_query_string);
//! if !pending.state.verify(query.state().unwrap_or_default()) {
//!     // reject
//! }
//! let token = exchange_code_for_token(&config, query.code().unwrap(), pending.shop.as_ref()).await?;
//! ```

mod auth_query;
mod begin_auth;
mod error;
pub mod hmac;
mod state;
mod token_exchange;

pub use auth_query::CallbackQuery;
pub use begin_auth::{begin_auth, BeginAuthResult, PendingAuthorization};
pub use error::OAuthError;
pub use hmac::{compute_signature, constant_time_compare, validate_hmac};
pub use state::StateParam;
pub use token_exchange::{exchange_code_for_token, token_endpoint};
