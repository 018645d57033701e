//! Authentication types for connecting a Shopify store.
//!
//! # Overview
//!
//! - [`ConnectFlow`]: the controller presentation code calls into
//! - [`CredentialRecord`]: the persisted result of a successful connection
//! - [`SessionStore`]: single-slot storage for the record, with
//!   [`FileSessionStore`] and [`MemorySessionStore`] implementations
//! - [`AuthScopes`]: the permissions requested from Shopify
//! - [`oauth`]: the individual OAuth 2.0 authorization-code operations
//!
//! # Example
//!
//! ```rust
//! use shopify_connect::{ConnectConfig, ConnectFlow, CredentialRecord, MemorySessionStore, SessionStore, ShopDomain};
//!
//! let flow = ConnectFlow::new(ConnectConfig::builder().build(), MemorySessionStore::new());
//! assert!(!flow.is_valid());
//!
//! let record = CredentialRecord::new(
//!     ShopDomain::new("my-store").unwrap(),
//!     "access-token".to_string(),
//!     "read_products".to_string(),
//! );
//! flow.store().save(&record).unwrap();
//! assert!(flow.is_valid());
//!
//! flow.disconnect().unwrap();
//! assert!(flow.session().is_none());
//! ```

mod flow;
pub mod oauth;
mod scopes;
pub mod session;
pub mod store;

pub use flow::ConnectFlow;
pub use scopes::AuthScopes;
pub use session::{AccessTokenResponse, CredentialRecord};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};
