//! The connect flow controller.
//!
//! [`ConnectFlow`] ties the OAuth legs to a [`SessionStore`] and exposes the
//! three entry points presentation code needs: start the flow, complete it
//! from the callback, and check or clear the resulting session.

use crate::auth::oauth::{
    begin_auth, exchange_code_for_token, validate_hmac, BeginAuthResult, CallbackQuery,
    OAuthError, PendingAuthorization,
};
use crate::auth::session::CredentialRecord;
use crate::auth::store::SessionStore;
use crate::config::{ConnectConfig, ShopDomain};

/// Connects a single Shopify store and manages its credential record.
///
/// The store is injected so the same flow runs against a file on disk or an
/// in-memory slot in tests.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_connect::{ConnectConfig, ConnectFlow, FileSessionStore};
/// use shopify_connect::auth::oauth::CallbackQuery;
///
/// let flow = ConnectFlow::new(ConnectConfig::from_env()?, FileSessionStore::new(data_dir));
///
/// // "Connect" button
/// let started = flow.start(&user_input)?;
/// save_in_session(started.pending());
/// redirect_to(&started.auth_url);
///
/// // Callback route
/// let record = flow
///     .complete(&CallbackQuery::parse(query_string), &take_from_session())
///     .await?;
///
/// // Dashboard
/// if flow.is_valid() { /* ... */ }
/// flow.disconnect()?;
/// ```
#[derive(Debug)]
pub struct ConnectFlow<S> {
    config: ConnectConfig,
    store: S,
}

impl<S: SessionStore> ConnectFlow<S> {
    /// Creates a flow over `store`.
    #[must_use]
    pub const fn new(config: ConnectConfig, store: S) -> Self {
        Self { config, store }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ConnectConfig {
        &self.config
    }

    /// Returns the session store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Starts the connect flow for a user-entered store identifier.
    ///
    /// # Errors
    ///
    /// See [`begin_auth`].
    pub fn start(&self, raw_shop: &str) -> Result<BeginAuthResult, OAuthError> {
        begin_auth(&self.config, raw_shop)
    }

    /// Completes the connect flow from the OAuth callback.
    ///
    /// Checks run in this order:
    ///
    /// 1. if the callback carries an `hmac`, it must verify against the
    ///    client secret
    /// 2. the callback `state` must equal the pending one
    /// 3. the callback must carry a `code`
    /// 4. the callback `shop` (or the pending shop, when absent) must
    ///    normalize to the shop the flow was started for
    ///
    /// The code is then exchanged and the resulting [`CredentialRecord`],
    /// issued now, replaces whatever was stored.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::InvalidHmac`], [`OAuthError::StateMismatch`],
    ///   [`OAuthError::InvalidCallback`], [`OAuthError::InvalidIdentifier`]
    ///   for a callback that fails the checks above
    /// - any error of [`exchange_code_for_token`]
    /// - [`OAuthError::Storage`] if the record could not be saved
    pub async fn complete(
        &self,
        callback: &CallbackQuery,
        pending: &PendingAuthorization,
    ) -> Result<CredentialRecord, OAuthError> {
        if callback.hmac().is_some() {
            let secret = self
                .config
                .api_secret_key()
                .ok_or(OAuthError::MissingConfiguration {
                    field: "client_secret",
                })?;
            if !validate_hmac(callback, secret) {
                tracing::warn!("Rejected callback for {} with invalid HMAC", pending.shop);
                return Err(OAuthError::InvalidHmac);
            }
        }

        let received_state = callback.state().unwrap_or_default();
        if !pending.state.verify(received_state) {
            tracing::warn!("Rejected callback for {} with mismatched state", pending.shop);
            return Err(OAuthError::StateMismatch {
                expected: pending.state.to_string(),
                received: received_state.to_string(),
            });
        }

        let code = callback.code().ok_or_else(|| OAuthError::InvalidCallback {
            reason: "Authorization code is missing".to_string(),
        })?;

        let raw_shop = callback.shop().unwrap_or_else(|| pending.shop.as_ref());
        let shop = ShopDomain::new(raw_shop)
            .ok()
            .filter(|shop| *shop == pending.shop)
            .ok_or_else(|| OAuthError::InvalidIdentifier {
                input: raw_shop.to_string(),
            })?;

        let token = exchange_code_for_token(&self.config, code, shop.as_ref()).await?;

        let record = CredentialRecord::from_access_token_response(shop, &token);
        self.store.save(&record)?;
        tracing::debug!("Connected {} with scopes {}", record.shop, record.scope);

        Ok(record)
    }

    /// Returns the stored credential record, fresh or not.
    #[must_use]
    pub fn session(&self) -> Option<CredentialRecord> {
        self.store.load()
    }

    /// Returns `true` if a record is stored and younger than 24 hours.
    ///
    /// Never contacts Shopify and never modifies the store.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.store
            .load()
            .is_some_and(|record| record.is_fresh())
    }

    /// Removes the stored credential record. Succeeds if none is stored.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Storage`] if the store could not be modified.
    pub fn disconnect(&self) -> Result<(), OAuthError> {
        self.store.clear()?;
        tracing::debug!("Cleared stored credential record");
        Ok(())
    }
}
