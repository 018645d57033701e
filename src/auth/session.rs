//! The persisted credential record.
//!
//! This module provides [`CredentialRecord`], the single object written to
//! the session store after a successful token exchange, and
//! [`AccessTokenResponse`], the token endpoint's success body.

use crate::config::ShopDomain;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Success body of the token endpoint.
///
/// Only `access_token` and `scope` are read; any other field is ignored.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct AccessTokenResponse {
    /// The issued access token.
    pub access_token: String,
    /// Comma-separated granted scopes, in the order returned.
    pub scope: String,
}

impl fmt::Debug for AccessTokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenResponse")
            .field("access_token", &"*****")
            .field("scope", &self.scope)
            .finish()
    }
}

/// The established connection to a store.
///
/// A record is always complete: every field is required when deserializing,
/// so a stored value missing any of them is rejected as a whole. The JSON
/// layout uses the field names `shop`, `accessToken`, `scope` and `issuedAt`.
///
/// The `Debug` implementation never prints the access token.
///
/// # Freshness
///
/// A record is considered valid for 24 hours
/// ([`FRESHNESS_WINDOW_MS`](Self::FRESHNESS_WINDOW_MS)) after it was issued.
/// An expired record is not deleted; it is only reported as stale by
/// [`is_fresh`](Self::is_fresh).
///
/// # Example
///
/// ```rust
/// use shopify_connect::{CredentialRecord, ShopDomain};
///
/// let record = CredentialRecord::new(
///     ShopDomain::new("demo").unwrap(),
///     "shpat_secret".to_string(),
///     "read_products".to_string(),
/// );
///
/// assert!(record.is_fresh());
/// assert!(!format!("{record:?}").contains("shpat_secret"));
///
/// let json = serde_json::to_value(&record).unwrap();
/// assert_eq!(json["shop"], "demo.myshopify.com");
/// assert_eq!(json["accessToken"], "shpat_secret");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    /// The canonical store identifier.
    pub shop: ShopDomain,

    /// The access token issued by Shopify.
    pub access_token: String,

    /// Comma-separated granted scopes, as returned by Shopify.
    pub scope: String,

    /// When the record was written, in milliseconds since the Unix epoch.
    pub issued_at: i64,
}

impl CredentialRecord {
    /// How long a record stays valid after it was issued, in milliseconds.
    pub const FRESHNESS_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

    /// Returns the freshness window as a [`Duration`].
    #[must_use]
    pub fn freshness_window() -> Duration {
        Duration::milliseconds(Self::FRESHNESS_WINDOW_MS)
    }

    /// Creates a record issued now.
    #[must_use]
    pub fn new(shop: ShopDomain, access_token: String, scope: String) -> Self {
        Self::issued_at(shop, access_token, scope, Utc::now())
    }

    /// Creates a record with an explicit issue time.
    #[must_use]
    pub fn issued_at(
        shop: ShopDomain,
        access_token: String,
        scope: String,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            shop,
            access_token,
            scope,
            issued_at: issued_at.timestamp_millis(),
        }
    }

    /// Builds a record issued now from a token endpoint response.
    #[must_use]
    pub fn from_access_token_response(shop: ShopDomain, response: &AccessTokenResponse) -> Self {
        Self::new(
            shop,
            response.access_token.clone(),
            response.scope.clone(),
        )
    }

    /// Returns the issue time, or `None` if the stored timestamp is out of range.
    #[must_use]
    pub fn issued_at_time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.issued_at).single()
    }

    /// Returns how long ago the record was issued, relative to `now`.
    #[must_use]
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        Duration::milliseconds(now.timestamp_millis().saturating_sub(self.issued_at))
    }

    /// Returns `true` if the record is younger than the freshness window at `now`.
    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        self.age_at(now) < Self::freshness_window()
    }

    /// Returns `true` if the record is younger than the freshness window.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now())
    }

    /// Returns `true` if every field carries a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && self.issued_at_time().is_some()
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("shop", &self.shop.as_ref())
            .field("access_token", &"*****")
            .field("scope", &self.scope)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

// Verify CredentialRecord is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CredentialRecord>();
};

#[cfg(test)]
mod tests {
    use super::*;

    fn record_issued(issued_at: DateTime<Utc>) -> CredentialRecord {
        CredentialRecord::issued_at(
            ShopDomain::new("demo").unwrap(),
            "tok_abc".to_string(),
            "read_products,write_orders".to_string(),
            issued_at,
        )
    }

    #[test]
    fn test_new_record_is_fresh() {
        let record = record_issued(Utc::now());
        assert!(record.is_fresh());
        assert!(record.is_complete());
    }

    #[test]
    fn test_record_older_than_window_is_stale() {
        let now = Utc::now();
        let record = record_issued(now - Duration::hours(25));
        assert!(!record.is_fresh_at(now));
    }

    #[test]
    fn test_freshness_boundary_is_exclusive() {
        let now = Utc::now();
        let window = CredentialRecord::freshness_window();
        let record = record_issued(now - window);
        assert!(!record.is_fresh_at(now));

        let record = record_issued(now - window + Duration::milliseconds(1));
        assert!(record.is_fresh_at(now));
    }

    #[test]
    fn test_age_at_measures_from_issue_time() {
        let now = Utc::now();
        let record = record_issued(now - Duration::minutes(90));
        assert_eq!(record.age_at(now), Duration::minutes(90));
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let record = record_issued(Utc.timestamp_millis_opt(1_700_000_000_000).unwrap());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "shop": "demo.myshopify.com",
                "accessToken": "tok_abc",
                "scope": "read_products,write_orders",
                "issuedAt": 1_700_000_000_000_i64,
            })
        );
    }

    #[test]
    fn test_deserialize_rejects_partial_record() {
        let json = r#"{"shop":"demo.myshopify.com","accessToken":"tok_abc","scope":"read_products"}"#;
        let result: Result<CredentialRecord, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_token_is_incomplete() {
        let mut record = record_issued(Utc::now());
        record.access_token.clear();
        assert!(!record.is_complete());
    }

    #[test]
    fn test_debug_masks_access_token() {
        let record = record_issued(Utc::now());
        let debug = format!("{record:?}");
        assert!(!debug.contains("tok_abc"));
        assert!(debug.contains("demo.myshopify.com"));

        let response = AccessTokenResponse {
            access_token: "tok_abc".to_string(),
            scope: "read_products".to_string(),
        };
        assert!(!format!("{response:?}").contains("tok_abc"));
    }

    #[test]
    fn test_from_access_token_response_copies_fields() {
        let response: AccessTokenResponse = serde_json::from_str(
            r#"{"access_token":"tok_abc","scope":"write_orders,read_products","expires_in":null}"#,
        )
        .unwrap();
        let record =
            CredentialRecord::from_access_token_response(ShopDomain::new("demo").unwrap(), &response);

        assert_eq!(record.access_token, "tok_abc");
        assert_eq!(record.scope, "write_orders,read_products");
        assert!(record.is_fresh());
    }
}
