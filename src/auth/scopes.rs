//! OAuth scope handling.
//!
//! This module provides the [`AuthScopes`] type for the permission list
//! requested in the authorization URL.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An ordered, de-duplicated list of OAuth scopes.
///
/// Scopes keep the order they were configured in, so the `scope` parameter
/// sent to Shopify is exactly what the deployment asked for. Duplicates and
/// surrounding whitespace are dropped.
///
/// `AuthScopes` serializes to and deserializes from a comma-separated string.
///
/// # Example
///
/// ```rust
/// use shopify_connect::AuthScopes;
///
/// let scopes: AuthScopes = "write_products, read_orders,write_products".parse().unwrap();
/// assert_eq!(scopes.to_string(), "write_products,read_orders");
/// assert!(scopes.contains("read_orders"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AuthScopes {
    scopes: Vec<String>,
}

impl AuthScopes {
    /// Creates an empty scope list.
    #[must_use]
    pub const fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Returns `true` if no scopes are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Returns `true` if `scope` is in the list.
    #[must_use]
    pub fn contains(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    /// Returns an iterator over the scopes, in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }

    fn push(&mut self, scope: &str) {
        if !self.contains(scope) {
            self.scopes.push(scope.to_string());
        }
    }
}

impl FromStr for AuthScopes {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scopes = Self::new();

        for scope in s.split(',') {
            let scope = scope.trim();
            if scope.is_empty() {
                continue;
            }

            if !scope.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(ConfigError::InvalidScopes {
                    reason: format!("Invalid characters in scope: '{scope}'"),
                });
            }

            scopes.push(scope);
        }

        Ok(scopes)
    }
}

impl fmt::Display for AuthScopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.scopes.join(","))
    }
}

impl Serialize for AuthScopes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AuthScopes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
