//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated Shopify API key (the OAuth `client_id`).
///
/// # Example
///
/// ```rust
/// use shopify_connect::ApiKey;
///
/// let key = ApiKey::new("my-api-key").unwrap();
/// assert_eq!(key.as_ref(), "my-api-key");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Shopify API secret key (the OAuth `client_secret`).
///
/// The `Debug` implementation masks the value, displaying only
/// `ApiSecretKey(*****)`, so configuration can be logged safely.
///
/// # Example
///
/// ```rust
/// use shopify_connect::ApiSecretKey;
///
/// let secret = ApiSecretKey::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ApiSecretKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSecretKey(String);

impl ApiSecretKey {
    /// Creates a new validated API secret key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiSecretKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiSecretKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiSecretKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecretKey(*****)")
    }
}

/// A canonical Shopify store identifier of the form `label.myshopify.com`.
///
/// Construction normalizes free-form user input, in this order:
///
/// 1. trim surrounding whitespace
/// 2. lowercase
/// 3. strip a leading `http://` or `https://`
/// 4. strip trailing slashes
/// 5. append `.myshopify.com` when no `.` remains
///
/// The result must then be a label that starts with a lowercase letter or
/// digit, continues with letters, digits or hyphens, and ends with the
/// `.myshopify.com` suffix.
///
/// # Serialization
///
/// `ShopDomain` serializes to and deserializes from the full domain string:
///
/// ```rust
/// use shopify_connect::ShopDomain;
///
/// let domain = ShopDomain::new("my-store").unwrap();
/// let json = serde_json::to_string(&domain).unwrap();
/// assert_eq!(json, r#""my-store.myshopify.com""#);
/// ```
///
/// # Example
///
/// ```rust
/// use shopify_connect::ShopDomain;
///
/// let domain = ShopDomain::new("  https://My-Store.myshopify.com/ ").unwrap();
/// assert_eq!(domain.as_ref(), "my-store.myshopify.com");
/// assert_eq!(domain.shop_name(), "my-store");
///
/// assert!(ShopDomain::new("my store!").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShopDomain {
    full_domain: String,
    shop_name_end: usize,
}

impl ShopDomain {
    const SUFFIX: &'static str = ".myshopify.com";

    /// Normalizes and validates a store identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShopDomain`] if the normalized value is
    /// not of the form `label.myshopify.com`.
    pub fn new(domain: impl Into<String>) -> Result<Self, ConfigError> {
        let input = domain.into();
        let full_domain = Self::normalize(&input);

        let Some(shop_name) = full_domain.strip_suffix(Self::SUFFIX) else {
            return Err(ConfigError::InvalidShopDomain { domain: input });
        };

        if !Self::is_valid_shop_name(shop_name) {
            return Err(ConfigError::InvalidShopDomain { domain: input });
        }

        Ok(Self {
            shop_name_end: shop_name.len(),
            full_domain,
        })
    }

    /// Returns the shop name portion of the domain.
    ///
    /// For `my-store.myshopify.com`, this returns `my-store`.
    #[must_use]
    pub fn shop_name(&self) -> &str {
        &self.full_domain[..self.shop_name_end]
    }

    fn normalize(input: &str) -> String {
        let lowered = input.trim().to_lowercase();
        let without_scheme = lowered
            .strip_prefix("https://")
            .or_else(|| lowered.strip_prefix("http://"))
            .unwrap_or(&lowered);
        let host = without_scheme.trim_end_matches('/');

        if host.contains('.') {
            host.to_string()
        } else {
            format!("{host}{}", Self::SUFFIX)
        }
    }

    fn is_valid_shop_name(name: &str) -> bool {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return false;
        };

        if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
            return false;
        }

        chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.full_domain
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_domain)
    }
}

impl Serialize for ShopDomain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.full_domain)
    }
}

impl<'de> Deserialize<'de> for ShopDomain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated absolute URL, used for the redirect URI and the proxy base.
///
/// # Example
///
/// ```rust
/// use shopify_connect::HostUrl;
///
/// let url = HostUrl::new("http://localhost:8080/proxy/").unwrap();
/// assert_eq!(url.scheme(), "http");
/// assert_eq!(url.host_name(), Some("localhost"));
/// assert_eq!(url.join("access_token"), "http://localhost:8080/proxy/access_token");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl HostUrl {
    /// Creates a new validated URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHostUrl`] if the URL has no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidHostUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidHostUrl { url });
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(ConfigError::InvalidHostUrl { url });
        }

        // Host ends at port, path, query, or end of string
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_end == host_start {
            return Err(ConfigError::InvalidHostUrl { url });
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        let host = &self.url[self.host_start..self.host_end];
        if host.is_empty() {
            None
        } else {
            Some(host)
        }
    }

    /// Appends a path segment, collapsing the slash between them.
    #[must_use]
    pub fn join(&self, segment: &str) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            segment.trim_start_matches('/')
        )
    }
}

impl AsRef<str> for HostUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_rejects_empty_string() {
        assert!(matches!(ApiKey::new(""), Err(ConfigError::EmptyApiKey)));
        assert!(matches!(ApiKey::new("   "), Err(ConfigError::EmptyApiKey)));
    }

    #[test]
    fn test_api_secret_key_masks_value_in_debug() {
        let secret = ApiSecretKey::new("super-secret-key").unwrap();
        let debug_output = format!("{:?}", secret);
        assert_eq!(debug_output, "ApiSecretKey(*****)");
        assert!(!debug_output.contains("super-secret-key"));
    }

    #[test]
    fn test_shop_domain_appends_suffix_to_bare_label() {
        let domain = ShopDomain::new("demo").unwrap();
        assert_eq!(domain.as_ref(), "demo.myshopify.com");
        assert_eq!(domain.shop_name(), "demo");
    }

    #[test]
    fn test_shop_domain_canonical_input_is_fixed_point() {
        for canonical in ["demo.myshopify.com", "my-store.myshopify.com", "0shop.myshopify.com"] {
            let domain = ShopDomain::new(canonical).unwrap();
            assert_eq!(domain.as_ref(), canonical);

            let again = ShopDomain::new(domain.as_ref()).unwrap();
            assert_eq!(again, domain);
        }
    }

    #[test]
    fn test_shop_domain_strips_scheme_slashes_and_case() {
        let expected = ShopDomain::new("demo").unwrap();
        for input in [
            "https://demo.myshopify.com",
            "http://demo.myshopify.com/",
            "HTTPS://DEMO.myshopify.com///",
            "  Demo  ",
            "https://demo",
            "demo/",
        ] {
            assert_eq!(ShopDomain::new(input).unwrap(), expected, "input: {input:?}");
        }
    }

    #[test]
    fn test_shop_domain_rejects_invalid_inputs() {
        for input in [
            "",
            "   ",
            "my store!",
            "my_store",
            "-my-store",
            "my-store.otherdomain.com",
            "a.b.myshopify.com",
            "ftp://demo.myshopify.com",
            "https://https://demo",
            "demo.myshopify.com/admin",
            ".myshopify.com",
            "démo",
        ] {
            assert!(
                matches!(
                    ShopDomain::new(input),
                    Err(ConfigError::InvalidShopDomain { .. })
                ),
                "expected rejection for {input:?}"
            );
        }
    }

    #[test]
    fn test_shop_domain_allows_trailing_hyphen_in_label() {
        let domain = ShopDomain::new("shop-").unwrap();
        assert_eq!(domain.as_ref(), "shop-.myshopify.com");
    }

    #[test]
    fn test_shop_domain_error_reports_original_input() {
        let err = ShopDomain::new("my store!").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidShopDomain {
                domain: "my store!".to_string()
            }
        );
    }

    #[test]
    fn test_host_url_validates_format() {
        let url = HostUrl::new("https://myapp.example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_name(), Some("myapp.example.com"));

        let url = HostUrl::new("http://localhost:3000").unwrap();
        assert_eq!(url.host_name(), Some("localhost"));

        let url = HostUrl::new("https://myapp.example.com/auth/callback").unwrap();
        assert_eq!(url.host_name(), Some("myapp.example.com"));
    }

    #[test]
    fn test_host_url_rejects_invalid() {
        assert!(HostUrl::new("myapp.example.com").is_err());
        assert!(HostUrl::new("https://").is_err());
        assert!(HostUrl::new("://example.com").is_err());
        assert!(HostUrl::new("https:///path").is_err());
    }

    #[test]
    fn test_host_url_join_handles_slashes() {
        let base = HostUrl::new("http://localhost:8080/proxy").unwrap();
        assert_eq!(base.join("access_token"), "http://localhost:8080/proxy/access_token");
        assert_eq!(base.join("/access_token"), "http://localhost:8080/proxy/access_token");
    }

    #[test]
    fn test_shop_domain_round_trip_serialization() {
        let original = ShopDomain::new("my-store").unwrap();
        let json = serde_json::to_string(&original).unwrap();
        let restored: ShopDomain = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn test_shop_domain_deserialize_rejects_invalid() {
        let result: Result<ShopDomain, _> = serde_json::from_str(r#""bad shop!""#);
        assert!(result.is_err());
    }
}
