//! Inbound OAuth callback parameters.

use std::borrow::Cow;
use std::collections::BTreeMap;

/// Query parameters Shopify appends to the redirect URI.
///
/// Shopify sends `code`, `shop`, `state`, `timestamp`, `host` and `hmac`;
/// any other parameter is kept as well so the HMAC signature can be checked
/// over the full set.
///
/// # Example
///
/// ```rust
/// use shopify_connect::auth::oauth::CallbackQuery;
///
/// let query = CallbackQuery::parse("?code=abc&shop=demo.myshopify.com&state=xyz%3D");
/// assert_eq!(query.code(), Some("abc"));
/// assert_eq!(query.shop(), Some("demo.myshopify.com"));
/// assert_eq!(query.state(), Some("xyz="));
/// assert_eq!(query.hmac(), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackQuery {
    params: BTreeMap<String, String>,
}

impl CallbackQuery {
    /// Parses a raw query string, with or without the leading `?`.
    ///
    /// Keys and values are percent-decoded and `+` is read as a space. When a
    /// key repeats, the last value wins.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();

        Self { params }
    }

    /// Builds a query from already-decoded key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the value of `key`, treating an empty value as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// The authorization code.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.get("code")
    }

    /// The store identifier Shopify reports.
    #[must_use]
    pub fn shop(&self) -> Option<&str> {
        self.get("shop")
    }

    /// The echoed CSRF state.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.get("state")
    }

    /// The callback signature.
    #[must_use]
    pub fn hmac(&self) -> Option<&str> {
        self.get("hmac")
    }

    /// Returns the string Shopify signs: every parameter except `hmac`,
    /// sorted by key, as `key=value` pairs joined with `&`.
    #[must_use]
    pub fn to_signable_string(&self) -> String {
        self.params
            .iter()
            .filter(|(key, _)| key.as_str() != "hmac")
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or_else(|_| spaced.clone(), Cow::into_owned)
}
