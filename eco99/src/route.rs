//! Navigation URLs
//!
//! The host re-invokes the plugin with the URL attached to the chosen list
//! entry. That URL is the plugin base followed by a form-encoded query
//! carrying the routing intent, e.g.
//! `plugin://plugin.audio.eco99/?mode=playlist&url=http%3A%2F%2Ffeed%2Fch1`.

use crate::dispatch::Action;
use std::collections::BTreeMap;
use tracing::trace;
use url::form_urlencoded;

/// Decoded query parameters of an invocation
pub type RouteParams = BTreeMap<String, String>;

/// Query key holding the navigation mode
pub const MODE_KEY: &str = "mode";

/// Query key holding the target URL
pub const URL_KEY: &str = "url";

/// Builds navigation URLs below a fixed plugin base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    base: String,
}

impl Router {
    /// Create a router for the given plugin base URL
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Builds `base?query` from key/value pairs
    ///
    /// Without any pair the bare base URL is returned.
    pub fn build<I, K, V>(&self, query: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let mut empty = true;
        for (key, value) in query {
            serializer.append_pair(key.as_ref(), value.as_ref());
            empty = false;
        }

        if empty {
            return self.base.clone();
        }

        let url = format!("{}?{}", self.base, serializer.finish());
        trace!("Built route {}", url);
        url
    }

    /// Navigation URL re-invoking the plugin with `action`
    pub fn url_for(&self, action: &Action) -> String {
        self.build(action.route_params())
    }

    /// Decodes a navigation URL built by this router
    ///
    /// Returns `None` when the URL does not start with the router base.
    pub fn decode(&self, navigation_url: &str) -> Option<RouteParams> {
        let rest = navigation_url.strip_prefix(&self.base)?;
        Some(parse_query(rest))
    }
}

/// Parses an invocation query such as `?mode=stream&url=…`
///
/// The leading `?` is optional. When a key is repeated, its first value wins.
pub fn parse_query(query: &str) -> RouteParams {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut params = RouteParams::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}
