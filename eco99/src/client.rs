//! HTTP client for the eco99fm RSS feeds
//!
//! Feeds are fetched with a single blocking GET: the plugin handles one
//! navigation action per process, so there is nothing to overlap.
//!
//! # Example
//!
//! ```no_run
//! use eco99::client::{FeedClient, FeedSource};
//!
//! let client = FeedClient::new()?;
//! let xml = client.fetch("http://eco99fm.maariv.co.il/RSS_MusicChannels_Index/")?;
//! println!("{} bytes", xml.len());
//! # Ok::<(), eco99::Error>(())
//! ```

use crate::error::Result;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "eco99/0.1.0 (plugin.audio.eco99)";

/// Anything able to return the raw text of a feed
///
/// [`FeedClient`] is the HTTP implementation; the extractors only depend on
/// this trait.
pub trait FeedSource {
    /// Returns the body of the feed at `url`
    fn fetch(&self, url: &str) -> Result<String>;
}

impl<T: FeedSource + ?Sized> FeedSource for &T {
    fn fetch(&self, url: &str) -> Result<String> {
        (**self).fetch(url)
    }
}

/// Blocking feed client
///
/// No retry is performed; a failed request surfaces as
/// [`Error::Network`](crate::Error::Network).
#[derive(Clone)]
pub struct FeedClient {
    agent: Agent,
    user_agent: String,
}

impl fmt::Debug for FeedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedClient")
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl FeedClient {
    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// User-Agent sent with each request
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl FeedSource for FeedClient {
    fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching feed: {}", url);

        let response = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .call()?;

        let mut body = response.into_body();
        let text = body.read_to_string()?;

        debug!("Received {} bytes from {}", text.len(), url);
        Ok(text)
    }
}

/// Builder for configuring a FeedClient
#[derive(Debug)]
pub struct ClientBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<FeedClient> {
        let config = Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build();

        Ok(FeedClient {
            agent: config.into(),
            user_agent: self.user_agent,
        })
    }
}
