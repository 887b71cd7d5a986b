//! One plugin invocation, from query string to host calls

use crate::client::{FeedClient, FeedSource};
use crate::config_ext::Eco99ConfigExt;
use crate::dispatch::{decide, Action};
use crate::error::Result;
use crate::extract::{fetch_channels, fetch_playlist};
use crate::host::{Handle, Host};
use crate::menu::{render_menu, ListItem, MenuStyle};
use crate::route::{parse_query, Router};
use eco99config::Config;
use tracing::{debug, info};

/// The plugin, with everything an invocation needs made explicit
#[derive(Debug, Clone)]
pub struct Plugin<S> {
    source: S,
    router: Router,
    channels_url: String,
    style: MenuStyle,
}

impl Plugin<FeedClient> {
    /// Builds the plugin from the configuration, fetching feeds over HTTP
    ///
    /// `base_url` is the plugin URL the host invoked us with.
    pub fn from_config(config: &Config, base_url: impl Into<String>) -> Result<Self> {
        let client = FeedClient::builder()
            .timeout(config.get_request_timeout())
            .user_agent(config.get_user_agent())
            .build()?;

        Ok(Self::new(
            client,
            Router::new(base_url),
            config.get_channels_url(),
            config.menu_style(),
        ))
    }
}

impl<S: FeedSource> Plugin<S> {
    pub fn new(source: S, router: Router, channels_url: impl Into<String>, style: MenuStyle) -> Self {
        Self {
            source,
            router,
            channels_url: channels_url.into(),
            style,
        }
    }

    /// Handles one invocation
    ///
    /// `query` is the raw invocation query (`""` or `?mode=…&url=…`). Errors
    /// are returned as-is: nothing is listed when a feed cannot be read.
    pub fn run<H: Host + ?Sized>(&self, host: &mut H, handle: Handle, query: &str) -> Result<()> {
        let params = parse_query(query);
        debug!("Invocation parameters: {:?}", params);

        let action = decide(&params)?;
        self.execute(host, handle, &action)
    }

    /// Executes an already decided action
    pub fn execute<H: Host + ?Sized>(
        &self,
        host: &mut H,
        handle: Handle,
        action: &Action,
    ) -> Result<()> {
        info!("Handle {}: {}", handle, action);

        match action {
            Action::ShowChannels => {
                let channels = fetch_channels(&self.source, &self.router, &self.channels_url)?;
                render_menu(host, handle, &channels, true, &self.style)?;
            }
            Action::ShowPlaylist { url } => {
                let playlist = fetch_playlist(&self.source, &self.router, url)?;
                render_menu(host, handle, &playlist, false, &self.style)?;
            }
            Action::PlayStream { url } => {
                host.set_resolved_url(handle, true, ListItem::resolved(url.as_str()))?;
            }
        }

        host.end_of_directory(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::host::RecordingHost;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::Path;

    const BASE: &str = "plugin://plugin.audio.eco99/";
    const INDEX: &str = "http://index/";

    /// Serves canned feeds and records which URLs were fetched
    #[derive(Default)]
    struct StaticFeeds {
        feeds: HashMap<String, String>,
        fetched: RefCell<Vec<String>>,
    }

    impl FeedSource for StaticFeeds {
        fn fetch(&self, url: &str) -> Result<String> {
            self.fetched.borrow_mut().push(url.to_string());
            self.feeds
                .get(url)
                .cloned()
                .ok_or_else(|| Error::Io(std::io::Error::other(format!("no feed at {url}"))))
        }
    }

    fn plugin(feeds: &[(&str, &str)]) -> Plugin<StaticFeeds> {
        let source = StaticFeeds {
            feeds: feeds
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..StaticFeeds::default()
        };
        Plugin::new(
            source,
            Router::new(BASE),
            INDEX,
            MenuStyle::new("", Path::new("/addon")),
        )
    }

    #[test]
    fn test_stream_resolves_without_fetching() {
        let plugin = plugin(&[]);
        let mut host = RecordingHost::default();
        plugin
            .run(&mut host, 5, "?mode=stream&url=http%3A%2F%2Fcdn%2Fa.m3u8")
            .unwrap();

        assert!(plugin.source.fetched.borrow().is_empty());
        assert_eq!(host.resolved.len(), 1);
        let (handle, succeeded, item) = &host.resolved[0];
        assert_eq!(*handle, 5);
        assert!(*succeeded);
        assert_eq!(item.path.as_deref(), Some("http://cdn/a.m3u8"));
        assert_eq!(host.ended, vec![5]);
        assert!(host.listings.is_empty());
    }

    #[test]
    fn test_unknown_mode_touches_nothing() {
        let plugin = plugin(&[]);
        let mut host = RecordingHost::default();
        let err = plugin.run(&mut host, 1, "?mode=radio").unwrap_err();

        assert!(matches!(err, Error::UnknownMode(_)));
        assert!(host.ended.is_empty());
        assert!(plugin.source.fetched.borrow().is_empty());
    }

    #[test]
    fn test_fetch_failure_aborts_listing() {
        let plugin = plugin(&[]);
        let mut host = RecordingHost::default();
        let err = plugin.run(&mut host, 1, "").unwrap_err();

        assert!(err.is_network());
        assert_eq!(*plugin.source.fetched.borrow(), vec![INDEX.to_string()]);
        assert!(host.listings.is_empty());
        assert!(host.ended.is_empty());
    }

    #[test]
    fn test_malformed_feed_is_parse_error() {
        let plugin = plugin(&[(INDEX, "<rss><channel></rss>")]);
        let mut host = RecordingHost::default();
        let err = plugin.run(&mut host, 1, "").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
