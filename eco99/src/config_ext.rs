//! eco99 settings on top of eco99config
//!
//! The `Eco99ConfigExt` trait adds typed getters to [`eco99config::Config`].
//! Every getter falls back to a built-in default when the value is missing
//! or has the wrong type.
//!
//! ```yaml
//! feed:
//!   channels_url: http://eco99fm.maariv.co.il/RSS_MusicChannels_Index/
//!   timeout_secs: 30
//!   user_agent: eco99/0.1.0 (plugin.audio.eco99)
//! covers:
//!   duplicate_prefix: https://eco99fm.maariv.co.il/download/Sets/pictures/
//! addon:
//!   path: .
//!   fanart: resources/media/fanart.jpg
//! log:
//!   level: info
//! ```

use crate::client::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::covers::DEFAULT_DUPLICATE_PREFIX;
use crate::extract::channels::DEFAULT_CHANNELS_URL;
use crate::menu::{MenuStyle, FANART_ASSET};
use eco99config::Config;
use std::path::PathBuf;
use std::time::Duration;

/// Default log level when neither `RUST_LOG` nor the configuration set one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Typed access to the eco99 configuration sections
pub trait Eco99ConfigExt {
    /// URL of the channel index feed
    fn get_channels_url(&self) -> String;

    /// Timeout of each feed request
    fn get_request_timeout(&self) -> Duration;

    /// User-Agent sent with feed requests
    fn get_user_agent(&self) -> String;

    /// Prefix the feed duplicates in front of cover URLs
    fn get_cover_prefix(&self) -> String;

    /// Folder the addon is installed in
    fn get_addon_path(&self) -> PathBuf;

    /// Fanart image, resolved against the addon folder
    fn get_fanart_path(&self) -> PathBuf;

    /// Log filter used when `RUST_LOG` is not set
    fn get_log_level(&self) -> String;

    /// Rendering settings for the menus
    fn menu_style(&self) -> MenuStyle {
        MenuStyle {
            cover_prefix: self.get_cover_prefix(),
            fanart: self.get_fanart_path().to_string_lossy().into_owned(),
        }
    }
}

impl Eco99ConfigExt for Config {
    fn get_channels_url(&self) -> String {
        self.get_string_or(&["feed", "channels_url"], DEFAULT_CHANNELS_URL)
    }

    fn get_request_timeout(&self) -> Duration {
        Duration::from_secs(self.get_u64_or(&["feed", "timeout_secs"], DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    fn get_user_agent(&self) -> String {
        self.get_string_or(&["feed", "user_agent"], DEFAULT_USER_AGENT)
    }

    fn get_cover_prefix(&self) -> String {
        self.get_string_or(&["covers", "duplicate_prefix"], DEFAULT_DUPLICATE_PREFIX)
    }

    fn get_addon_path(&self) -> PathBuf {
        PathBuf::from(self.get_string_or(&["addon", "path"], "."))
    }

    fn get_fanart_path(&self) -> PathBuf {
        let asset = self.get_string_or(&["addon", "fanart"], FANART_ASSET);
        self.get_addon_path().join(asset)
    }

    fn get_log_level(&self) -> String {
        self.get_string_or(&["log", "level"], DEFAULT_LOG_LEVEL)
    }
}
