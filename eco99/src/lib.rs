//! eco99fm music channels plugin
//!
//! This crate lists the eco99fm music channels and their playlists inside a
//! media-center host. The channel index and each channel playlist are RSS
//! feeds; the plugin turns their items into host directory entries, and
//! resolves a chosen stream for the host player.
//!
//! # Flow
//!
//! The host starts the plugin once per navigation action with a handle and a
//! query string. [`dispatch::decide`] maps the query to an [`Action`]:
//!
//! - no mode: fetch the channel index, list the channels as folders
//! - `mode=playlist`: fetch the channel feed, list its streams as playable items
//! - `mode=stream`: resolve the stream URL for playback
//!
//! Each listed entry carries a navigation URL ([`route::Router`]) encoding
//! the next action.
//!
//! # Example
//!
//! ```no_run
//! use eco99::host::JsonLinesHost;
//! use eco99::Plugin;
//! use eco99config::Config;
//!
//! # fn main() -> eco99::Result<()> {
//! let config = Config::load(None)?;
//! let plugin = Plugin::from_config(&config, "plugin://plugin.audio.eco99/")?;
//!
//! let mut host = JsonLinesHost::new(std::io::stdout());
//! plugin.run(&mut host, 1, "")?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config_ext;
pub mod covers;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod feed;
pub mod host;
pub mod menu;
pub mod plugin;
pub mod route;

// Re-exports
pub use client::{ClientBuilder, FeedClient, FeedSource};
pub use config_ext::Eco99ConfigExt;
pub use dispatch::{decide, Action};
pub use error::{Error, Result};
pub use extract::{ChannelRecord, FeedRecord, PlaylistItemRecord};
pub use feed::{parse_feed, FeedNode};
pub use host::{Handle, Host, JsonLinesHost, RecordingHost};
pub use menu::{DirectoryEntry, ListItem, MenuStyle};
pub use plugin::Plugin;
pub use route::{parse_query, RouteParams, Router};
