//! Feed to record extraction
//!
//! Both eco99fm feeds share the same item layout (`rss/channel/item[]`):
//!
//! | field            | used as                                   |
//! |------------------|-------------------------------------------|
//! | `title`          | record title                              |
//! | `description`    | HTML fragment holding the cover `<img>`   |
//! | `itunes:summary` | record description                        |
//! | `link`           | channel feed URL (channel index only)     |
//! | `enclosure@url`  | stream URL (channel playlists only)       |
//!
//! Records are produced fresh for each request and indexed from 1 in
//! document order. Any missing field aborts the extraction.

pub mod channels;
pub mod playlist;

pub use channels::{channels_from_feed, fetch_channels};
pub use playlist::{fetch_playlist, playlist_from_feed};

use crate::covers::extract_cover;
use crate::dispatch::Action;
use crate::error::{Error, Result};
use crate::feed::FeedNode;
use crate::route::Router;
use serde::Serialize;
use tracing::{debug, warn};

/// One entry of a channel index or of a channel playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedRecord {
    /// 1-based position in the feed
    pub index: usize,
    /// Cover URL, as found in the item description
    pub album_cover: String,
    pub title: String,
    pub description: String,
    /// URL re-invoking the plugin for this entry
    pub navigation_url: String,
}

/// A channel of the channel index
pub type ChannelRecord = FeedRecord;

/// A stream of a channel playlist
pub type PlaylistItemRecord = FeedRecord;

/// Items of `rss/channel`, in document order
fn feed_items(root: &FeedNode) -> Result<Vec<&FeedNode>> {
    let channel = root
        .path(&["rss", "channel"])
        .ok_or_else(|| Error::extraction("feed has no rss/channel element"))?;
    let items = channel.children("item");
    if items.is_empty() {
        warn!("Feed channel has no items");
    }
    Ok(items)
}

/// Text of a required item field
pub(crate) fn required_text<'a>(item: &'a FeedNode, index: usize, path: &[&str]) -> Result<&'a str> {
    item.path(path)
        .and_then(FeedNode::as_text)
        .ok_or_else(|| Error::extraction(format!("item {} has no {}", index, path.join("/"))))
}

/// Walks the feed items and builds one record per item
///
/// `target` returns the action the record navigates to.
fn extract_records<F>(root: &FeedNode, router: &Router, mut target: F) -> Result<Vec<FeedRecord>>
where
    F: FnMut(usize, &FeedNode) -> Result<Action>,
{
    let items = feed_items(root)?;
    let mut records = Vec::with_capacity(items.len());

    for (position, item) in items.into_iter().enumerate() {
        let index = position + 1;

        let description_html = required_text(item, index, &["description"])?;
        let album_cover = extract_cover(description_html).ok_or_else(|| {
            Error::extraction(format!("item {} has no cover image in its description", index))
        })?;

        let title = required_text(item, index, &["title"])?.to_string();
        let description = required_text(item, index, &["itunes:summary"])?.to_string();
        let action = target(index, item)?;

        records.push(FeedRecord {
            index,
            album_cover,
            title,
            description,
            navigation_url: router.url_for(&action),
        });
    }

    debug!("Extracted {} records", records.len());
    Ok(records)
}

#[cfg(test)]
pub(crate) mod test_feeds {
    //! Small feeds shared by the extractor tests

    pub const BASE: &str = "plugin://plugin.audio.eco99/";

    pub fn item(title: &str, description: &str, extra: &str) -> String {
        format!(
            "<item><title>{title}</title><description><![CDATA[{description}]]></description>\
             <itunes:summary>{title} summary</itunes:summary>{extra}</item>"
        )
    }

    pub fn rss(items: &[String]) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
<channel><title>eco99fm</title>{}</channel></rss>"#,
            items.concat()
        )
    }
}
