//! Channel playlist extraction

use super::{extract_records, required_text, PlaylistItemRecord};
use crate::client::FeedSource;
use crate::dispatch::Action;
use crate::error::Result;
use crate::feed::{parse_feed, FeedNode};
use crate::route::Router;
use tracing::info;

/// Fetches a channel feed and extracts its streams
///
/// Each entry plays the URL of the item enclosure. The `guid` of the item is
/// not a playable URL and is ignored.
pub fn fetch_playlist(
    source: &impl FeedSource,
    router: &Router,
    channel_url: &str,
) -> Result<Vec<PlaylistItemRecord>> {
    let xml = source.fetch(channel_url)?;
    let root = parse_feed(&xml)?;
    let playlist = playlist_from_feed(&root, router)?;
    info!("Found {} streams in {}", playlist.len(), channel_url);
    Ok(playlist)
}

/// Extracts the streams of an already parsed channel feed
pub fn playlist_from_feed(root: &FeedNode, router: &Router) -> Result<Vec<PlaylistItemRecord>> {
    extract_records(root, router, |index, item| {
        let url = required_text(item, index, &["enclosure", "@url"])?;
        Ok(Action::PlayStream {
            url: url.to_string(),
        })
    })
}
