//! Channel index extraction

use super::{extract_records, required_text, ChannelRecord};
use crate::client::FeedSource;
use crate::dispatch::Action;
use crate::error::Result;
use crate::feed::{parse_feed, FeedNode};
use crate::route::Router;
use tracing::info;

/// Default URL of the channel index feed
pub const DEFAULT_CHANNELS_URL: &str = "http://eco99fm.maariv.co.il/RSS_MusicChannels_Index/";

/// Fetches the channel index and extracts its channels
///
/// Each channel navigates to its own playlist feed (the item `link`).
pub fn fetch_channels(
    source: &impl FeedSource,
    router: &Router,
    index_url: &str,
) -> Result<Vec<ChannelRecord>> {
    let xml = source.fetch(index_url)?;
    let root = parse_feed(&xml)?;
    let channels = channels_from_feed(&root, router)?;
    info!("Found {} channels in {}", channels.len(), index_url);
    Ok(channels)
}

/// Extracts the channels of an already parsed index feed
pub fn channels_from_feed(root: &FeedNode, router: &Router) -> Result<Vec<ChannelRecord>> {
    extract_records(root, router, |index, item| {
        let link = required_text(item, index, &["link"])?;
        Ok(Action::ShowPlaylist {
            url: link.to_string(),
        })
    })
}
