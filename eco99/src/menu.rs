//! Menu rendering
//!
//! Turns extracted records into host list items and submits them as a single
//! directory listing tagged as music videos.

use crate::covers::normalize_cover;
use crate::error::Result;
use crate::extract::FeedRecord;
use crate::host::{Handle, Host};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Content type of every listing
pub const CONTENT_TYPE: &str = "musicvideos";

/// Genre shown for every entry
pub const GENRE: &str = "Podcast";

/// Media type of every entry
pub const MEDIA_TYPE: &str = "musicvideo";

/// Info label family of every entry
pub const INFO_TYPE: &str = "video";

/// List item property telling the host an entry resolves to a stream
pub const PROPERTY_IS_PLAYABLE: &str = "IsPlayable";

/// Fanart asset, relative to the addon folder
pub const FANART_ASSET: &str = "resources/media/fanart.jpg";

/// Descriptive metadata of a list item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoLabels {
    #[serde(rename = "type")]
    pub info_type: String,
    pub title: String,
    pub genre: String,
    pub plot: String,
    #[serde(rename = "plotoutline")]
    pub plot_outline: String,
    #[serde(rename = "mediatype")]
    pub media_type: String,
}

/// Artwork of a list item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artwork {
    pub thumb: String,
    pub poster: String,
    pub fanart: String,
}

/// Item displayed by the host, or handed to its player
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ListItem {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<InfoLabels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub art: Option<Artwork>,
}

impl ListItem {
    /// Item carrying only a resolved media path, for playback
    pub fn resolved(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Whether the item is flagged as playable
    pub fn is_playable(&self) -> bool {
        self.properties
            .get(PROPERTY_IS_PLAYABLE)
            .is_some_and(|v| v == "true")
    }
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    /// Navigation URL re-invoking the plugin
    pub url: String,
    pub item: ListItem,
    pub is_folder: bool,
}

/// Rendering settings coming from the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuStyle {
    /// Prefix the feed duplicates in front of cover URLs
    pub cover_prefix: String,
    /// Fanart image shown behind every entry
    pub fanart: String,
}

impl MenuStyle {
    /// Style using the fanart shipped in `addon_path`
    pub fn new(cover_prefix: impl Into<String>, addon_path: &Path) -> Self {
        Self {
            cover_prefix: cover_prefix.into(),
            fanart: addon_path.join(FANART_ASSET).to_string_lossy().into_owned(),
        }
    }
}

/// Builds the list entry of a record
pub fn build_entry(record: &FeedRecord, is_folder: bool, style: &MenuStyle) -> DirectoryEntry {
    let album_cover = normalize_cover(&record.album_cover, &style.cover_prefix);

    let mut properties = BTreeMap::new();
    properties.insert(
        PROPERTY_IS_PLAYABLE.to_string(),
        (!is_folder).to_string(),
    );

    let item = ListItem {
        label: record.title.clone(),
        path: None,
        properties,
        info: Some(InfoLabels {
            info_type: INFO_TYPE.to_string(),
            title: record.title.clone(),
            genre: GENRE.to_string(),
            plot: record.description.clone(),
            plot_outline: record.description.clone(),
            media_type: MEDIA_TYPE.to_string(),
        }),
        art: Some(Artwork {
            thumb: album_cover.clone(),
            poster: album_cover,
            fanart: style.fanart.clone(),
        }),
    };

    DirectoryEntry {
        url: record.navigation_url.clone(),
        item,
        is_folder,
    }
}

/// Submits `records` to the host as one directory listing
///
/// Folders are channels (they open a playlist); non-folders are playable
/// streams. The listing is not closed here.
pub fn render_menu<H: Host + ?Sized>(
    host: &mut H,
    handle: Handle,
    records: &[FeedRecord],
    is_folder: bool,
    style: &MenuStyle,
) -> Result<()> {
    let entries: Vec<DirectoryEntry> = records
        .iter()
        .map(|record| build_entry(record, is_folder, style))
        .collect();

    debug!(
        "Rendering {} entries (folders: {}) on handle {}",
        entries.len(),
        is_folder,
        handle
    );

    host.add_directory_items(handle, entries)?;
    host.set_content(handle, CONTENT_TYPE)
}
