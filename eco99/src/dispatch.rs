//! Routing decision for an invocation
//!
//! The host starts the plugin once per navigation action. What to do is fully
//! determined by the `mode` query parameter:
//!
//! | mode       | action                         |
//! |------------|--------------------------------|
//! | absent     | list the channels              |
//! | `playlist` | list the playlist at `url`     |
//! | `stream`   | resolve `url` for playback     |
//!
//! [`decide`] is a pure function; executing the action against a host is
//! [`Plugin::run`](crate::plugin::Plugin::run)'s job.

use crate::error::{Error, Result};
use crate::route::{RouteParams, MODE_KEY, URL_KEY};
use std::fmt;

/// Mode value routing to a channel playlist
pub const MODE_PLAYLIST: &str = "playlist";

/// Mode value routing to stream playback
pub const MODE_STREAM: &str = "stream";

/// What a single invocation has to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Root menu: every channel of the index feed
    ShowChannels,
    /// Streams of the channel whose feed is at `url`
    ShowPlaylist { url: String },
    /// Hand `url` to the host player
    PlayStream { url: String },
}

impl Action {
    /// Value of the `mode` parameter, `None` for the root menu
    pub fn mode(&self) -> Option<&'static str> {
        match self {
            Action::ShowChannels => None,
            Action::ShowPlaylist { .. } => Some(MODE_PLAYLIST),
            Action::PlayStream { .. } => Some(MODE_STREAM),
        }
    }

    /// Query parameters encoding this action
    pub fn route_params(&self) -> Vec<(&'static str, &str)> {
        match (self.mode(), self) {
            (Some(mode), Action::ShowPlaylist { url } | Action::PlayStream { url }) => {
                vec![(MODE_KEY, mode), (URL_KEY, url.as_str())]
            }
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::ShowChannels => write!(f, "show channels"),
            Action::ShowPlaylist { url } => write!(f, "show playlist {}", url),
            Action::PlayStream { url } => write!(f, "play stream {}", url),
        }
    }
}

/// Decides the action for the given invocation parameters
///
/// # Errors
///
/// - [`Error::UnknownMode`] for a mode other than `playlist` or `stream`
/// - [`Error::MissingParameter`] when `playlist` or `stream` come without `url`
pub fn decide(params: &RouteParams) -> Result<Action> {
    let Some(mode) = params.get(MODE_KEY) else {
        return Ok(Action::ShowChannels);
    };

    let url = || {
        params
            .get(URL_KEY)
            .cloned()
            .ok_or(Error::MissingParameter(URL_KEY))
    };

    match mode.as_str() {
        MODE_PLAYLIST => Ok(Action::ShowPlaylist { url: url()? }),
        MODE_STREAM => Ok(Action::PlayStream { url: url()? }),
        other => Err(Error::UnknownMode(other.to_string())),
    }
}
