//! Host runtime binding
//!
//! The media center drives the plugin through four calls: fill a directory,
//! tag its content type, close it, and resolve a playable item. [`Host`]
//! abstracts them so the menu and dispatch logic never depend on a concrete
//! runtime.
//!
//! [`JsonLinesHost`] is the binding used by the `eco99` binary: it writes each
//! call as one JSON object per line, for the runtime to replay.

use crate::error::Result;
use crate::menu::{DirectoryEntry, ListItem};
use serde::Serialize;
use std::io::Write;

/// Handle given by the host for the current invocation
pub type Handle = i32;

/// Calls the plugin makes on its host runtime
pub trait Host {
    /// Adds a batch of entries to the current directory
    fn add_directory_items(&mut self, handle: Handle, entries: Vec<DirectoryEntry>) -> Result<()>;

    /// Tags the directory content type (e.g. `musicvideos`)
    fn set_content(&mut self, handle: Handle, content: &str) -> Result<()>;

    /// Signals that the directory is complete
    fn end_of_directory(&mut self, handle: Handle) -> Result<()>;

    /// Hands a resolved item to the host player
    fn set_resolved_url(&mut self, handle: Handle, succeeded: bool, item: ListItem) -> Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
enum HostCall<'a> {
    AddDirectoryItems {
        handle: Handle,
        items: &'a [DirectoryEntry],
        total_items: usize,
    },
    SetContent {
        handle: Handle,
        content: &'a str,
    },
    EndOfDirectory {
        handle: Handle,
    },
    SetResolvedUrl {
        handle: Handle,
        succeeded: bool,
        item: &'a ListItem,
    },
}

/// Host binding writing one JSON object per call
///
/// ```
/// use eco99::host::{Host, JsonLinesHost};
///
/// let mut host = JsonLinesHost::new(Vec::new());
/// host.end_of_directory(3).unwrap();
/// let out = String::from_utf8(host.into_inner()).unwrap();
/// assert_eq!(out, "{\"call\":\"end_of_directory\",\"handle\":3}\n");
/// ```
#[derive(Debug)]
pub struct JsonLinesHost<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesHost<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, call: &HostCall<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, call)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Host for JsonLinesHost<W> {
    fn add_directory_items(&mut self, handle: Handle, entries: Vec<DirectoryEntry>) -> Result<()> {
        self.emit(&HostCall::AddDirectoryItems {
            handle,
            items: &entries,
            total_items: entries.len(),
        })
    }

    fn set_content(&mut self, handle: Handle, content: &str) -> Result<()> {
        self.emit(&HostCall::SetContent { handle, content })
    }

    fn end_of_directory(&mut self, handle: Handle) -> Result<()> {
        self.emit(&HostCall::EndOfDirectory { handle })
    }

    fn set_resolved_url(&mut self, handle: Handle, succeeded: bool, item: ListItem) -> Result<()> {
        self.emit(&HostCall::SetResolvedUrl {
            handle,
            succeeded,
            item: &item,
        })
    }
}

/// Host keeping every call in memory
///
/// Used by tests and by tools inspecting the menus without a media center.
#[derive(Debug, Default, Clone)]
pub struct RecordingHost {
    pub listings: Vec<(Handle, Vec<DirectoryEntry>)>,
    pub content: Vec<(Handle, String)>,
    pub ended: Vec<Handle>,
    pub resolved: Vec<(Handle, bool, ListItem)>,
}

impl RecordingHost {
    /// All listed entries, across batches
    pub fn entries(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.listings.iter().flat_map(|(_, entries)| entries.iter())
    }
}

impl Host for RecordingHost {
    fn add_directory_items(&mut self, handle: Handle, entries: Vec<DirectoryEntry>) -> Result<()> {
        self.listings.push((handle, entries));
        Ok(())
    }

    fn set_content(&mut self, handle: Handle, content: &str) -> Result<()> {
        self.content.push((handle, content.to_string()));
        Ok(())
    }

    fn end_of_directory(&mut self, handle: Handle) -> Result<()> {
        self.ended.push(handle);
        Ok(())
    }

    fn set_resolved_url(&mut self, handle: Handle, succeeded: bool, item: ListItem) -> Result<()> {
        self.resolved.push((handle, succeeded, item));
        Ok(())
    }
}
