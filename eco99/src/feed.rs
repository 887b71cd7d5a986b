//! Attribute-aware XML to tree conversion for RSS feeds
//!
//! The parser turns a document into nested [`FeedNode`]s:
//!
//! - every element becomes a key of its parent map (qualified names such as
//!   `itunes:summary` are kept as written),
//! - repeated sibling elements become a [`FeedNode::List`] in document order,
//! - attributes are stored under `@name` keys,
//! - text of an element that also has attributes or children is stored
//!   under `#text`, text-only elements become [`FeedNode::Text`],
//! - empty elements become [`FeedNode::Empty`].
//!
//! ```
//! use eco99::feed::parse_feed;
//!
//! let root = parse_feed(r#"<rss><item><enclosure url="http://a/b"/></item></rss>"#).unwrap();
//! let url = root.path(&["rss", "item", "enclosure", "@url"]).and_then(|n| n.as_text());
//! assert_eq!(url, Some("http://a/b"));
//! ```

use crate::error::{Error, Result};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Error as XmlError, Reader};
use std::collections::BTreeMap;
use tracing::debug;

/// Prefix of attribute keys
pub const ATTRIBUTE_PREFIX: char = '@';

/// Key holding the text of mixed elements
pub const TEXT_KEY: &str = "#text";

/// A node of a parsed feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedNode {
    /// Element without text, attributes or children
    Empty,
    /// Text-only element, or attribute value
    Text(String),
    /// Repeated sibling elements, in document order
    List(Vec<FeedNode>),
    /// Element with attributes and/or children
    Map(BTreeMap<String, FeedNode>),
}

impl FeedNode {
    /// Child of a map node
    ///
    /// On a list, the lookup is done on the first element.
    pub fn get(&self, key: &str) -> Option<&FeedNode> {
        match self {
            FeedNode::Map(map) => map.get(key),
            FeedNode::List(items) => items.first().and_then(|first| first.get(key)),
            _ => None,
        }
    }

    /// Follows a path of keys from this node
    pub fn path(&self, keys: &[&str]) -> Option<&FeedNode> {
        keys.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Text content of the node
    ///
    /// Empty elements read as `""`; a map exposes its `#text` entry.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeedNode::Empty => Some(""),
            FeedNode::Text(text) => Some(text),
            FeedNode::Map(map) => map.get(TEXT_KEY).and_then(FeedNode::as_text),
            FeedNode::List(_) => None,
        }
    }

    /// Children under `key` as a sequence
    ///
    /// A single child is returned as a one-element sequence and a missing key
    /// as an empty one, so callers can always iterate.
    pub fn children(&self, key: &str) -> Vec<&FeedNode> {
        match self.get(key) {
            Some(FeedNode::List(items)) => items.iter().collect(),
            Some(node) => vec![node],
            None => Vec::new(),
        }
    }

    /// Whether this node is a list of repeated elements
    pub fn is_list(&self) -> bool {
        matches!(self, FeedNode::List(_))
    }

    fn insert_child(map: &mut BTreeMap<String, FeedNode>, key: String, value: FeedNode) {
        match map.get_mut(&key) {
            Some(FeedNode::List(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::replace(existing, FeedNode::Empty);
                *existing = FeedNode::List(vec![first, value]);
            }
            None => {
                map.insert(key, value);
            }
        }
    }
}

/// Element being built while its content is read
#[derive(Debug, Default)]
struct Frame {
    name: String,
    children: BTreeMap<String, FeedNode>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut children = BTreeMap::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::parse(format!("bad attribute in <{name}>: {e}")))?;
            let key = format!(
                "{}{}",
                ATTRIBUTE_PREFIX,
                String::from_utf8_lossy(attr.key.as_ref())
            );
            let value = attr.decode_and_unescape_value(reader.decoder())?;
            children.insert(key, FeedNode::Text(value.into_owned()));
        }

        Ok(Self {
            name,
            children,
            text: String::new(),
        })
    }

    fn close(self) -> (String, FeedNode) {
        let text = self.text.trim();
        let node = if self.children.is_empty() {
            if text.is_empty() {
                FeedNode::Empty
            } else {
                FeedNode::Text(text.to_string())
            }
        } else {
            let mut children = self.children;
            if !text.is_empty() {
                children.insert(TEXT_KEY.to_string(), FeedNode::Text(text.to_string()));
            }
            FeedNode::Map(children)
        };
        (self.name, node)
    }
}

/// Parses a feed document into a tree rooted at an unnamed map
///
/// The returned node has a single key: the name of the document element.
///
/// # Errors
///
/// [`Error::Parse`] when the document is not well-formed (mismatched or
/// unclosed tags, invalid attributes, text outside of the root element, no
/// root element at all).
pub fn parse_feed(xml: &str) -> Result<FeedNode> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, FeedNode)> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::parse(format!(
                "{} at byte {}",
                e,
                reader.error_position()
            ))
        })?;

        match event {
            Event::Start(e) => {
                if root.is_some() {
                    return Err(Error::parse("more than one root element"));
                }
                stack.push(Frame::open(&e, &reader)?);
            }
            Event::Empty(e) => {
                if root.is_some() {
                    return Err(Error::parse("more than one root element"));
                }
                let frame = Frame::open(&e, &reader)?;
                close_frame(frame, &mut stack, &mut root);
            }
            Event::End(_) => {
                // quick-xml checks that end names match their start tags
                let frame = stack
                    .pop()
                    .ok_or_else(|| Error::parse("closing tag without opening tag"))?;
                close_frame(frame, &mut stack, &mut root);
            }
            Event::Text(e) => {
                let text = e.decode().map_err(XmlError::Encoding)?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e);
                push_text(&mut stack, &text)?;
            }
            Event::GeneralRef(e) => {
                let name = e.decode().map_err(XmlError::Encoding)?;
                let resolved = match e.resolve_char_ref().ok().flatten() {
                    Some(ch) => ch.to_string(),
                    None => match resolve_predefined_entity(&name) {
                        Some(value) => value.to_string(),
                        None => return Err(Error::parse(format!("undefined entity &{name};"))),
                    },
                };
                push_text(&mut stack, &resolved)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::parse(format!("unclosed element <{}>", open.name)));
    }

    let (name, node) = root.ok_or_else(|| Error::parse("document has no root element"))?;
    debug!("Parsed feed with root element <{}>", name);

    let mut top = BTreeMap::new();
    top.insert(name, node);
    Ok(FeedNode::Map(top))
}

fn close_frame(frame: Frame, stack: &mut [Frame], root: &mut Option<(String, FeedNode)>) {
    let (name, node) = frame.close();
    match stack.last_mut() {
        Some(parent) => FeedNode::insert_child(&mut parent.children, name, node),
        None => *root = Some((name, node)),
    }
}

fn push_text(stack: &mut [Frame], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(frame) => {
            frame.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(Error::parse("text outside of the root element")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
  <channel>
    <title>Channels</title>
    <item>
      <title>First</title>
      <description><![CDATA[<img src='http://x/1.jpg'/>]]></description>
      <itunes:summary>Rock &amp; roll</itunes:summary>
      <enclosure url="http://cdn/1.m3u8" type="audio/mpegurl"/>
    </item>
    <item>
      <title>Second</title>
      <itunes:summary/>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_repeated_siblings_become_list() {
        let root = parse_feed(FEED).unwrap();
        let channel = root.path(&["rss", "channel"]).unwrap();
        assert!(channel.get("item").unwrap().is_list());

        let items = channel.children("item");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get("title").unwrap().as_text(), Some("First"));
        assert_eq!(items[1].get("title").unwrap().as_text(), Some("Second"));
    }

    #[test]
    fn test_attributes_use_at_prefix() {
        let root = parse_feed(FEED).unwrap();
        assert_eq!(
            root.path(&["rss", "@version"]).unwrap().as_text(),
            Some("2.0")
        );
        let items = root.path(&["rss", "channel"]).unwrap().children("item");
        let enclosure = items[0].get("enclosure").unwrap();
        assert_eq!(enclosure.get("@url").unwrap().as_text(), Some("http://cdn/1.m3u8"));
        assert_eq!(enclosure.get("url"), None);
    }

    #[test]
    fn test_cdata_entities_and_empty_elements() {
        let root = parse_feed(FEED).unwrap();
        let items = root.path(&["rss", "channel"]).unwrap().children("item");
        assert_eq!(
            items[0].get("description").unwrap().as_text(),
            Some("<img src='http://x/1.jpg'/>")
        );
        assert_eq!(
            items[0].get("itunes:summary").unwrap().as_text(),
            Some("Rock & roll")
        );
        assert_eq!(items[1].get("itunes:summary"), Some(&FeedNode::Empty));
        assert_eq!(items[1].get("itunes:summary").unwrap().as_text(), Some(""));
    }

    #[test]
    fn test_character_references() {
        let root = parse_feed("<a>caf&#233; &#x41;</a>").unwrap();
        assert_eq!(root.get("a").unwrap().as_text(), Some("café A"));
    }

    #[test]
    fn test_mixed_content_goes_to_text_key() {
        let root = parse_feed(r#"<a kind="k">hello</a>"#).unwrap();
        let a = root.get("a").unwrap();
        assert_eq!(a.get(TEXT_KEY).unwrap().as_text(), Some("hello"));
        assert_eq!(a.as_text(), Some("hello"));
    }

    #[test]
    fn test_single_child_iterates_as_one() {
        let root = parse_feed("<rss><channel><item><title>t</title></item></channel></rss>").unwrap();
        let channel = root.path(&["rss", "channel"]).unwrap();
        assert!(!channel.get("item").unwrap().is_list());
        assert_eq!(channel.children("item").len(), 1);
        assert!(channel.children("missing").is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        for xml in [
            "<rss><channel></rss>",
            "<rss><channel>",
            "",
            "just text",
            "<a></a><b></b>",
            r#"<a x="1" x="2"></a>"#,
            "<a>x&nbsp;y</a>",
        ] {
            let err = parse_feed(xml).unwrap_err();
            assert!(matches!(err, Error::Parse(_)), "{xml:?} gave {err}");
        }
    }
}
