//! Text link tokenization.
//!
//! Splits note text into plain-text and URL segments for presentation
//! layers that render links as tappable. Lossless: concatenating the
//! segment values reproduces the input exactly.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("static URL pattern must compile"));

/// One segment of tokenized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text between links.
    Text(String),
    /// An `http(s)://` URL.
    Link(String),
}

impl Segment {
    /// The raw text of this segment.
    pub fn value(&self) -> &str {
        match self {
            Segment::Text(v) | Segment::Link(v) => v,
        }
    }

    /// Whether this segment is a link.
    pub fn is_link(&self) -> bool {
        matches!(self, Segment::Link(_))
    }
}

/// Split `text` into an ordered sequence of text and link segments.
///
/// Every character of the input appears in exactly one segment, in
/// original order, with no overlap and no loss. Empty segments are
/// omitted, so `tokenize("")` yields no segments.
pub fn tokenize(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for m in URL_PATTERN.find_iter(text) {
        if m.start() > last_end {
            segments.push(Segment::Text(text[last_end..m.start()].to_string()));
        }
        segments.push(Segment::Link(m.as_str().to_string()));
        last_end = m.end();
    }

    if last_end < text.len() {
        segments.push(Segment::Text(text[last_end..].to_string()));
    }

    segments
}
