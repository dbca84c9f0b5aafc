//! Source markup for the video element
//!
//! Every source URL gets a cache-busting token. Without it some browsers
//! refuse to load the same file a second time in one page.

use crate::player::VideoSource;
use std::time::{SystemTime, UNIX_EPOCH};

/// Shown inside the video element when none of the sources can be played
pub const UNSUPPORTED_MESSAGE: &str = "This browser cannot play .mp4, .ogg, or .webm files. \
Try using a different browser, such as Google Chrome.";

/// Produces cache-busting tokens
pub trait CacheBuster: Send {
    fn next_token(&mut self) -> u64;
}

/// Millisecond wall-clock tokens, strictly increasing even within one millisecond
#[derive(Debug, Default)]
pub struct TimestampCacheBuster {
    last: u64,
}

impl TimestampCacheBuster {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheBuster for TimestampCacheBuster {
    fn next_token(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.last = now.max(self.last + 1);
        self.last
    }
}

/// One `<source>` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTag {
    pub format: String,
    /// URL including the cache-busting token
    pub src: String,
}

impl SourceTag {
    pub fn to_html(&self) -> String {
        format!("<source src=\"{}\" />", self.src.replace('"', "&quot;"))
    }
}

/// Sources plus fallback content for the video element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMarkup {
    pub tags: Vec<SourceTag>,
    pub fallback_message: String,
}

impl SourceMarkup {
    /// Build markup for `sources`, in order, one token per source
    pub fn build(sources: &[VideoSource], buster: &mut dyn CacheBuster) -> Self {
        let tags = sources
            .iter()
            .map(|source| SourceTag {
                format: source.format.clone(),
                src: with_cache_buster(&source.url, buster.next_token()),
            })
            .collect();

        Self {
            tags,
            fallback_message: UNSUPPORTED_MESSAGE.to_string(),
        }
    }

    /// Index of the last source; an error on it means nothing could play
    pub fn last_index(&self) -> Option<usize> {
        self.tags.len().checked_sub(1)
    }

    /// Inner HTML of the video element
    pub fn to_html(&self) -> String {
        let mut html: String = self.tags.iter().map(SourceTag::to_html).collect();
        html.push_str(&self.fallback_message);
        html
    }
}

/// Append `token` as a query parameter, keeping any existing query intact
pub fn with_cache_buster(url: &str, token: u64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, token)
}
