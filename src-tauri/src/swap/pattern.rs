use std::{
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use url::Url;

/// Characters a URL parser escapes inside a single path segment. A literal
/// `%` is left alone by parsers, so it is left alone here too.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub(crate) fn encode_path_segment(segment: &str) -> Cow<'_, str> {
    utf8_percent_encode(segment, PATH_SEGMENT).into()
}

pub(crate) fn decode_path_segment(segment: &str) -> Cow<'_, str> {
    percent_decode_str(segment).decode_utf8_lossy()
}

/// URL glob of the form `*://host/path` or `*://host/path?*`.
///
/// The `*` scheme stands for `http` and `https`. A trailing `?*` accepts any
/// query string; without it the request must carry no query at all.
#[derive(Clone)]
pub(crate) struct MatchPattern {
    raw: String,
    host: String,
    path_regex: Regex,
}

impl MatchPattern {
    /// `encoded_path` must already be percent-encoded and start with `/`.
    pub(crate) fn new(host: &str, encoded_path: &str, any_query: bool) -> Self {
        let host = host.to_ascii_lowercase();
        let raw = if any_query {
            format!("*://{host}{encoded_path}?*")
        } else {
            format!("*://{host}{encoded_path}")
        };
        let query = if any_query { r"(\?.*)?" } else { "" };
        let source = format!("^{}{query}$", regex::escape(encoded_path));
        // Safe because every literal part went through `regex::escape`.
        let path_regex = Regex::new(&source).expect("escaped swap path is a valid regex");

        Self {
            raw,
            host,
            path_regex,
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.raw
    }

    pub(crate) fn host(&self) -> &str {
        &self.host
    }

    /// Regex over `pathname + search`, shared with the in-page request shim.
    pub(crate) fn path_regex_source(&self) -> &str {
        self.path_regex.as_str()
    }

    pub(crate) fn is_match(&self, url: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        if url.host_str() != Some(self.host.as_str()) {
            return false;
        }
        self.path_regex.is_match(&path_and_query(url))
    }
}

pub(crate) fn path_and_query(url: &Url) -> Cow<'_, str> {
    match url.query() {
        Some(query) => Cow::Owned(format!("{}?{query}", url.path())),
        None => Cow::Borrowed(url.path()),
    }
}

impl fmt::Debug for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MatchPattern").field(&self.raw).finish()
    }
}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for MatchPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for MatchPattern {}

impl Hash for MatchPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}
