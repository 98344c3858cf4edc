//! Cache Key Module
//!
//! Builds cache keys of the form `prefix:segment:...:payload`, where the
//! optional payload is a length-bounded base64 encoding of the request body.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const SEPARATOR: char = ':';

// == Cache Key ==
/// Builder for namespaced cache keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    buf: String,
}

impl CacheKey {
    /// Starts a key with a fixed namespace prefix such as `hint`.
    pub fn new(prefix: &str) -> Self {
        Self {
            buf: prefix.to_string(),
        }
    }

    /// Appends an identifying segment (user id, concept, level...).
    pub fn segment(mut self, part: impl AsRef<str>) -> Self {
        self.buf.push(SEPARATOR);
        self.buf.push_str(part.as_ref());
        self
    }

    /// Appends the base64 encoding of the concatenated `parts`, cut to at
    /// most `max_len` characters.
    pub fn payload(mut self, parts: &[&str], max_len: usize) -> Self {
        let joined: String = parts.concat();
        let mut encoded = STANDARD.encode(joined.as_bytes());
        // base64 output is ASCII, so byte truncation is char-safe
        encoded.truncate(max_len);

        self.buf.push(SEPARATOR);
        self.buf.push_str(&encoded);
        self
    }

    /// Finishes the key.
    pub fn build(self) -> String {
        self.buf
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.build()
    }
}
