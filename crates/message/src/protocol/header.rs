//! Ordered, case-insensitive HTTP header collection.
//!
//! Unlike [`http::HeaderMap`], [`Headers`] keeps every entry in the exact order it was
//! added, which is the order the serializer writes them on the wire. Names are
//! [`HeaderName`]s, so they are always stored lowercased; lookups by `&str` compare
//! ASCII-case-insensitively.
//!
//! Single-value accessors such as [`Headers::get`] and [`Headers::content_length`]
//! look at the *first* matching entry only.

use std::fmt;
use std::slice;

use http::header::{CONNECTION, CONTENT_LENGTH, TRANSFER_ENCODING};
use http::{HeaderMap, HeaderName, HeaderValue};

use crate::protocol::HeaderError;

/// Initial number of entries reserved by [`Headers::new`].
const INIT_HEADER_CAPACITY: usize = 16;

pub(crate) const CHUNKED: &str = "chunked";
pub(crate) const CLOSE: &str = "close";

#[derive(Clone, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(HeaderName, HeaderValue)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::with_capacity(INIT_HEADER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value of the first entry named `name`.
    pub fn get<N: AsRef<str>>(&self, name: N) -> Option<&HeaderValue> {
        let name = name.as_ref();
        self.entries.iter().find(|(n, _)| n.as_str().eq_ignore_ascii_case(name)).map(|(_, v)| v)
    }

    /// Like [`Headers::get`], but only if the value is visible ASCII.
    pub fn get_str<N: AsRef<str>>(&self, name: N) -> Option<&str> {
        self.get(name).and_then(|value| value.to_str().ok())
    }

    /// Returns every value stored for `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a HeaderValue> + 'a {
        self.entries.iter().filter(move |(n, _)| n.as_str().eq_ignore_ascii_case(name)).map(|(_, v)| v)
    }

    pub fn contains<N: AsRef<str>>(&self, name: N) -> bool {
        self.get(name).is_some()
    }

    /// Replaces the value of the first entry named `name`, or appends a new entry.
    ///
    /// Later entries with the same name are left untouched.
    pub fn set(&mut self, name: HeaderName, value: HeaderValue) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Leaves exactly one entry named `name`, holding `value`.
    ///
    /// The first entry keeps its position; later entries with the same name are dropped.
    pub fn set_single(&mut self, name: HeaderName, value: HeaderValue) {
        let mut value = Some(value);
        self.entries.retain_mut(|(n, v)| {
            if *n != name {
                return true;
            }
            match value.take() {
                Some(new) => {
                    *v = new;
                    true
                }
                None => false,
            }
        });
        if let Some(value) = value {
            self.entries.push((name, value));
        }
    }

    /// Parses `name` and `value`, then behaves like [`Headers::set`].
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError`] if the name is not a valid token or the value contains
    /// bytes not allowed in a header value.
    pub fn try_set(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(HeaderError::invalid_name)?;
        let value = HeaderValue::from_str(value).map_err(HeaderError::invalid_value)?;
        self.set(name, value);
        Ok(())
    }

    /// Appends an entry, keeping any existing values for the same name.
    pub fn append(&mut self, name: HeaderName, value: HeaderValue) {
        self.entries.push((name, value));
    }

    /// Removes every entry named `name`, returning the first removed value.
    pub fn remove<N: AsRef<str>>(&mut self, name: N) -> Option<HeaderValue> {
        let name = name.as_ref();
        let mut first = None;
        self.entries.retain(|(n, v)| {
            if !n.as_str().eq_ignore_ascii_case(name) {
                return true;
            }
            if first.is_none() {
                first = Some(v.clone());
            }
            false
        });
        first
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { inner: self.entries.iter() }
    }

    /// The first `Content-Length` value as an integer.
    ///
    /// A value that is not a valid non-negative integer is reported as absent.
    pub fn content_length(&self) -> Option<u64> {
        self.get(CONTENT_LENGTH).and_then(parse_length)
    }

    pub fn connection(&self) -> Option<&str> {
        self.get_str(CONNECTION)
    }

    pub fn transfer_encoding(&self) -> Option<&str> {
        self.get_str(TRANSFER_ENCODING)
    }

    /// Whether the first `Connection` entry carries the `close` token.
    pub fn is_connection_close(&self) -> bool {
        self.connection().is_some_and(|value| has_token(value, CLOSE))
    }

    /// Whether `chunked` is the final coding of the first `Transfer-Encoding` entry.
    pub fn is_chunked(&self) -> bool {
        self.transfer_encoding()
            .and_then(|value| value.rsplit(',').next())
            .is_some_and(|coding| coding.trim().eq_ignore_ascii_case(CHUNKED))
    }
}

/// A `Content-Length` value as an integer, surrounding whitespace allowed.
pub(crate) fn parse_length(value: &HeaderValue) -> Option<u64> {
    value.to_str().ok().and_then(|value| value.trim().parse::<u64>().ok())
}

/// Whether the comma separated `value` contains `token`, ignoring ASCII case.
pub(crate) fn has_token(value: &str, token: &str) -> bool {
    value.split(',').any(|t| t.trim().eq_ignore_ascii_case(token))
}

impl Default for Headers {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowing iterator over the entries of [`Headers`], in insertion order.
#[derive(Debug)]
pub struct Iter<'a> {
    inner: slice::Iter<'a, (HeaderName, HeaderValue)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a HeaderName, &'a HeaderValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(n, v)| (n, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a HeaderName, &'a HeaderValue);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Headers {
    type Item = (HeaderName, HeaderValue);
    type IntoIter = std::vec::IntoIter<(HeaderName, HeaderValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(HeaderName, HeaderValue)> for Headers {
    fn from_iter<T: IntoIterator<Item = (HeaderName, HeaderValue)>>(iter: T) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

/// Entries are taken in [`HeaderMap`] iteration order.
impl From<HeaderMap> for Headers {
    fn from(map: HeaderMap) -> Self {
        let mut headers = Headers::with_capacity(map.len());
        let mut last_name = None;
        for (name, value) in map {
            // `HeaderMap::into_iter` only yields the name for the first value of each key
            if let Some(name) = name {
                last_name = Some(name);
            }
            if let Some(name) = &last_name {
                headers.append(name.clone(), value);
            }
        }
        headers
    }
}

impl From<Headers> for HeaderMap {
    fn from(headers: Headers) -> Self {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            map.append(name, value);
        }
        map
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}: {}", name, String::from_utf8_lossy(value.as_bytes()))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
