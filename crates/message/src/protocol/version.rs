//! HTTP protocol version value type.

use std::fmt;
use std::str::FromStr;

use http::Version;
use serde::{Deserialize, Serialize};

use crate::protocol::HttpError;

/// The `major.minor` protocol version carried by every message.
///
/// Only used for display and for conversions; version negotiation happens
/// in the connection layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HttpVersion {
    pub major: u8,
    pub minor: u8,
}

impl HttpVersion {
    pub const HTTP_09: HttpVersion = HttpVersion::new(0, 9);
    pub const HTTP_10: HttpVersion = HttpVersion::new(1, 0);
    pub const HTTP_11: HttpVersion = HttpVersion::new(1, 1);
    pub const HTTP_2: HttpVersion = HttpVersion::new(2, 0);
    pub const HTTP_3: HttpVersion = HttpVersion::new(3, 0);

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl Default for HttpVersion {
    fn default() -> Self {
        Self::HTTP_11
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

/// Parses the version token of a request/status line, e.g. `HTTP/1.1` or `HTTP/2`.
impl FromStr for HttpVersion {
    type Err = HttpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HttpError::invalid_version(s);

        let numbers = s.strip_prefix("HTTP/").ok_or_else(invalid)?;
        let (major, minor) = match numbers.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (numbers, "0"),
        };

        let major = major.parse::<u8>().map_err(|_e| invalid())?;
        let minor = minor.parse::<u8>().map_err(|_e| invalid())?;
        Ok(Self::new(major, minor))
    }
}

impl From<Version> for HttpVersion {
    fn from(version: Version) -> Self {
        match version {
            Version::HTTP_09 => Self::HTTP_09,
            Version::HTTP_10 => Self::HTTP_10,
            Version::HTTP_2 => Self::HTTP_2,
            Version::HTTP_3 => Self::HTTP_3,
            // http::Version is non exhaustive, anything else is treated as http/1.1
            _ => Self::HTTP_11,
        }
    }
}

impl TryFrom<HttpVersion> for Version {
    type Error = HttpError;

    fn try_from(version: HttpVersion) -> Result<Self, Self::Error> {
        match (version.major, version.minor) {
            (0, 9) => Ok(Version::HTTP_09),
            (1, 0) => Ok(Version::HTTP_10),
            (1, 1) => Ok(Version::HTTP_11),
            (2, 0) => Ok(Version::HTTP_2),
            (3, 0) => Ok(Version::HTTP_3),
            _ => Err(HttpError::UnsupportedVersion(version)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(HttpVersion::HTTP_11.to_string(), "HTTP/1.1");
        assert_eq!(HttpVersion::HTTP_2.to_string(), "HTTP/2.0");
        assert_eq!(HttpVersion::new(1, 0).to_string(), "HTTP/1.0");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("HTTP/1.1".parse::<HttpVersion>().unwrap(), HttpVersion::HTTP_11);
        assert_eq!("HTTP/1.0".parse::<HttpVersion>().unwrap(), HttpVersion::HTTP_10);
        assert_eq!("HTTP/2".parse::<HttpVersion>().unwrap(), HttpVersion::HTTP_2);
    }

    #[test]
    fn test_from_invalid_str() {
        assert!(matches!("HTTP1.1".parse::<HttpVersion>(), Err(HttpError::InvalidVersion { .. })));
        assert!(matches!("HTTP/x.1".parse::<HttpVersion>(), Err(HttpError::InvalidVersion { .. })));
        assert!(matches!("HTTP/1.1.1".parse::<HttpVersion>(), Err(HttpError::InvalidVersion { .. })));
    }

    #[test]
    fn test_http_version_conversion() {
        assert_eq!(HttpVersion::from(Version::HTTP_10), HttpVersion::HTTP_10);
        assert_eq!(Version::try_from(HttpVersion::HTTP_11).unwrap(), Version::HTTP_11);
        assert_eq!(Version::try_from(HttpVersion::HTTP_3).unwrap(), Version::HTTP_3);

        let unknown = HttpVersion::new(1, 2);
        assert!(matches!(Version::try_from(unknown), Err(HttpError::UnsupportedVersion(v)) if v == unknown));
    }

    #[test]
    fn test_value_equality() {
        assert_eq!(HttpVersion::new(1, 1), HttpVersion::HTTP_11);
        assert_ne!(HttpVersion::HTTP_10, HttpVersion::HTTP_11);
        assert!(HttpVersion::HTTP_10 < HttpVersion::HTTP_11);
        assert_eq!(HttpVersion::default(), HttpVersion::HTTP_11);
    }
}
