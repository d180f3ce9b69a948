use std::convert::Infallible;
use std::io;
use thiserror::Error;

use crate::protocol::HttpVersion;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("header error: {source}")]
    Header {
        #[from]
        source: HeaderError,
    },

    #[error("body error: {source}")]
    Body {
        #[from]
        source: BodyError,
    },

    #[error("invalid http version: {reason}")]
    InvalidVersion { reason: String },

    #[error("unsupported http version: {0}")]
    UnsupportedVersion(HttpVersion),
}

impl HttpError {
    pub fn invalid_version<S: ToString>(str: S) -> Self {
        Self::InvalidVersion { reason: str.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("invalid header name: {reason}")]
    InvalidName { reason: String },

    #[error("invalid header value: {reason}")]
    InvalidValue { reason: String },
}

impl HeaderError {
    pub fn invalid_name<S: ToString>(str: S) -> Self {
        Self::InvalidName { reason: str.to_string() }
    }

    pub fn invalid_value<S: ToString>(str: S) -> Self {
        Self::InvalidValue { reason: str.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum BodyError {
    #[error("stream body error: {reason}")]
    Stream { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl BodyError {
    pub fn stream<S: ToString>(str: S) -> Self {
        Self::Stream { reason: str.to_string() }
    }
}

impl From<Infallible> for BodyError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Headers;

    fn set_header(headers: &mut Headers, name: &str, value: &str) -> Result<(), HttpError> {
        headers.try_set(name, value)?;
        Ok(())
    }

    fn fail_body() -> Result<(), HttpError> {
        let chunk: Result<(), BodyError> = Err(BodyError::stream("peer reset"));
        chunk?;
        Ok(())
    }

    #[test]
    fn header_error_converts_with_question_mark() {
        let mut headers = Headers::new();
        assert!(set_header(&mut headers, "x-id", "1").is_ok());

        let error = set_header(&mut headers, "bad name", "1").unwrap_err();
        assert!(matches!(error, HttpError::Header { source: HeaderError::InvalidName { .. } }));
        assert!(error.to_string().starts_with("header error: invalid header name"));
        assert_eq!(headers.get_str("x-id"), Some("1"));
    }

    #[test]
    fn body_error_converts_with_question_mark() {
        let error = fail_body().unwrap_err();
        assert!(matches!(error, HttpError::Body { source: BodyError::Stream { .. } }));
        assert_eq!(error.to_string(), "body error: stream body error: peer reset");
    }

    #[test]
    fn io_error_converts_into_body_error() {
        let error = BodyError::from(io::Error::other("boom"));
        assert_eq!(error.to_string(), "io error: boom");
    }
}
