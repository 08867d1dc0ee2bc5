//! Error types for YAML loading.

use std::fmt;
use thiserror::Error;
use yaml_rust2::scanner::Marker;

/// Result type alias for cfgpath-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A position in the source text.
///
/// Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    /// File the text came from, when known
    pub file: Option<String>,
    pub line: usize,
    pub col: usize,
}

impl Location {
    pub(crate) fn from_marker(marker: &Marker, file: Option<&str>) -> Self {
        Self {
            file: file.map(str::to_owned),
            line: marker.line(),
            col: marker.col() + 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.col),
            None => write!(f, "line {}, column {}", self.line, self.col),
        }
    }
}

/// Errors that can occur while loading YAML into a [`Node`](crate::Node) tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// YAML syntax error reported by the scanner
    #[error("YAML syntax error at {location}: {message}")]
    ParseError { message: String, location: Location },

    /// Well-formed YAML that cannot be represented as a node tree
    #[error("invalid YAML structure at {location}: {message}")]
    InvalidStructure { message: String, location: Location },

    /// The same key appears twice in one mapping
    #[error("duplicate mapping key `{key}` at {location}")]
    DuplicateKey { key: String, location: Location },

    /// An alias (`*name`) that refers to no preceding anchor
    #[error("alias at {location} refers to an unknown anchor")]
    UnknownAlias { location: Location },

    /// Input bytes are not UTF-8
    #[error("document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

impl Error {
    /// Source position of the error, if it has one.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Error::ParseError { location, .. }
            | Error::InvalidStructure { location, .. }
            | Error::DuplicateKey { location, .. }
            | Error::UnknownAlias { location } => Some(location),
            Error::InvalidUtf8(_) => None,
        }
    }

    pub(crate) fn from_scan(err: &yaml_rust2::ScanError, file: Option<&str>) -> Self {
        Error::ParseError {
            message: err.info().to_string(),
            location: Location::from_marker(err.marker(), file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let loc = Location {
            file: None,
            line: 3,
            col: 7,
        };
        assert_eq!(loc.to_string(), "line 3, column 7");

        let loc = Location {
            file: Some("app.yaml".into()),
            line: 3,
            col: 7,
        };
        assert_eq!(loc.to_string(), "app.yaml:3:7");
    }

    #[test]
    fn test_duplicate_key_message() {
        let err = Error::DuplicateKey {
            key: "port".into(),
            location: Location {
                file: Some("db.yaml".into()),
                line: 4,
                col: 1,
            },
        };
        assert_eq!(err.to_string(), "duplicate mapping key `port` at db.yaml:4:1");
        assert_eq!(err.location().map(|l| l.line), Some(4));
    }
}
