//! Errors for loading and querying configuration.

use crate::path::PathError;
use crate::resolve::ResolveError;
use cfgpath_yaml::NodeKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for cfgpath operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`Config`](crate::Config) lookups and loading.
#[derive(Debug, Error)]
pub enum Error {
    /// The path string itself is malformed.
    #[error(transparent)]
    Path(#[from] PathError),

    /// The path does not lead to a node.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The resolved node has the wrong type for the accessor.
    #[error("value of `{key}` is not {expected} (found {found})")]
    Coerce {
        key: String,
        expected: &'static str,
        found: NodeKind,
    },

    /// An array accessor resolved to something other than a sequence.
    #[error("value of `{key}` is not a sequence of {expected} values (found {found})")]
    CoerceArray {
        key: String,
        expected: &'static str,
        found: NodeKind,
    },

    /// One element of a sequence has the wrong type.
    #[error("some value in key `{key}` is not {expected} (element {index} is {found})")]
    CoerceElement {
        key: String,
        index: usize,
        expected: &'static str,
        found: NodeKind,
    },

    /// A document could not be read.
    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A document is not valid YAML.
    #[error("failed to parse {}: {source}", describe(path.as_deref()))]
    Yaml {
        path: Option<PathBuf>,
        source: cfgpath_yaml::Error,
    },

    /// A document's top level is not a mapping.
    #[error("top level of {} must be a mapping (found {found})", describe(path.as_deref()))]
    RootNotMapping {
        path: Option<PathBuf>,
        found: NodeKind,
    },

    /// The include directive has the wrong shape.
    #[error("unrecognized value of `{key}` in `{}`: {message}", path.display())]
    InvalidInclude {
        path: PathBuf,
        key: String,
        message: String,
    },
}

impl Error {
    /// True for errors meaning "nothing at that path", as opposed to a value of
    /// the wrong type or a malformed path.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Resolve(ResolveError::KeyNotFound { .. } | ResolveError::IndexOutOfRange { .. })
        )
    }
}

fn describe(path: Option<&Path>) -> String {
    match path {
        Some(path) => format!("`{}`", path.display()),
        None => "document".to_string(),
    }
}
