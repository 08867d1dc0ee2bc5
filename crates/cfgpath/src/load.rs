//! Loading documents from files, with include processing.
//!
//! A base document may name sibling documents under a reserved top-level key
//! (`include` by default), either as one string or a list of strings. Each name
//! is resolved against the base document's directory with a fixed suffix
//! appended (`.yaml` by default), loaded on its own, and merged into the base in
//! the order listed. Included documents' own include keys are not followed.

use crate::error::{Error, Result};
use crate::merge::merge;
use cfgpath_yaml::{Mapping, Node};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where document bytes come from.
///
/// [`NativeFiles`] reads the filesystem; [`MemoryFiles`] serves documents from
/// memory for tests and for embedding configuration in a binary.
pub trait FileSource: Send + Sync {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads documents from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFiles;

impl FileSource for NativeFiles {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// An in-memory set of documents keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryFiles {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document (builder form).
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl FileSource for MemoryFiles {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such document: {}", path.display()),
            )
        })
    }
}

/// Options for loading a configuration from files.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Top-level key holding the include directive (default: `include`).
    pub include_key: String,

    /// Suffix appended to each include name to form its file name
    /// (default: `.yaml`).
    pub include_suffix: String,

    /// Path delimiter of the resulting [`Config`](crate::Config) (default: `.`).
    pub delimiter: char,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            include_key: "include".to_string(),
            include_suffix: ".yaml".to_string(),
            delimiter: crate::DEFAULT_DELIMITER,
        }
    }
}

/// Load `path` and merge in everything it includes.
pub(crate) fn load_with_includes(
    path: &Path,
    options: &LoadOptions,
    files: &dyn FileSource,
) -> Result<Mapping> {
    let mut root = load_document(path, files)?;
    debug!(path = %path.display(), keys = root.len(), "loaded configuration document");

    let includes = include_names(&root, path, &options.include_key)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    for name in includes {
        let include_path = base_dir.join(format!("{}{}", name, options.include_suffix));
        let overlay = load_document(&include_path, files)?;
        debug!(
            include = %include_path.display(),
            keys = overlay.len(),
            "merging included document"
        );
        merge(&mut root, overlay);
    }

    Ok(root)
}

/// Read and parse a single document, without include processing.
fn load_document(path: &Path, files: &dyn FileSource) -> Result<Mapping> {
    let bytes = files.read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let yaml_error = |source: cfgpath_yaml::Error| Error::Yaml {
        path: Some(path.to_path_buf()),
        source,
    };
    let text = cfgpath_yaml::decode(&bytes).map_err(yaml_error)?;
    let node = cfgpath_yaml::parse_file(text, &path.display().to_string()).map_err(yaml_error)?;

    root_mapping(node, Some(path))
}

/// The top-level mapping of a parsed document. A document with no content is an
/// empty mapping.
pub(crate) fn root_mapping(node: Node, path: Option<&Path>) -> Result<Mapping> {
    match node {
        Node::Mapping(map) => Ok(map),
        node if node.is_null() => Ok(Mapping::new()),
        other => Err(Error::RootNotMapping {
            path: path.map(Path::to_path_buf),
            found: other.kind(),
        }),
    }
}

/// Names listed under the include key, in declared order.
fn include_names(root: &Mapping, path: &Path, key: &str) -> Result<Vec<String>> {
    let invalid = |message: String| Error::InvalidInclude {
        path: path.to_path_buf(),
        key: key.to_string(),
        message,
    };

    match root.get(key) {
        None => Ok(Vec::new()),
        Some(Node::Sequence(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_str().map(str::to_owned).ok_or_else(|| {
                    invalid(format!("element {} is {}, expected string", index, item.kind()))
                })
            })
            .collect(),
        Some(node) => match node.as_str() {
            Some(name) => Ok(vec![name.to_string()]),
            None => Err(invalid(format!(
                "expected a string or a list of strings, found {}",
                node.kind()
            ))),
        },
    }
}
