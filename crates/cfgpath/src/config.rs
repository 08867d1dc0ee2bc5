//! The configuration accessor.
//!
//! [`Config`] owns a merged mapping tree and answers path queries against it.
//! Every lookup parses the path, resolves it, then coerces the result; typed
//! accessors differ only in the coercion. The `get_default_*` forms swallow any
//! error and return the caller's fallback instead.
//!
//! The tree is never modified after construction, so a `Config` can be shared
//! freely between threads (`&Config` is all a lookup needs).

use crate::coerce::FromNode;
use crate::error::{Error, Result};
use crate::load::{self, FileSource, LoadOptions, NativeFiles};
use crate::path::Path;
use crate::resolve::resolve;
use cfgpath_yaml::{Mapping, Node};
use std::str::FromStr;

/// Delimiter between path segments unless configured otherwise.
pub const DEFAULT_DELIMITER: char = '.';

/// A loaded configuration tree with path-addressed, typed lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Always a mapping.
    root: Node,
    delimiter: char,
}

impl Config {
    /// Wrap an already-built mapping.
    pub fn from_mapping(root: Mapping) -> Self {
        Config {
            root: Node::Mapping(root),
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Wrap a node tree; the top level must be a mapping (or null, meaning empty).
    pub fn from_node(root: Node) -> Result<Self> {
        load::root_mapping(root, None).map(Config::from_mapping)
    }

    /// Parse a YAML document. Include directives are not processed.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let node = cfgpath_yaml::parse(text).map_err(|source| Error::Yaml { path: None, source })?;
        Config::from_node(node)
    }

    /// Parse raw document bytes, stripping a byte-order mark. Include directives
    /// are not processed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let node =
            cfgpath_yaml::parse_bytes(bytes).map_err(|source| Error::Yaml { path: None, source })?;
        Config::from_node(node)
    }

    /// Load a document from disk and merge in its includes.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Config::from_file_with(path, &LoadOptions::default(), &NativeFiles)
    }

    /// Load a document through `files` with explicit options.
    pub fn from_file_with(
        path: impl AsRef<std::path::Path>,
        options: &LoadOptions,
        files: &dyn FileSource,
    ) -> Result<Self> {
        let root = load::load_with_includes(path.as_ref(), options, files)?;
        Ok(Config::from_mapping(root).with_delimiter(options.delimiter))
    }

    /// Use `delimiter` to split path segments.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// The whole tree. Always a mapping.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Parse `path` with this config's delimiter.
    pub fn parse_path(&self, path: &str) -> Result<Path> {
        Ok(Path::parse(path, self.delimiter)?)
    }

    /// Resolve `path` to a node.
    ///
    /// ```rust
    /// use cfgpath::Config;
    ///
    /// let config = Config::from_yaml("db: {ports: [80, 443]}").unwrap();
    /// assert_eq!(config.get("db.ports[1]").unwrap().as_i64(), Some(443));
    /// ```
    pub fn get(&self, path: &str) -> Result<&Node> {
        let parsed = self.parse_path(path)?;
        Ok(resolve(&self.root, &parsed)?)
    }

    /// True if `path` resolves to a node.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    /// Resolve `path` and coerce the result into `T`.
    pub fn get_as<T: FromNode>(&self, path: &str) -> Result<T> {
        let node = self.get(path)?;
        T::from_node(node).ok_or_else(|| Error::Coerce {
            key: path.to_string(),
            expected: T::EXPECTED,
            found: node.kind(),
        })
    }

    /// Resolve `path` to a sequence and coerce every element into `T`.
    ///
    /// Fails on the first element that does not coerce; there are no partial
    /// results.
    pub fn get_array_as<T: FromNode>(&self, path: &str) -> Result<Vec<T>> {
        let node = self.get(path)?;
        let Node::Sequence(items) = node else {
            return Err(Error::CoerceArray {
                key: path.to_string(),
                expected: T::EXPECTED,
                found: node.kind(),
            });
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                T::from_node(item).ok_or_else(|| Error::CoerceElement {
                    key: path.to_string(),
                    index,
                    expected: T::EXPECTED,
                    found: item.kind(),
                })
            })
            .collect()
    }

    /// [`get_as`](Config::get_as), falling back to `default` on any error.
    pub fn get_or<T: FromNode>(&self, path: &str, default: T) -> T {
        match self.get_as(path) {
            Ok(value) => value,
            Err(e) => {
                tracing::trace!(path, error = %e, "using default value");
                default
            }
        }
    }

    /// [`get_array_as`](Config::get_array_as), falling back to `default` on any
    /// error.
    pub fn get_array_or<T: FromNode>(&self, path: &str, default: Vec<T>) -> Vec<T> {
        match self.get_array_as(path) {
            Ok(values) => values,
            Err(e) => {
                tracing::trace!(path, error = %e, "using default value");
                default
            }
        }
    }

    pub fn get_string(&self, path: &str) -> Result<String> {
        self.get_as(path)
    }

    pub fn get_default_string(&self, path: &str, default: &str) -> String {
        self.get_or(path, default.to_string())
    }

    pub fn get_string_array(&self, path: &str) -> Result<Vec<String>> {
        self.get_array_as(path)
    }

    pub fn get_default_string_array(&self, path: &str, default: Vec<String>) -> Vec<String> {
        self.get_array_or(path, default)
    }

    pub fn get_int(&self, path: &str) -> Result<i64> {
        self.get_as(path)
    }

    pub fn get_default_int(&self, path: &str, default: i64) -> i64 {
        self.get_or(path, default)
    }

    pub fn get_int_array(&self, path: &str) -> Result<Vec<i64>> {
        self.get_array_as(path)
    }

    pub fn get_default_int_array(&self, path: &str, default: Vec<i64>) -> Vec<i64> {
        self.get_array_or(path, default)
    }

    pub fn get_bool(&self, path: &str) -> Result<bool> {
        self.get_as(path)
    }

    pub fn get_default_bool(&self, path: &str, default: bool) -> bool {
        self.get_or(path, default)
    }

    pub fn get_bool_array(&self, path: &str) -> Result<Vec<bool>> {
        self.get_array_as(path)
    }

    pub fn get_default_bool_array(&self, path: &str, default: Vec<bool>) -> Vec<bool> {
        self.get_array_or(path, default)
    }

    pub fn get_float(&self, path: &str) -> Result<f64> {
        self.get_as(path)
    }

    pub fn get_default_float(&self, path: &str, default: f64) -> f64 {
        self.get_or(path, default)
    }

    pub fn get_float_array(&self, path: &str) -> Result<Vec<f64>> {
        self.get_array_as(path)
    }

    pub fn get_default_float_array(&self, path: &str, default: Vec<f64>) -> Vec<f64> {
        self.get_array_or(path, default)
    }

    /// One level of the mapping at `path`; nested values stay untyped nodes.
    pub fn get_map(&self, path: &str) -> Result<Mapping> {
        self.get_as(path)
    }

    pub fn get_default_map(&self, path: &str, default: Mapping) -> Mapping {
        self.get_or(path, default)
    }

    /// Keys of the mapping at `path`, in document order.
    ///
    /// A path that resolves to anything other than a mapping yields no keys
    /// rather than an error.
    pub fn get_sub_keys(&self, path: &str) -> Result<Vec<String>> {
        let node = self.get(path)?;
        Ok(node
            .as_mapping()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default())
    }

    /// Number of entries (mapping) or items (sequence) at `path`; 0 for scalars.
    pub fn len(&self, path: &str) -> Result<usize> {
        Ok(self.get(path)?.len().unwrap_or(0))
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Config::from_yaml(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ResolveError;
    use cfgpath_yaml::NodeKind;
    use pretty_assertions::assert_eq;

    fn config() -> Config {
        r#"
db:
  host: localhost
  ports: [80, 443]
  timeout: "30"
  ratio: 0.75
  enabled: "true"
  weights: [1, 2.5, "3"]
  flags: [true, "F", "1"]
  mixed: [1, two]
  names: [a, b]
empty_map: {}
"#
        .parse()
        .unwrap()
    }

    #[test]
    fn test_string_accessor() {
        let config = config();
        assert_eq!(config.get_string("db.host").unwrap(), "localhost");
        let err = config.get_string("db.ports").unwrap_err();
        assert!(matches!(
            err,
            Error::Coerce {
                expected: "string",
                found: NodeKind::Sequence,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "value of `db.ports` is not string (found sequence)"
        );
    }

    #[test]
    fn test_int_accessor() {
        let config = config();
        assert_eq!(config.get_int("db.ports[0]").unwrap(), 80);
        assert_eq!(config.get_int("db.timeout").unwrap(), 30);
        assert!(config.get_int("db.ratio").is_err());
        assert!(config.get_int("db.host").is_err());
    }

    #[test]
    fn test_float_and_bool_accessors() {
        let config = config();
        assert_eq!(config.get_float("db.ratio").unwrap(), 0.75);
        assert_eq!(config.get_float("db.ports[1]").unwrap(), 443.0);
        assert!(config.get_bool("db.enabled").unwrap());
        assert!(config.get_bool("db.host").is_err());
    }

    #[test]
    fn test_array_accessors() {
        let config = config();
        assert_eq!(config.get_int_array("db.ports").unwrap(), vec![80, 443]);
        assert_eq!(
            config.get_float_array("db.weights").unwrap(),
            vec![1.0, 2.5, 3.0]
        );
        assert_eq!(
            config.get_bool_array("db.flags").unwrap(),
            vec![true, false, true]
        );
        assert_eq!(config.get_string_array("db.names").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_array_element_failure_aborts() {
        let config = config();
        let err = config.get_int_array("db.mixed").unwrap_err();
        match err {
            Error::CoerceElement {
                key,
                index,
                expected,
                found,
            } => {
                assert_eq!(key, "db.mixed");
                assert_eq!(index, 1);
                assert_eq!(expected, "integer");
                assert_eq!(found, NodeKind::String);
            }
            other => panic!("expected CoerceElement, got {other:?}"),
        }
    }

    #[test]
    fn test_array_accessor_on_scalar() {
        let err = config().get_string_array("db.host").unwrap_err();
        assert!(matches!(err, Error::CoerceArray { found: NodeKind::String, .. }));
    }

    #[test]
    fn test_defaults_never_fail() {
        let config = config();
        assert_eq!(config.get_default_int("missing.key", 42), 42);
        assert_eq!(config.get_default_int("db.host", 7), 7);
        assert_eq!(config.get_default_int("[0]", 9), 9);
        assert_eq!(config.get_default_int("db.ports[0]", 1), 80);
        assert_eq!(config.get_default_string("db.nope", "x"), "x");
        assert!(config.get_default_bool("db.enabled", false));
        assert_eq!(config.get_default_float("db.ports[5]", 1.5), 1.5);
        assert_eq!(
            config.get_default_int_array("db.mixed", vec![0]),
            vec![0]
        );
        assert_eq!(
            config.get_default_string_array("db.names", Vec::new()),
            vec!["a", "b"]
        );
        assert_eq!(config.get_default_bool_array("", vec![true]), vec![true]);
        assert_eq!(config.get_default_float_array("db", vec![]), Vec::<f64>::new());
        assert!(config.get_default_map("db.host", Mapping::new()).is_empty());
    }

    #[test]
    fn test_map_accessor() {
        let config = config();
        let db = config.get_map("db").unwrap();
        assert_eq!(db.len(), 9);
        assert!(db["ports"].is_sequence());
        assert!(config.get_map("db.host").is_err());
        assert!(config.get_map("empty_map").unwrap().is_empty());
    }

    #[test]
    fn test_sub_keys() {
        let config = config();
        assert_eq!(
            config.get_sub_keys("").unwrap_err().to_string(),
            "key should not be empty"
        );
        assert_eq!(
            config.get_sub_keys("db").unwrap()[..3],
            ["host", "ports", "timeout"]
        );
        assert!(config.get_sub_keys("db.ports").unwrap().is_empty());
        assert!(config.get_sub_keys("db.host").unwrap().is_empty());
        assert!(config.get_sub_keys("db.nope").is_err());
    }

    #[test]
    fn test_len() {
        let config = config();
        assert_eq!(config.len("db.ports").unwrap(), 2);
        assert_eq!(config.len("db").unwrap(), 9);
        assert_eq!(config.len("db.host").unwrap(), 0);
        assert_eq!(config.len("empty_map").unwrap(), 0);
        assert!(config.len("db.nope").is_err());
    }

    #[test]
    fn test_resolution_errors_propagate() {
        let err = config().get_int("db.ports[2]").unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(
            err,
            Error::Resolve(ResolveError::IndexOutOfRange { len: 2, .. })
        ));
        assert!(!config().get_int("db.host").unwrap_err().is_not_found());
    }

    #[test]
    fn test_custom_delimiter() {
        let config = config().with_delimiter('/');
        assert_eq!(config.get_int("db/ports[1]").unwrap(), 443);
        assert!(config.get("db.ports").is_err());
        assert_eq!(config.delimiter(), '/');
    }

    #[test]
    fn test_contains() {
        let config = config();
        assert!(config.contains("db.ports[1]"));
        assert!(!config.contains("db.ports[2]"));
    }

    #[test]
    fn test_from_node_rejects_scalars() {
        let err = Config::from_node(Node::from("x")).unwrap_err();
        assert!(matches!(err, Error::RootNotMapping { path: None, found: NodeKind::String }));
        assert!(Config::from_yaml("").unwrap().len("a").is_err());
    }

    #[test]
    fn test_shared_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Config>();

        let config = config();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    assert_eq!(config.get_int("db.ports[1]").unwrap(), 443);
                    assert_eq!(config.get_default_int("missing.key", 42), 42);
                });
            }
        });
    }
}
