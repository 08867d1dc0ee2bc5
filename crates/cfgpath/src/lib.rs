//! # cfgpath
//!
//! Path-addressed, typed access to YAML configuration.
//!
//! A configuration is a tree of mappings, sequences and scalars loaded from a
//! YAML document plus any documents it includes. Values are read with path
//! strings such as `db.ports[1]`:
//!
//! - [`Path`] parses the string into key and index steps.
//! - [`resolve`] walks the tree along the steps.
//! - The typed accessors on [`Config`] coerce the result into a Rust value.
//!
//! ## Example
//!
//! ```rust
//! use cfgpath::Config;
//!
//! let config: Config = "db:\n  host: localhost\n  ports: [80, 443]\n".parse().unwrap();
//!
//! assert_eq!(config.get_string("db.host").unwrap(), "localhost");
//! assert_eq!(config.get_int("db.ports[1]").unwrap(), 443);
//! assert_eq!(config.get_default_int("db.pool", 8), 8);
//! assert_eq!(config.get_sub_keys("db").unwrap(), vec!["host", "ports"]);
//! ```
//!
//! ## Includes
//!
//! [`Config::from_file`] honours a top-level `include` key naming sibling
//! documents (without their `.yaml` suffix). They are merged into the base
//! document in order; see [`merge`] for the override rules. The key, suffix and
//! delimiter are set through [`LoadOptions`].

mod coerce;
mod config;
mod error;
mod load;
mod merge;
mod path;
mod resolve;

pub use coerce::{FromNode, parse_bool};
pub use config::{Config, DEFAULT_DELIMITER};
pub use error::{Error, Result};
pub use load::{FileSource, LoadOptions, MemoryFiles, NativeFiles};
pub use merge::{merge, merge_all};
pub use path::{Path, PathError, Step};
pub use resolve::{ResolveError, resolve};

pub use cfgpath_yaml::{Mapping, Node, NodeKind, Scalar};
