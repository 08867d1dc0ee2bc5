//! # cfgpath-yaml
//!
//! YAML loading into a closed, typed node tree.
//!
//! This crate turns YAML text into a [`Node`] tree made of scalars, mappings and
//! sequences. It is the loading half of `cfgpath`: everything above it (path
//! parsing, resolution, merging of included documents) works on [`Node`] and never
//! sees YAML syntax.
//!
//! ## Design
//!
//! The tree is built from `yaml-rust2` parser events rather than from its DOM
//! loader. Working at the event level lets the builder see quoting style (quoted
//! scalars are never re-typed), anchors, tags and source positions while the tree
//! is assembled.
//!
//! Scalar typing follows YAML 1.1 plain-scalar resolution, so `yes`, `on` and
//! `0755` mean what configuration authors used to YAML 1.1 loaders expect.
//!
//! ## Example
//!
//! ```rust
//! use cfgpath_yaml::{Node, parse};
//!
//! let doc = parse("server:\n  port: 8080\n  tls: on\n").unwrap();
//! let server = doc.as_mapping().unwrap()["server"].as_mapping().unwrap();
//! assert_eq!(server["port"].as_i64(), Some(8080));
//! assert_eq!(server["tls"], Node::from(true));
//! ```

mod error;
mod node;
mod parser;
mod scalar;

pub use error::{Error, Location, Result};
pub use node::{Mapping, Node, NodeKind, Scalar};
pub use parser::{decode, parse, parse_bytes, parse_file};
