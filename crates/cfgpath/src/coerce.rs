//! Conversion of resolved nodes into Rust values.

use cfgpath_yaml::{Mapping, Node, Scalar};

/// A type a resolved [`Node`] can be coerced into.
///
/// Implemented for the types the typed accessors of
/// [`Config`](crate::Config) return. Implement it for your own types to use them
/// with [`Config::get_as`](crate::Config::get_as).
pub trait FromNode: Sized {
    /// Name of the expected type, for error messages.
    const EXPECTED: &'static str;

    /// Coerce `node`, or `None` if it has the wrong shape.
    fn from_node(node: &Node) -> Option<Self>;
}

/// Native strings only; numbers and booleans are not stringified.
impl FromNode for String {
    const EXPECTED: &'static str = "string";

    fn from_node(node: &Node) -> Option<Self> {
        node.as_str().map(str::to_owned)
    }
}

/// Native integers, or strings holding a decimal integer.
impl FromNode for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Scalar(Scalar::Int(i)) => Some(*i),
            Node::Scalar(Scalar::String(s)) => s.parse().ok(),
            _ => None,
        }
    }
}

/// Native booleans, or strings in [`parse_bool`] form.
impl FromNode for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Scalar(Scalar::Bool(b)) => Some(*b),
            Node::Scalar(Scalar::String(s)) => parse_bool(s),
            _ => None,
        }
    }
}

/// Native floats, integers (widened), or numeric strings.
impl FromNode for f64 {
    const EXPECTED: &'static str = "float";

    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Scalar(Scalar::Float(x)) => Some(*x),
            Node::Scalar(Scalar::Int(i)) => Some(*i as f64),
            Node::Scalar(Scalar::String(s)) => s.parse().ok(),
            _ => None,
        }
    }
}

/// One level of a mapping; nested values are passed through as nodes.
impl FromNode for Mapping {
    const EXPECTED: &'static str = "mapping";

    fn from_node(node: &Node) -> Option<Self> {
        node.as_mapping().cloned()
    }
}

impl FromNode for Node {
    const EXPECTED: &'static str = "value";

    fn from_node(node: &Node) -> Option<Self> {
        Some(node.clone())
    }
}

/// The boolean string grammar accepted by the bool accessors:
/// `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
