//! Path resolution over a node tree.
//!
//! Resolution is a single walk from the root, one step at a time, stopping at
//! the first step that cannot be applied. Every error names the textual sub-path
//! at which the walk stopped.

use crate::path::{Path, Step, push_step};
use cfgpath_yaml::{Node, Scalar};
use thiserror::Error;

/// Why a path could not be resolved.
///
/// `key` is the path text up to the point of failure. For `NotAMapping` and
/// `NotASequence` that is the node the step was applied to; for the other
/// variants it includes the failing step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("key `{key}` does not exist")]
    KeyNotFound { key: String },

    #[error("key `{}` is not a mapping", display_key(key))]
    NotAMapping { key: String },

    #[error("key `{}` is not a sequence", display_key(key))]
    NotASequence { key: String },

    #[error("key `{key}` is not a mapping or sequence")]
    NotAContainer { key: String },

    #[error("index out of range at `{key}` (sequence length {len})")]
    IndexOutOfRange { key: String, len: usize },
}

impl ResolveError {
    /// The sub-path at which resolution stopped.
    pub fn key(&self) -> &str {
        match self {
            ResolveError::KeyNotFound { key }
            | ResolveError::NotAMapping { key }
            | ResolveError::NotASequence { key }
            | ResolveError::NotAContainer { key }
            | ResolveError::IndexOutOfRange { key, .. } => key,
        }
    }
}

fn display_key(key: &str) -> &str {
    if key.is_empty() { "<root>" } else { key }
}

/// Walk `root` along `path`.
///
/// A scalar is only a valid result for the last step; a mapping or sequence may
/// be the result of any step. A key whose value is an explicit null counts as
/// missing.
pub fn resolve<'a>(root: &'a Node, path: &Path) -> Result<&'a Node, ResolveError> {
    let last = path.len().saturating_sub(1);
    let mut current = root;
    let mut consumed = String::new();

    for (i, step) in path.steps().iter().enumerate() {
        let child = match step {
            Step::Key(name) => {
                let Node::Mapping(map) = current else {
                    return Err(ResolveError::NotAMapping { key: consumed });
                };
                push_step(&mut consumed, step, path.delimiter(), i == 0);
                map.get(name.as_str())
            }
            Step::Index(index) => {
                let Node::Sequence(items) = current else {
                    return Err(ResolveError::NotASequence { key: consumed });
                };
                push_step(&mut consumed, step, path.delimiter(), i == 0);
                let Some(item) = items.get(usize::from(*index)) else {
                    return Err(ResolveError::IndexOutOfRange {
                        key: consumed,
                        len: items.len(),
                    });
                };
                Some(item)
            }
        };

        match child {
            None | Some(Node::Scalar(Scalar::Null)) => {
                return Err(ResolveError::KeyNotFound { key: consumed });
            }
            Some(node) if node.is_scalar() => {
                if i == last {
                    return Ok(node);
                }
                return Err(ResolveError::NotAContainer { key: consumed });
            }
            Some(node) => current = node,
        }
    }

    Ok(current)
}
