//! YAML parser that builds [`Node`] trees.

use crate::error::{Error, Location, Result};
use crate::node::{Mapping, Node, Scalar};
use crate::scalar::{resolve_plain, resolve_tagged};
use std::collections::HashMap;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// UTF-8 byte-order mark.
const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Key that pulls the entries of another mapping into the current one.
const MERGE_KEY: &str = "<<";

/// Most nodes alias expansion may add to one document.
const MAX_ALIAS_EXPANSION: usize = 100_000;

/// Parse YAML text into a node tree.
///
/// Only the first document of a multi-document stream is read. A stream with no
/// document at all (empty, or only comments) yields a null scalar.
///
/// # Example
///
/// ```rust
/// use cfgpath_yaml::parse;
///
/// let doc = parse("ports: [80, 443]").unwrap();
/// assert!(doc.is_mapping());
/// ```
///
/// # Errors
///
/// Returns an error if the text is not valid YAML or cannot be represented as a
/// node tree (complex keys, duplicate keys, unknown aliases, ill-typed core tags,
/// aliases that expand past a fixed node budget).
pub fn parse(content: &str) -> Result<Node> {
    parse_impl(content, None)
}

/// Parse YAML text, naming `filename` in error locations.
///
/// ```rust
/// use cfgpath_yaml::parse_file;
///
/// let err = parse_file("a: [1, 2", "app.yaml").unwrap_err();
/// assert_eq!(err.location().unwrap().file.as_deref(), Some("app.yaml"));
/// ```
pub fn parse_file(content: &str, filename: &str) -> Result<Node> {
    parse_impl(content, Some(filename))
}

/// Parse raw document bytes, stripping a leading byte-order mark.
pub fn parse_bytes(bytes: &[u8]) -> Result<Node> {
    parse(decode(bytes)?)
}

/// Strip a UTF-8 byte-order mark and validate the rest as UTF-8.
pub fn decode(bytes: &[u8]) -> Result<&str> {
    let bytes = bytes.strip_prefix(BOM).unwrap_or(bytes);
    Ok(std::str::from_utf8(bytes)?)
}

fn parse_impl(content: &str, filename: Option<&str>) -> Result<Node> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut parser = Parser::new_from_str(content);
    let mut builder = NodeBuilder::new(filename);

    parser
        .load(&mut builder, false) // false = first document only
        .map_err(|e| Error::from_scan(&e, filename))?;

    builder.result()
}

/// Builder that implements MarkedEventReceiver to construct a [`Node`] tree.
struct NodeBuilder<'a> {
    filename: Option<&'a str>,

    /// Containers still being filled, innermost last
    stack: Vec<Frame>,

    /// Completed anchored nodes by anchor id
    anchors: HashMap<usize, Node>,

    /// Nodes copied in by aliases so far
    expanded: usize,

    root: Option<Node>,

    /// First structural error; later events are ignored once set
    error: Option<Error>,
}

/// A container being constructed during parsing.
enum Frame {
    Sequence {
        anchor: usize,
        items: Vec<Node>,
    },
    Mapping {
        anchor: usize,
        entries: Mapping,
        /// Key waiting for its value
        pending_key: Option<PendingKey>,
        /// Mappings pulled in with `<<`, in precedence order
        merges: Vec<Mapping>,
    },
}

struct PendingKey {
    text: String,
    marker: Marker,
    is_merge: bool,
}

impl<'a> NodeBuilder<'a> {
    fn new(filename: Option<&'a str>) -> Self {
        Self {
            filename,
            stack: Vec::new(),
            anchors: HashMap::new(),
            expanded: 0,
            root: None,
            error: None,
        }
    }

    fn result(self) -> Result<Node> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(self.root.unwrap_or_else(Node::null))
    }

    fn location(&self, marker: &Marker) -> Location {
        Location::from_marker(marker, self.filename)
    }

    fn fail(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn invalid(&mut self, message: impl Into<String>, marker: &Marker) {
        let location = self.location(marker);
        self.fail(Error::InvalidStructure {
            message: message.into(),
            location,
        });
    }

    /// True when the next completed node is a mapping key.
    fn expecting_key(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame::Mapping {
                pending_key: None,
                ..
            })
        )
    }

    fn push_key(&mut self, text: String, is_merge: bool, marker: Marker) {
        let duplicate = !is_merge
            && matches!(
                self.stack.last(),
                Some(Frame::Mapping { entries, .. }) if entries.contains_key(&text)
            );
        if duplicate {
            let location = self.location(&marker);
            self.fail(Error::DuplicateKey {
                key: text,
                location,
            });
            return;
        }

        if let Some(Frame::Mapping { pending_key, .. }) = self.stack.last_mut() {
            *pending_key = Some(PendingKey {
                text,
                marker,
                is_merge,
            });
        }
    }

    fn push_complete(&mut self, node: Node, anchor: usize, marker: Marker) {
        if anchor != 0 {
            self.anchors.insert(anchor, node.clone());
        }

        let problem = match self.stack.last_mut() {
            None => {
                self.root = Some(node);
                None
            }
            Some(Frame::Sequence { items, .. }) => {
                items.push(node);
                None
            }
            Some(Frame::Mapping {
                entries,
                pending_key,
                merges,
                ..
            }) => match pending_key.take() {
                // Scalar keys never get here, see `on_scalar`.
                None => Some(("mapping keys must be scalars", marker)),
                Some(key) if !key.is_merge => {
                    entries.insert(key.text, node);
                    None
                }
                Some(key) => match merge_sources(node) {
                    Some(maps) => {
                        merges.extend(maps);
                        None
                    }
                    None => Some((
                        "merge key `<<` expects a mapping or a list of mappings",
                        key.marker,
                    )),
                },
            },
        };

        if let Some((message, marker)) = problem {
            self.invalid(message, &marker);
        }
    }

    fn on_scalar(
        &mut self,
        value: String,
        style: TScalarStyle,
        anchor: usize,
        tag: Option<Tag>,
        marker: Marker,
    ) {
        let scalar = match &tag {
            Some(tag) => match resolve_tagged(&tag.handle, &tag.suffix, &value) {
                Some(scalar) => scalar,
                None => {
                    let message = format!("`{}` is not a valid !!{}", value, tag.suffix);
                    self.invalid(message, &marker);
                    return;
                }
            },
            None if style == TScalarStyle::Plain => resolve_plain(&value),
            None => Scalar::String(value.clone()),
        };

        if self.expecting_key() {
            if anchor != 0 {
                self.anchors.insert(anchor, Node::Scalar(scalar));
            }
            let is_merge = style == TScalarStyle::Plain && value == MERGE_KEY;
            self.push_key(value, is_merge, marker);
            return;
        }

        self.push_complete(Node::Scalar(scalar), anchor, marker);
    }

    fn on_alias(&mut self, anchor: usize, marker: Marker) {
        let Some(target) = self.anchors.get(&anchor) else {
            let location = self.location(&marker);
            self.fail(Error::UnknownAlias { location });
            return;
        };

        self.expanded = self.expanded.saturating_add(node_count(target));
        if self.expanded > MAX_ALIAS_EXPANSION {
            self.invalid("document contains excessive aliasing", &marker);
            return;
        }
        let node = target.clone();

        if self.expecting_key() {
            match node {
                Node::Scalar(scalar) => self.push_key(scalar.to_string(), false, marker),
                _ => self.invalid("mapping keys must be scalars", &marker),
            }
            return;
        }

        self.push_complete(node, 0, marker);
    }

    fn end_mapping(&mut self, marker: Marker) {
        match self.stack.pop() {
            Some(Frame::Mapping {
                anchor,
                mut entries,
                merges,
                ..
            }) => {
                // Explicit keys win over merged ones; earlier merge sources win
                // over later ones.
                for merged in merges {
                    for (key, value) in merged {
                        entries.entry(key).or_insert(value);
                    }
                }
                self.push_complete(Node::Mapping(entries), anchor, marker);
            }
            _ => self.invalid("unbalanced mapping end", &marker),
        }
    }

    fn end_sequence(&mut self, marker: Marker) {
        match self.stack.pop() {
            Some(Frame::Sequence { anchor, items }) => {
                self.push_complete(Node::Sequence(items), anchor, marker);
            }
            _ => self.invalid("unbalanced sequence end", &marker),
        }
    }

    fn reject_complex_key(&mut self, marker: &Marker) -> bool {
        if self.expecting_key() {
            self.invalid("mapping keys must be scalars", marker);
            return true;
        }
        false
    }
}

/// Number of nodes in the tree rooted at `node`, itself included.
fn node_count(node: &Node) -> usize {
    match node {
        Node::Scalar(_) => 1,
        Node::Sequence(items) => 1 + items.iter().map(node_count).sum::<usize>(),
        Node::Mapping(map) => 1 + map.values().map(node_count).sum::<usize>(),
    }
}

/// The mappings a `<<` value pulls in: one mapping, or a list of mappings.
fn merge_sources(node: Node) -> Option<Vec<Mapping>> {
    match node {
        Node::Mapping(map) => Some(vec![map]),
        Node::Sequence(items) => items
            .into_iter()
            .map(|item| match item {
                Node::Mapping(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

impl MarkedEventReceiver for NodeBuilder<'_> {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match ev {
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}

            Event::Scalar(value, style, anchor, tag) => {
                self.on_scalar(value, style, anchor, tag, marker);
            }

            Event::SequenceStart(anchor, _tag) => {
                if !self.reject_complex_key(&marker) {
                    self.stack.push(Frame::Sequence {
                        anchor,
                        items: Vec::new(),
                    });
                }
            }

            Event::SequenceEnd => self.end_sequence(marker),

            Event::MappingStart(anchor, _tag) => {
                if !self.reject_complex_key(&marker) {
                    self.stack.push(Frame::Mapping {
                        anchor,
                        entries: Mapping::new(),
                        pending_key: None,
                        merges: Vec::new(),
                    });
                }
            }

            Event::MappingEnd => self.end_mapping(marker),

            Event::Alias(anchor) => self.on_alias(anchor, marker),
        }
    }
}
