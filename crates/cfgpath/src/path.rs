//! Path expressions.
//!
//! A path string such as `servers[0].ports[1]` is split on the delimiter into
//! segments, and each segment is split into a map key followed by zero or more
//! `[N]` index suffixes. Parsing is pure syntax; it never looks at a tree.
//!
//! Bracket text that is not a valid `u16` index is not an error: it stays part
//! of the key, so `labels[prod]` addresses a key literally named `labels[prod]`.

use std::fmt;
use thiserror::Error;

/// One unit of a parsed path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Look up a key in a mapping. May be empty (`a..b`).
    Key(String),
    /// Index into a sequence.
    Index(u16),
}

/// A parsed, non-empty path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    steps: Vec<Step>,
    delimiter: char,
}

/// Errors for path strings that cannot be parsed at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("key should not be empty")]
    Empty,

    #[error("wrong key format `{path}`: a path cannot start with an index")]
    LeadingIndex { path: String },
}

impl Path {
    /// Parse `input`, splitting segments on `delimiter`.
    ///
    /// ```rust
    /// use cfgpath::{Path, Step};
    ///
    /// let path = Path::parse("a[0][1]", '.').unwrap();
    /// assert_eq!(
    ///     path.steps(),
    ///     &[Step::Key("a".into()), Step::Index(0), Step::Index(1)]
    /// );
    /// ```
    pub fn parse(input: &str, delimiter: char) -> Result<Path, PathError> {
        if input.is_empty() {
            return Err(PathError::Empty);
        }
        if input.starts_with('[') {
            return Err(PathError::LeadingIndex {
                path: input.to_string(),
            });
        }

        let mut steps = Vec::new();
        let mut indices = Vec::new();
        for segment in input.split(delimiter) {
            let key = strip_indices(segment, &mut indices);
            steps.push(Step::Key(key.to_string()));
            // Indices were collected right to left.
            steps.extend(indices.drain(..).rev().map(Step::Index));
        }

        Ok(Path { steps, delimiter })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Parsed paths always have at least one step, so this is always false.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Strip trailing `[N]` suffixes from `segment`, pushing each `N` onto `indices`
/// in right-to-left order, and return what remains.
fn strip_indices<'s>(mut segment: &'s str, indices: &mut Vec<u16>) -> &'s str {
    while let Some(rest) = segment.strip_suffix(']') {
        let Some(open) = rest.rfind('[') else {
            break;
        };
        let Some(index) = parse_index(&rest[open + 1..]) else {
            break;
        };
        indices.push(index);
        segment = &rest[..open];
    }
    segment
}

/// Unsigned decimal that fits in a `u16`. No sign, no whitespace.
fn parse_index(digits: &str) -> Option<u16> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Append one step to the textual form of the path consumed so far.
///
/// Every key step but the first is preceded by the delimiter, so empty keys
/// keep their place (`.a` stays `.a`).
pub(crate) fn push_step(consumed: &mut String, step: &Step, delimiter: char, first: bool) {
    match step {
        Step::Key(name) => {
            if !first {
                consumed.push(delimiter);
            }
            consumed.push_str(name);
        }
        Step::Index(index) => {
            consumed.push('[');
            consumed.push_str(&index.to_string());
            consumed.push(']');
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::new();
        for (i, step) in self.steps.iter().enumerate() {
            push_step(&mut text, step, self.delimiter, i == 0);
        }
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(name: &str) -> Step {
        Step::Key(name.to_string())
    }

    fn steps(input: &str) -> Vec<Step> {
        Path::parse(input, '.').unwrap().steps().to_vec()
    }

    #[test]
    fn test_dotted_keys() {
        assert_eq!(steps("db.host"), vec![key("db"), key("host")]);
        assert_eq!(steps("single"), vec![key("single")]);
    }

    #[test]
    fn test_compound_indices_in_textual_order() {
        assert_eq!(
            steps("a[0][1]"),
            vec![key("a"), Step::Index(0), Step::Index(1)]
        );
        assert_eq!(
            steps("servers[2].ports[10]"),
            vec![key("servers"), Step::Index(2), key("ports"), Step::Index(10)]
        );
    }

    #[test]
    fn test_index_bounds() {
        assert_eq!(steps("a[65535]"), vec![key("a"), Step::Index(65535)]);
        assert_eq!(steps("a[65536]"), vec![key("a[65536]")]);
        assert_eq!(steps("a[007]"), vec![key("a"), Step::Index(7)]);
    }

    #[test]
    fn test_malformed_brackets_stay_in_key() {
        assert_eq!(steps("labels[prod]"), vec![key("labels[prod]")]);
        assert_eq!(steps("a]"), vec![key("a]")]);
        assert_eq!(steps("a[]"), vec![key("a[]")]);
        assert_eq!(steps("a[+1]"), vec![key("a[+1]")]);
        assert_eq!(steps("a[-1]"), vec![key("a[-1]")]);
        // Only the valid suffix to the right of the bad one is stripped.
        assert_eq!(steps("a[x][3]"), vec![key("a[x]"), Step::Index(3)]);
    }

    #[test]
    fn test_empty_segments_pass_through() {
        assert_eq!(steps("a..b"), vec![key("a"), key(""), key("b")]);
        assert_eq!(steps("a."), vec![key("a"), key("")]);
        assert_eq!(steps("a.[0]"), vec![key("a"), key(""), Step::Index(0)]);
    }

    #[test]
    fn test_rejected_inputs() {
        assert_eq!(Path::parse("", '.'), Err(PathError::Empty));
        assert_eq!(
            Path::parse("[0].a", '.'),
            Err(PathError::LeadingIndex {
                path: "[0].a".into()
            })
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let path = Path::parse("db/hosts[1]/name", '/').unwrap();
        assert_eq!(
            path.steps(),
            &[key("db"), key("hosts"), Step::Index(1), key("name")]
        );
        // The default delimiter has no meaning here.
        assert_eq!(Path::parse("a.b", '/').unwrap().steps(), &[key("a.b")]);
    }

    #[test]
    fn test_display_round_trips_text() {
        for input in ["a.b[0][1].c", "x", "a..b", ".a", "..a", "a."] {
            assert_eq!(Path::parse(input, '.').unwrap().to_string(), input);
        }
        assert_eq!(Path::parse("a/b[2]", '/').unwrap().to_string(), "a/b[2]");
    }
}
