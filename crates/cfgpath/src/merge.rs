//! Deep merge of mapping trees.
//!
//! Merging overlays one mapping onto another with override semantics: the
//! overlay wins at every key, except that two mappings under the same key are
//! merged recursively instead of replaced. Sequences are never merged element by
//! element; they are replaced wholesale like scalars.

use cfgpath_yaml::{Mapping, Node};

/// Merge `src` into `dst` in place.
///
/// For each key of `src`:
/// - absent from `dst`: the value is moved in;
/// - mapping in both: merged recursively;
/// - anything else: the `src` value replaces the `dst` value.
pub fn merge(dst: &mut Mapping, src: Mapping) {
    for (key, value) in src {
        if let Some(existing) = dst.get_mut(&key) {
            match (existing, value) {
                (Node::Mapping(base), Node::Mapping(overlay)) => merge(base, overlay),
                (existing, value) => {
                    tracing::trace!(key = %key, "override");
                    *existing = value;
                }
            }
        } else {
            dst.insert(key, value);
        }
    }
}

/// Merge several overlays into `dst`, in order; later overlays win.
pub fn merge_all<I>(dst: &mut Mapping, overlays: I)
where
    I: IntoIterator<Item = Mapping>,
{
    for overlay in overlays {
        merge(dst, overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mapping(yaml: &str) -> Mapping {
        match cfgpath_yaml::parse(yaml).unwrap() {
            Node::Mapping(map) => map,
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    #[test]
    fn test_leaf_override_keeps_siblings() {
        let mut base = mapping("a: {x: 1, y: 2}");
        merge(&mut base, mapping("a: {y: 3, z: 4}"));
        assert_eq!(base, mapping("a: {x: 1, y: 3, z: 4}"));
    }

    #[test]
    fn test_sequence_replaced_by_mapping() {
        let mut base = mapping("a: [1, 2, 3]");
        merge(&mut base, mapping("a: {x: 1}"));
        assert_eq!(base, mapping("a: {x: 1}"));
    }

    #[test]
    fn test_mapping_replaced_by_scalar() {
        let mut base = mapping("a: {x: 1}\nb: 2");
        merge(&mut base, mapping("a: off"));
        assert_eq!(base, mapping("a: off\nb: 2"));
    }

    #[test]
    fn test_sequences_replaced_wholesale() {
        let mut base = mapping("hosts: [a, b, c]");
        merge(&mut base, mapping("hosts: [d]"));
        assert_eq!(base, mapping("hosts: [d]"));
    }

    #[test]
    fn test_new_keys_inserted() {
        let mut base = mapping("a: 1");
        merge(&mut base, mapping("b: {c: [1]}"));
        assert_eq!(base, mapping("a: 1\nb: {c: [1]}"));
    }

    #[test]
    fn test_deep_recursion() {
        let mut base = mapping("a: {b: {c: {d: 1, e: 2}}}");
        merge(&mut base, mapping("a: {b: {c: {e: 3}, f: 4}}"));
        assert_eq!(base, mapping("a: {b: {c: {d: 1, e: 3}, f: 4}}"));
    }

    #[test]
    fn test_merge_all_later_wins() {
        let mut base = mapping("level: base\nkeep: yes");
        merge_all(
            &mut base,
            [mapping("level: first\nfirst: 1"), mapping("level: second")],
        );
        assert_eq!(base, mapping("level: second\nkeep: yes\nfirst: 1"));
    }

    #[test]
    fn test_empty_overlay_is_identity() {
        let mut base = mapping("a: {x: 1}");
        merge(&mut base, Mapping::new());
        assert_eq!(base, mapping("a: {x: 1}"));
    }
}
