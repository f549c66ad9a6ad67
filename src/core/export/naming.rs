//! Output name builder
//!
//! Names are a pure function of node identity, scale, extension, prefix and
//! the compression tag, so re-running a batch overwrites the same files.

use crate::domain::{NodeId, Scale};

/// Which variant of an item's image a name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameTag {
    /// `<id>@<scale>x.<ext>`
    Base,
    /// `<id>@<scale>x_compress.<ext>`
    Compressed,
}

/// Build the destination name of an artifact
///
/// The node id is sanitized (`:` to `_`). A non-empty prefix is joined with
/// `/` after its trailing slashes are stripped; colons inside the prefix are
/// sanitized the same way so no produced name ever contains `:`.
///
/// # Examples
///
/// ```
/// use layer_export::core::export::{build_name, NameTag};
/// use layer_export::domain::{NodeId, Scale};
///
/// let id = NodeId::new("12:34").unwrap();
/// let scale = Scale::clamped(2);
/// assert_eq!(build_name(&id, scale, "png", None, NameTag::Base), "12_34@2x.png");
/// assert_eq!(
///     build_name(&id, scale, "png", Some("assets/"), NameTag::Compressed),
///     "assets/12_34@2x_compress.png"
/// );
/// ```
pub fn build_name(
    node_id: &NodeId,
    scale: Scale,
    ext: &str,
    prefix: Option<&str>,
    tag: NameTag,
) -> String {
    let suffix = match tag {
        NameTag::Base => "",
        NameTag::Compressed => "_compress",
    };
    let base = format!("{}@{}x{}.{}", node_id.sanitized(), scale, suffix, ext);

    match prefix.map(|p| p.trim_end_matches('/')) {
        Some(p) if !p.is_empty() => format!("{}/{}", p.replace(':', "_"), base),
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use test_case::test_case;

    fn id(s: &str) -> NodeId {
        NodeId::new(s).unwrap()
    }

    #[test_case("nodeA", 3, "png", None, NameTag::Base, "nodeA@3x.png" ; "base")]
    #[test_case("nodeA", 3, "png", None, NameTag::Compressed, "nodeA@3x_compress.png" ; "compressed")]
    #[test_case("1:2", 1, "jpg", None, NameTag::Base, "1_2@1x.jpg" ; "sanitized jpg")]
    #[test_case("1:2", 4, "png", Some("out"), NameTag::Base, "out/1_2@4x.png" ; "prefixed")]
    #[test_case("1:2", 4, "png", Some("out///"), NameTag::Base, "out/1_2@4x.png" ; "trailing slashes stripped")]
    #[test_case("1:2", 4, "png", Some(""), NameTag::Base, "1_2@4x.png" ; "empty prefix ignored")]
    #[test_case("1:2", 4, "png", Some("/"), NameTag::Base, "1_2@4x.png" ; "slash only prefix ignored")]
    #[test_case("1:2", 2, "png", Some("a/b"), NameTag::Compressed, "a/b/1_2@2x_compress.png" ; "nested prefix compressed")]
    fn test_build_name(
        node: &str,
        scale: i64,
        ext: &str,
        prefix: Option<&str>,
        tag: NameTag,
        expected: &str,
    ) {
        assert_eq!(
            build_name(&id(node), Scale::clamped(scale), ext, prefix, tag),
            expected
        );
    }

    #[test]
    fn test_build_name_is_deterministic() {
        let node = id("618:21941");
        let first = build_name(&node, Scale::DEFAULT, "png", Some("x"), NameTag::Base);
        let second = build_name(&node, Scale::DEFAULT, "png", Some("x"), NameTag::Base);
        assert_eq!(first, second);
    }

    #[test]
    fn test_names_never_contain_colon() {
        let name = build_name(&id("I1:2;3:4"), Scale::DEFAULT, "png", Some("C:/out"), NameTag::Base);
        assert!(!name.contains(':'));
    }

    #[test]
    fn test_build_name_is_injective_over_inputs() {
        let ids = ["1:2", "1:3", "2:2"];
        let mut seen = HashSet::new();
        for node in ids {
            for scale in 1..=4 {
                for ext in ["png", "jpg"] {
                    for prefix in [None, Some("p")] {
                        for tag in [NameTag::Base, NameTag::Compressed] {
                            let name =
                                build_name(&id(node), Scale::clamped(scale), ext, prefix, tag);
                            assert!(seen.insert(name.clone()), "duplicate name {name}");
                        }
                    }
                }
            }
        }
        assert_eq!(seen.len(), 3 * 4 * 2 * 2 * 2);
    }
}
