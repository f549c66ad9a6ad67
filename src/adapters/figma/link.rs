//! Share link parsing

use crate::domain::{FigmaError, FileKey, NodeId};
use url::Url;

/// Path segments that precede the file key
const FILE_SEGMENTS: [&str; 3] = ["design", "file", "proto"];

/// Extract the file key and optional node id from a share URL
///
/// Accepts `https://www.figma.com/design/<key>/<title>?node-id=1-2` and the
/// older `/file/<key>/...` form. The URL encodes `:` in node ids as `-`.
///
/// # Examples
///
/// ```
/// use layer_export::adapters::figma::parse_figma_url;
///
/// let (key, node) =
///     parse_figma_url("https://www.figma.com/design/AbC123/Icons?node-id=12-345").unwrap();
/// assert_eq!(key.as_str(), "AbC123");
/// assert_eq!(node.unwrap().as_str(), "12:345");
/// ```
///
/// # Errors
///
/// Returns [`FigmaError::InvalidUrl`] if the input is not a URL or has no
/// file key segment.
pub fn parse_figma_url(raw: &str) -> Result<(FileKey, Option<NodeId>), FigmaError> {
    let url = Url::parse(raw.trim()).map_err(|e| FigmaError::InvalidUrl(format!("{raw}: {e}")))?;

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let key = segments
        .iter()
        .position(|seg| FILE_SEGMENTS.contains(seg))
        .and_then(|i| segments.get(i + 1))
        .ok_or_else(|| FigmaError::InvalidUrl(format!("{raw}: no file key in path")))?;
    let key = FileKey::new(*key).map_err(FigmaError::InvalidUrl)?;

    let node = url
        .query_pairs()
        .find(|(k, _)| k == "node-id")
        .map(|(_, v)| v.replace('-', ":"))
        .filter(|v| !v.trim().is_empty())
        .map(NodeId::new)
        .transpose()
        .map_err(FigmaError::InvalidUrl)?;

    Ok((key, node))
}
