//! CLI command implementations
//!
//! This module contains all CLI command implementations plus the wiring
//! shared by the commands that talk to the design file.

pub mod export;
pub mod get_config;
pub mod init;
pub mod serve;
pub mod session;
pub mod validate;

use crate::adapters::compress::HttpCompressionClient;
use crate::adapters::figma::{parse_figma_url, FigmaClient, NodeListSelection};
use crate::adapters::settings::FileSettingsStore;
use crate::config::AppConfig;
use crate::core::export::BatchPipeline;
use crate::core::settings::SettingsManager;
use crate::domain::{FileKey, LayerExportError, NodeId, Result};
use clap::Args;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Which layers to work on
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Node id(s) to export, in order (comma-separated, e.g. 12:34,56:78)
    #[arg(short, long = "node", value_delimiter = ',')]
    pub nodes: Vec<String>,

    /// Share link(s) of layers; each contributes its file key and node id
    #[arg(short, long = "url")]
    pub urls: Vec<String>,

    /// File with one share link per line (`#` comments and blank lines skipped)
    #[arg(long)]
    pub urls_file: Option<PathBuf>,

    /// Design file key (defaults to the one in the links or configuration)
    #[arg(long)]
    pub file_key: Option<String>,
}

impl SelectionArgs {
    /// Resolve the file key and ordered node ids
    ///
    /// `--node` ids come first, followed by the ids carried by `--url` links
    /// and then by the links in `--urls-file`. Repeated ids keep their first
    /// position.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for malformed ids or links, an
    /// unreadable links file, links that point at different files, or when
    /// no file key can be determined.
    pub fn resolve(&self, config: &AppConfig) -> Result<(FileKey, Vec<NodeId>)> {
        let mut node_ids = self
            .nodes
            .iter()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| NodeId::new(raw.trim()).map_err(LayerExportError::Configuration))
            .collect::<Result<Vec<_>>>()?;

        let mut urls = self.urls.clone();
        if let Some(path) = &self.urls_file {
            urls.extend(load_urls_file(path)?);
        }

        let mut link_key: Option<FileKey> = None;
        for raw in &urls {
            let (key, node) = parse_figma_url(raw)
                .map_err(|e| LayerExportError::Configuration(e.to_string()))?;
            if let Some(existing) = &link_key {
                if existing != &key {
                    return Err(LayerExportError::Configuration(format!(
                        "links point at different files: {existing} and {key}"
                    )));
                }
            }
            match node {
                Some(node) => node_ids.push(node),
                None => {
                    tracing::warn!(url = %raw, "Link has no node-id, nothing selected from it");
                    eprintln!("⚠️  Link has no node-id and selects nothing: {raw}");
                }
            }
            link_key = Some(key);
        }

        let file_key = match (&self.file_key, link_key, &config.figma.file_key) {
            (Some(explicit), _, _) => FileKey::new(explicit.trim()),
            (None, Some(from_link), _) => Ok(from_link),
            (None, None, Some(configured)) => FileKey::new(configured.trim()),
            (None, None, None) => Err(
                "no file key: pass --file-key, a --url link, or set figma.file_key".to_string(),
            ),
        }
        .map_err(LayerExportError::Configuration)?;

        Ok((file_key, dedup_node_ids(node_ids)))
    }
}

/// Drop repeated ids, keeping the first occurrence
fn dedup_node_ids(node_ids: Vec<NodeId>) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    node_ids
        .into_iter()
        .filter(|id| {
            let first = seen.insert(id.clone());
            if !first {
                tracing::warn!(node_id = %id, "Node selected more than once, keeping the first");
            }
            first
        })
        .collect()
}

/// Read share links from a list file
///
/// Lines are trimmed; blank lines and `#` comments are skipped, and lines
/// that do not start with `http` are skipped with a warning.
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read.
pub fn load_urls_file(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        LayerExportError::Configuration(format!(
            "Failed to read links file {}: {e}",
            path.display()
        ))
    })?;

    let mut urls = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with("http") {
            urls.push(line.to_string());
        } else {
            let line_number = index + 1;
            tracing::warn!(line = line_number, content = %line, "Skipping line that is not a link");
            eprintln!("⚠️  Line {line_number} is not a link, skipped: {line}");
        }
    }

    tracing::debug!(path = %path.display(), links = urls.len(), "Links file loaded");
    Ok(urls)
}

/// Collaborators shared by `export` and `session`
pub(crate) struct Workspace {
    pub client: Arc<FigmaClient>,
    pub selection: Arc<NodeListSelection>,
    pub settings: Arc<SettingsManager>,
    pub pipeline: BatchPipeline,
}

impl Workspace {
    /// Wire the pipeline for one design file
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the selection cannot be resolved or
    /// an HTTP client cannot be built.
    pub(crate) fn build(config: &AppConfig, selection: &SelectionArgs) -> Result<Self> {
        let (file_key, node_ids) = selection.resolve(config)?;
        tracing::info!(
            file_key = %file_key,
            nodes = node_ids.len(),
            "Selection resolved from arguments"
        );

        let client = Arc::new(FigmaClient::new(&config.figma, file_key)?);
        let settings = Arc::new(settings_manager(config));
        let compressor = Arc::new(HttpCompressionClient::new(
            config.compression.timeout_seconds,
        )?);

        let pipeline = BatchPipeline::new(client.clone(), compressor, settings.clone())
            .with_channel_capacity(config.export.channel_capacity);

        Ok(Self {
            selection: Arc::new(NodeListSelection::new(client.clone(), node_ids)),
            client,
            settings,
            pipeline,
        })
    }
}

/// Settings manager over the configured settings file
pub(crate) fn settings_manager(config: &AppConfig) -> SettingsManager {
    let store = FileSettingsStore::new(&config.compression.settings_path);
    tracing::debug!(path = %store.path().display(), "Using settings file");
    SettingsManager::new(Arc::new(store), &config.compression.default_service_url)
}

/// Exit code for a setup failure
pub(crate) fn exit_code_for(error: &LayerExportError) -> i32 {
    match error {
        LayerExportError::Configuration(_) | LayerExportError::Validation(_) => 2,
        LayerExportError::Figma(_) => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FigmaError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(nodes: &[&str], urls: &[&str], file_key: Option<&str>) -> SelectionArgs {
        SelectionArgs {
            nodes: nodes.iter().map(|s| s.to_string()).collect(),
            urls: urls.iter().map(|s| s.to_string()).collect(),
            urls_file: None,
            file_key: file_key.map(str::to_string),
        }
    }

    #[test]
    fn test_resolve_nodes_then_links() {
        let selection = args(
            &["1:2"],
            &["https://www.figma.com/design/AbC123/Icons?node-id=3-4"],
            None,
        );
        let (key, ids) = selection.resolve(&AppConfig::default()).unwrap();

        assert_eq!(key.as_str(), "AbC123");
        let ids: Vec<&str> = ids.iter().map(NodeId::as_str).collect();
        assert_eq!(ids, vec!["1:2", "3:4"]);
    }

    #[test]
    fn test_resolve_file_key_from_config() {
        let mut config = AppConfig::default();
        config.figma.file_key = Some("CfgKey".to_string());

        let (key, ids) = args(&["1:2"], &[], None).resolve(&config).unwrap();
        assert_eq!(key.as_str(), "CfgKey");
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn test_resolve_explicit_key_wins() {
        let mut config = AppConfig::default();
        config.figma.file_key = Some("CfgKey".to_string());

        let (key, _) = args(&[], &[], Some("Explicit")).resolve(&config).unwrap();
        assert_eq!(key.as_str(), "Explicit");
    }

    #[test]
    fn test_resolve_without_key() {
        let err = args(&["1:2"], &[], None)
            .resolve(&AppConfig::default())
            .unwrap_err();
        assert!(matches!(err, LayerExportError::Configuration(_)));
    }

    #[test]
    fn test_resolve_links_from_different_files() {
        let selection = args(
            &[],
            &[
                "https://www.figma.com/design/One/A?node-id=1-2",
                "https://www.figma.com/design/Two/B?node-id=3-4",
            ],
            None,
        );
        let err = selection.resolve(&AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("different files"));
    }

    #[test]
    fn test_resolve_repeated_node_keeps_first() {
        let selection = args(
            &["1:2", "3:4"],
            &["https://www.figma.com/design/AbC123/Icons?node-id=1-2"],
            None,
        );
        let (_, ids) = selection.resolve(&AppConfig::default()).unwrap();

        let ids: Vec<&str> = ids.iter().map(NodeId::as_str).collect();
        assert_eq!(ids, vec!["1:2", "3:4"]);
    }

    #[test]
    fn test_resolve_link_without_node_selects_nothing() {
        let selection = args(&[], &["https://www.figma.com/design/AbC123/Icons"], None);
        let (key, ids) = selection.resolve(&AppConfig::default()).unwrap();

        assert_eq!(key.as_str(), "AbC123");
        assert!(ids.is_empty());
    }

    #[test]
    fn test_load_urls_file_skips_comments_and_non_links() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "# icons\n\nhttps://www.figma.com/design/AbC123/Icons?node-id=1-2\n  not a link\n  https://www.figma.com/design/AbC123/Icons?node-id=5-6  \n"
        )
        .unwrap();

        let urls = load_urls_file(file.path()).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://www.figma.com/design/AbC123/Icons?node-id=1-2",
                "https://www.figma.com/design/AbC123/Icons?node-id=5-6",
            ]
        );
    }

    #[test]
    fn test_load_urls_file_missing() {
        let err = load_urls_file(Path::new("/nonexistent/links.txt")).unwrap_err();
        assert!(matches!(err, LayerExportError::Configuration(_)));
    }

    #[test]
    fn test_resolve_appends_links_file_after_urls() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "https://www.figma.com/design/AbC123/Icons?node-id=7-8").unwrap();
        writeln!(file, "https://www.figma.com/design/AbC123/Icons?node-id=3-4").unwrap();

        let mut selection = args(
            &["1:2"],
            &["https://www.figma.com/design/AbC123/Icons?node-id=3-4"],
            None,
        );
        selection.urls_file = Some(file.path().to_path_buf());
        let (key, ids) = selection.resolve(&AppConfig::default()).unwrap();

        assert_eq!(key.as_str(), "AbC123");
        let ids: Vec<&str> = ids.iter().map(NodeId::as_str).collect();
        assert_eq!(ids, vec!["1:2", "3:4", "7:8"]);
    }

    #[test]
    fn test_exit_code_for() {
        assert_eq!(
            exit_code_for(&LayerExportError::Configuration("x".to_string())),
            2
        );
        assert_eq!(
            exit_code_for(&FigmaError::ConnectionFailed("x".to_string()).into()),
            4
        );
        assert_eq!(exit_code_for(&LayerExportError::Other("x".to_string())), 5);
    }
}
