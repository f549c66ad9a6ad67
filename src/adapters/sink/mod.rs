//! Artifact sinks
//!
//! [`FileSink`] writes each artifact below an output directory. Artifact names
//! may contain `/`-separated prefix segments, which become sub-directories.

use crate::adapters::traits::ArtifactSink;
use crate::domain::{ExportedArtifact, LayerExportError, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Writes artifacts to the local filesystem
#[derive(Debug, Clone)]
pub struct FileSink {
    root: PathBuf,
}

impl FileSink {
    /// Create a sink rooted at `root`; the directory is created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Destination path of an artifact name
    ///
    /// # Errors
    ///
    /// Returns a delivery error for empty or absolute names and for names
    /// that would escape the output directory.
    pub fn target_path(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        if name.trim().is_empty() {
            return Err(LayerExportError::Delivery("empty artifact name".to_string()));
        }

        let mut path = self.root.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(LayerExportError::Delivery(format!(
                        "artifact name '{name}' must stay inside the output directory"
                    )))
                }
            }
        }
        Ok(path)
    }
}

#[async_trait]
impl ArtifactSink for FileSink {
    async fn deliver(&self, artifact: &ExportedArtifact) -> Result<()> {
        let path = self.target_path(artifact.name())?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                LayerExportError::Delivery(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        tokio::fs::write(&path, artifact.bytes()).await.map_err(|e| {
            LayerExportError::Delivery(format!("Failed to write {}: {e}", path.display()))
        })?;

        tracing::debug!(
            path = %path.display(),
            bytes = artifact.len(),
            "Artifact written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_case::test_case;

    #[tokio::test]
    async fn test_deliver_creates_prefix_directories() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path());

        sink.deliver(&ExportedArtifact::new(vec![1u8, 2, 3], "icons/small/1_2@3x.png"))
            .await
            .unwrap();

        let written = std::fs::read(dir.path().join("icons/small/1_2@3x.png")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_deliver_overwrites_previous_run() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path());

        sink.deliver(&ExportedArtifact::new(vec![1u8], "a@3x.png"))
            .await
            .unwrap();
        sink.deliver(&ExportedArtifact::new(vec![2u8], "a@3x.png"))
            .await
            .unwrap();

        assert_eq!(std::fs::read(dir.path().join("a@3x.png")).unwrap(), vec![2]);
    }

    #[test_case("/etc/passwd" ; "absolute")]
    #[test_case("../escape.png" ; "parent")]
    #[test_case("icons/../../escape.png" ; "nested parent")]
    #[test_case("  " ; "blank")]
    fn test_target_path_rejected(name: &str) {
        let sink = FileSink::new("/tmp/out");
        assert!(matches!(
            sink.target_path(name),
            Err(LayerExportError::Delivery(_))
        ));
    }

    #[test]
    fn test_target_path_accepted() {
        let sink = FileSink::new("/tmp/out");
        assert_eq!(
            sink.target_path("./icons/1_2@2x.png").unwrap(),
            PathBuf::from("/tmp/out/icons/1_2@2x.png")
        );
    }
}
