// src/infrastructure/workspace_store.rs
use crate::application::WorkspaceRepository;
use crate::domain::TagSet;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Tag workspace persisted as pretty JSON between invocations.
///
/// A missing file loads as an empty workspace seeded with the configured
/// default base URL, if any.
#[derive(Debug, Clone)]
pub struct JsonWorkspaceRepository {
    path: PathBuf,
    default_base_url: Option<String>,
}

impl JsonWorkspaceRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default_base_url: None,
        }
    }

    pub fn with_default_base_url(mut self, base_url: Option<String>) -> Self {
        self.default_base_url = base_url.filter(|b| !b.trim().is_empty());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorkspaceRepository for JsonWorkspaceRepository {
    fn load(&self) -> Result<TagSet> {
        if !self.path.exists() {
            let mut workspace = TagSet::new();
            if let Some(base) = &self.default_base_url {
                workspace.set_base_url(base);
            }
            return Ok(workspace);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read workspace {}", self.path.display()))?;
        let mut workspace: TagSet = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse workspace JSON {}", self.path.display()))?;
        let pruned = workspace.prune_dangling();
        if pruned > 0 {
            warn!(path = %self.path.display(), pruned, "Dropped selection or links of unknown tags");
        }
        Ok(workspace)
    }

    fn save(&self, workspace: &TagSet) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create workspace directory {}", parent.display())
            })?;
        }
        let json =
            serde_json::to_string_pretty(workspace).context("Failed to serialize workspace")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write workspace {}", self.path.display()))?;
        debug!(path = %self.path.display(), tags = workspace.len(), "Workspace saved");
        Ok(())
    }
}
