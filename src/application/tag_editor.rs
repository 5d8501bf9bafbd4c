// src/application/tag_editor.rs
use crate::domain::{DomainError, TagSet};
use anyhow::Result;
use tracing::debug;

/// Local persistence of the working tag set between commands.
pub trait WorkspaceRepository {
    fn load(&self) -> Result<TagSet>;
    fn save(&self, workspace: &TagSet) -> Result<()>;
}

/// Load-modify-save wrapper around [`TagSet`] edits.
pub struct TagEditor<R: WorkspaceRepository> {
    repository: R,
}

impl<R: WorkspaceRepository> TagEditor<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn workspace(&self) -> Result<TagSet> {
        self.repository.load()
    }

    /// Apply `edit` to the stored workspace and persist the result.
    /// Nothing is written when `edit` fails.
    pub fn edit<T, F>(&self, edit: F) -> Result<T>
    where
        F: FnOnce(&mut TagSet) -> Result<T, DomainError>,
    {
        let mut workspace = self.repository.load()?;
        let out = edit(&mut workspace)?;
        self.repository.save(&workspace)?;
        Ok(out)
    }

    pub fn add(&self, tag: &str) -> Result<bool> {
        let added = self.edit(|ws| Ok(ws.add(tag)))?;
        debug!(tag, added, "Add tag");
        Ok(added)
    }

    pub fn rename(&self, old: &str, new: &str) -> Result<()> {
        self.edit(|ws| ws.rename(old, new))
    }

    pub fn remove(&self, tag: &str) -> Result<bool> {
        self.edit(|ws| Ok(ws.remove(tag)))
    }

    pub fn toggle(&self, tag: &str) -> Result<bool> {
        self.edit(|ws| ws.toggle(tag))
    }

    pub fn select(&self, tag: &str) -> Result<()> {
        self.edit(|ws| ws.select(tag))
    }

    pub fn select_all(&self) -> Result<usize> {
        self.edit(|ws| {
            ws.select_all();
            Ok(ws.selected_count())
        })
    }

    pub fn deselect_all(&self) -> Result<()> {
        self.edit(|ws| {
            ws.deselect_all();
            Ok(())
        })
    }

    pub fn set_link(&self, tag: &str, url: &str) -> Result<()> {
        self.edit(|ws| ws.set_link(tag, url))
    }

    pub fn clear_link(&self, tag: &str) -> Result<bool> {
        self.edit(|ws| Ok(ws.clear_link(tag)))
    }

    /// Store the base URL and optionally relink every tag through it.
    /// Returns the number of tags linked.
    pub fn set_base_url(&self, base: &str, apply: bool) -> Result<usize> {
        self.edit(|ws| {
            ws.set_base_url(base);
            Ok(if apply { ws.apply_base_url() } else { 0 })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::MemoryWorkspaceRepository;

    #[test]
    fn given_stored_workspace_when_renaming_then_persists_change() {
        // Arrange
        let repo = MemoryWorkspaceRepository::with(TagSet::from_tags(["a", "b"]));
        let editor = TagEditor::new(repo.clone());

        // Act
        editor.rename("a", "z").unwrap();

        // Assert
        assert_eq!(repo.current().tags(), ["z", "b"]);
    }

    #[test]
    fn given_failing_edit_when_editing_then_nothing_saved() {
        let repo = MemoryWorkspaceRepository::with(TagSet::from_tags(["a"]));
        let editor = TagEditor::new(repo.clone());

        let result = editor.rename("missing", "z");

        assert!(result.is_err());
        assert_eq!(repo.saves(), 0);
    }

    #[test]
    fn given_base_url_with_apply_when_setting_then_links_all() {
        let repo = MemoryWorkspaceRepository::with(TagSet::from_tags(["::Topic/AI", "x"]));
        let editor = TagEditor::new(repo.clone());

        let linked = editor.set_base_url("https://s.example/search", true).unwrap();

        assert_eq!(linked, 2);
        assert_eq!(
            repo.current().link("::Topic/AI"),
            Some("https://s.example/search?q=%3A%3ATopic%2FAI")
        );
    }

    #[test]
    fn given_base_url_without_apply_when_setting_then_existing_links_kept() {
        let mut set = TagSet::from_tags(["x"]);
        set.set_link("x", "https://custom.example").unwrap();
        let repo = MemoryWorkspaceRepository::with(set);
        let editor = TagEditor::new(repo.clone());

        editor.set_base_url("https://s.example", false).unwrap();

        assert_eq!(repo.current().link("x"), Some("https://custom.example"));
        assert_eq!(repo.current().base_url(), Some("https://s.example"));
    }
}
