// src/domain/tag_set.rs
use crate::domain::link::build_default_url;
use crate::domain::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Working collection of tags together with their links and selection.
///
/// Every key in `links` and every member of `selected` is also present in
/// `tags`. All mutators keep that invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagSet {
    tags: Vec<String>,
    #[serde(default)]
    links: BTreeMap<String, String>,
    #[serde(default)]
    selected: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tags<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn link(&self, tag: &str) -> Option<&str> {
        self.links.get(tag).map(String::as_str)
    }

    pub fn links(&self) -> &BTreeMap<String, String> {
        &self.links
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        self.selected.contains(tag)
    }

    /// Selected tags in collection order.
    pub fn selected_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .filter(|t| self.selected.contains(*t))
            .cloned()
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Replace the collection with freshly generated tags.
    ///
    /// Selection and links are cleared; when a base URL is set every new
    /// tag is linked through it. Generated tags are taken as-is, duplicates
    /// included.
    pub fn replace_generated(&mut self, generated: Vec<String>) {
        self.tags = generated;
        self.selected.clear();
        self.links.clear();
        if self.base_url.is_some() {
            self.apply_base_url();
        }
    }

    /// Add a manual tag. Returns `false` when the tag is blank or already present.
    pub fn add(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        if let Some(base) = &self.base_url {
            self.links
                .insert(tag.to_string(), build_default_url(base, tag));
        }
        true
    }

    /// Rename `old` to `new` in place, carrying its link and selection.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), DomainError> {
        let new = new.trim();
        if new.is_empty() {
            return Err(DomainError::EmptyTag);
        }
        if !self.contains(old) {
            return Err(DomainError::TagNotFound(old.to_string()));
        }
        if old == new {
            return Ok(());
        }
        if self.contains(new) {
            return Err(DomainError::DuplicateTag(new.to_string()));
        }

        for tag in self.tags.iter_mut().filter(|t| t.as_str() == old) {
            *tag = new.to_string();
        }
        if self.selected.remove(old) {
            self.selected.insert(new.to_string());
        }
        if let Some(url) = self.links.remove(old) {
            self.links.insert(new.to_string(), url);
        }
        Ok(())
    }

    /// Remove every occurrence of `tag` and cascade to selection and links.
    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.selected.remove(tag);
        self.links.remove(tag);
        self.tags.len() != before
    }

    /// Flip the selection of `tag`. Returns the new state.
    pub fn toggle(&mut self, tag: &str) -> Result<bool, DomainError> {
        if self.selected.remove(tag) {
            return Ok(false);
        }
        self.select(tag)?;
        Ok(true)
    }

    pub fn select(&mut self, tag: &str) -> Result<(), DomainError> {
        if !self.contains(tag) {
            return Err(DomainError::TagNotFound(tag.to_string()));
        }
        self.selected.insert(tag.to_string());
        Ok(())
    }

    pub fn deselect(&mut self, tag: &str) -> bool {
        self.selected.remove(tag)
    }

    pub fn select_all(&mut self) {
        self.selected = self.tags.iter().cloned().collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// Set an individual link. A blank URL clears the link.
    pub fn set_link(&mut self, tag: &str, url: &str) -> Result<(), DomainError> {
        if !self.contains(tag) {
            return Err(DomainError::TagNotFound(tag.to_string()));
        }
        let url = url.trim();
        if url.is_empty() {
            self.links.remove(tag);
        } else {
            self.links.insert(tag.to_string(), url.to_string());
        }
        Ok(())
    }

    pub fn clear_link(&mut self, tag: &str) -> bool {
        self.links.remove(tag).is_some()
    }

    /// Drop selection and link entries whose tag is not in the collection.
    /// Returns how many entries were removed.
    pub fn prune_dangling(&mut self) -> usize {
        let before = self.selected.len() + self.links.len();
        let tags: BTreeSet<&str> = self.tags.iter().map(String::as_str).collect();
        self.selected.retain(|t| tags.contains(t.as_str()));
        self.links.retain(|t, _| tags.contains(t.as_str()));
        before - self.selected.len() - self.links.len()
    }

    /// Remember the base URL. A blank value unsets it.
    pub fn set_base_url(&mut self, base: &str) {
        let base = base.trim();
        self.base_url = (!base.is_empty()).then(|| base.to_string());
    }

    /// Replace all links with the default link derived from the base URL.
    /// Returns the number of linked tags; zero when no base URL is set.
    pub fn apply_base_url(&mut self) -> usize {
        let Some(base) = self.base_url.as_deref() else {
            return 0;
        };
        let links: BTreeMap<String, String> = self
            .tags
            .iter()
            .map(|tag| (tag.clone(), build_default_url(base, tag)))
            .collect();
        self.links = links;
        self.links.len()
    }
}
