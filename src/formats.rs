use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// Formats a fresh catalog is seeded with.
pub const DEFAULT_FORMATS: [&str; 5] = ["Notícia", "Post Instagram", "Publi", "Reels", "Artigo Blog"];

pub fn default_formats() -> Vec<String> {
    DEFAULT_FORMATS.iter().map(|name| name.to_string()).collect()
}

/// Trim a user supplied format name, rejecting empty ones.
pub fn normalize_format_name(name: &str) -> PlannerResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::invalid("format name must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Ordered set of unique, case-sensitive format tags.
///
/// The catalog alone cannot know which entries use a tag; refusing to
/// remove an in-use format is the store's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatCatalog {
    formats: Vec<String>,
}

impl Default for FormatCatalog {
    fn default() -> Self {
        Self {
            formats: default_formats(),
        }
    }
}

impl FormatCatalog {
    pub fn empty() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    /// Build a catalog from names, skipping repeats after the first.
    pub fn from_names<I, S>(names: I) -> PlannerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::empty();
        for name in names {
            let name = normalize_format_name(name.as_ref())?;
            if !catalog.contains(&name) {
                catalog.formats.push(name);
            }
        }
        Ok(catalog)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formats.iter().any(|f| f == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.formats.iter().position(|f| f == name)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.formats
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Append `name`, returning the stored (trimmed) form.
    pub fn add(&mut self, name: &str) -> PlannerResult<String> {
        let name = normalize_format_name(name)?;
        if self.contains(&name) {
            return Err(PlannerError::DuplicateFormat(name));
        }
        self.formats.push(name.clone());
        Ok(name)
    }

    /// Rename in place, keeping the tag's position.
    pub fn rename(&mut self, old: &str, new: &str) -> PlannerResult<String> {
        let new = normalize_format_name(new)?;
        let pos = self
            .position(old)
            .ok_or_else(|| PlannerError::UnknownFormat(old.to_string()))?;
        if old == new {
            return Ok(new);
        }
        if self.contains(&new) {
            return Err(PlannerError::DuplicateFormat(new));
        }
        self.formats[pos] = new.clone();
        Ok(new)
    }

    pub fn remove(&mut self, name: &str) -> PlannerResult<()> {
        let pos = self
            .position(name)
            .ok_or_else(|| PlannerError::UnknownFormat(name.to_string()))?;
        self.formats.remove(pos);
        Ok(())
    }
}
