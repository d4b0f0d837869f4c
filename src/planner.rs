//! Builds the list of moves for a directory.
//!
//! Only direct children that are regular files are planned. Subfolders
//! (including category folders from an earlier run), symlinks and special
//! files are left alone.

use crate::classifier::{Classification, Classifier};
use crate::config::CompiledFilters;
use crate::error::{OrganizeError, OrganizeResult};
use std::fs;
use std::path::{Path, PathBuf};

/// A planned move for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Absolute path of the file as it is now.
    pub source_path: PathBuf,
    pub file_name: String,
    pub category_id: String,
    /// Subfolder of the base directory the file goes into.
    pub folder_name: String,
    pub label: String,
    pub rationale: String,
}

impl Action {
    fn new(source_path: PathBuf, file_name: String, decision: Classification) -> Self {
        Self {
            source_path,
            file_name,
            category_id: decision.category_id,
            folder_name: decision.folder_name,
            label: decision.label,
            rationale: decision.rationale,
        }
    }
}

/// Scans a directory and classifies each eligible file.
#[derive(Debug, Default)]
pub struct PlanBuilder {
    classifier: Classifier,
    filters: CompiledFilters,
    ignored: Vec<PathBuf>,
}

impl PlanBuilder {
    pub fn new(classifier: Classifier, filters: CompiledFilters) -> Self {
        Self {
            classifier,
            filters,
            ignored: Vec::new(),
        }
    }

    /// Never plans the file at `path`, e.g. the move log itself.
    ///
    /// Nothing is recorded if the file does not exist yet, since it cannot
    /// show up in a listing either.
    pub fn ignore_path(mut self, path: &Path) -> Self {
        if let Ok(canonical) = fs::canonicalize(path) {
            self.ignored.push(canonical);
        }
        self
    }

    /// Returns one action per eligible file in `directory`.
    ///
    /// The order follows the filesystem listing and is not guaranteed to be
    /// stable across platforms.
    ///
    /// # Errors
    ///
    /// [`OrganizeError::DirectoryNotFound`] if `directory` is missing or is
    /// not a directory. Nothing is touched in that case.
    pub fn build_plan(&self, directory: &Path) -> OrganizeResult<Vec<Action>> {
        if !directory.is_dir() {
            return Err(OrganizeError::DirectoryNotFound {
                path: directory.to_path_buf(),
            });
        }

        let base = fs::canonicalize(directory).map_err(|_| OrganizeError::DirectoryNotFound {
            path: directory.to_path_buf(),
        })?;
        let entries = fs::read_dir(&base)?;

        let mut actions = Vec::new();
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_file() {
                tracing::debug!(path = %entry.path().display(), "skipping non-regular entry");
                continue;
            }

            let path = entry.path();
            if self.ignored.contains(&path) || !self.filters.should_include(&path) {
                tracing::debug!(path = %path.display(), "excluded from plan");
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            let decision = self.classifier.classify(&file_name);
            actions.push(Action::new(path, file_name, decision));
        }

        Ok(actions)
    }
}
