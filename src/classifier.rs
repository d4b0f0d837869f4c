//! Maps file names to categories.

use crate::file_category::CategoryTable;

/// The category decision for a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category_id: String,
    pub folder_name: String,
    pub label: String,
    pub rationale: String,
}

/// Derives the extension used for classification.
///
/// Returns the suffix after the final `.`, lowercased and including the dot.
/// Names without a dot, and dotfiles such as `.bashrc` with no further dot,
/// have no extension and yield an empty string.
///
/// ```
/// use tidyup::classifier::extension_of;
///
/// assert_eq!(extension_of("photo.JPG"), ".jpg");
/// assert_eq!(extension_of("backup.tar.gz"), ".gz");
/// assert_eq!(extension_of(".bashrc"), "");
/// assert_eq!(extension_of("Makefile"), "");
/// ```
pub fn extension_of(file_name: &str) -> String {
    let stem_start = if file_name.starts_with('.') { 1 } else { 0 };
    match file_name[stem_start..].rfind('.') {
        Some(idx) => file_name[stem_start + idx..].to_lowercase(),
        None => String::new(),
    }
}

/// Classifies file names against a category table. Pure, no I/O.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    table: CategoryTable,
}

impl Classifier {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Returns the category a file with this name belongs to.
    pub fn classify(&self, file_name: &str) -> Classification {
        let extension = extension_of(file_name);
        let rule = self.table.lookup(&extension);
        tracing::debug!(file = file_name, extension = %extension, category = %rule.id, "classified");

        Classification {
            category_id: rule.id.clone(),
            folder_name: rule.folder_name.clone(),
            label: rule.label.clone(),
            rationale: rule.rationale.clone(),
        }
    }
}
