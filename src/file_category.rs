/// Category table for sorting files by extension.
///
/// A table is an ordered list of [`CategoryRule`]s. Lookups scan the rules in
/// declaration order and the first rule claiming an extension wins, so two
/// rules may overlap without ambiguity. Anything unmatched lands in the
/// fallback category.
///
/// # Examples
///
/// ```
/// use tidyup::file_category::CategoryTable;
///
/// let table = CategoryTable::standard();
/// assert_eq!(table.lookup(".png").id, "photos");
/// assert_eq!(table.lookup(".PDF").id, "documents");
/// assert_eq!(table.lookup(".xyz").id, "other");
/// ```
use std::collections::BTreeSet;

/// Identifier of the category used when no rule matches.
pub const FALLBACK_ID: &str = "other";
/// Folder created for files in the fallback category.
pub const FALLBACK_FOLDER: &str = "Other";
/// Display label of the fallback category.
pub const FALLBACK_LABEL: &str = "📁 Other";
/// Rationale shown for files in the fallback category.
pub const FALLBACK_RATIONALE: &str = "Does not clearly match any known category.";

/// One entry of the category table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    /// Stable identifier, e.g. `photos`.
    pub id: String,
    /// Name of the subfolder files of this category are moved into.
    pub folder_name: String,
    /// Decorative text for previews. Never used to derive a path.
    pub label: String,
    /// Lowercase extensions including the leading dot.
    pub extensions: BTreeSet<String>,
    /// Why files of this kind belong together.
    pub rationale: String,
}

impl CategoryRule {
    /// Creates a rule, normalising every extension to lowercase with a leading dot.
    pub fn new<I, S>(id: &str, folder_name: &str, label: &str, extensions: I, rationale: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            id: id.to_string(),
            folder_name: folder_name.to_string(),
            label: label.to_string(),
            extensions: extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .filter(|ext| !ext.is_empty())
                .collect(),
            rationale: rationale.to_string(),
        }
    }

    /// Returns true if this rule claims the given (normalised) extension.
    pub fn matches(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }
}

/// Lowercases an extension and makes sure it starts with a dot.
///
/// An empty input stays empty so that it can never match a rule.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.is_empty() || ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Ordered mapping from extensions to categories.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
    fallback: CategoryRule,
}

impl CategoryTable {
    /// Builds a table from rules in priority order.
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self {
            rules,
            fallback: CategoryRule::new(
                FALLBACK_ID,
                FALLBACK_FOLDER,
                FALLBACK_LABEL,
                Vec::<String>::new(),
                FALLBACK_RATIONALE,
            ),
        }
    }

    /// The built-in table of common download categories.
    pub fn standard() -> Self {
        Self::new(vec![
            CategoryRule::new(
                "photos",
                "Photos",
                "📸 Photos & screenshots",
                [".jpg", ".jpeg", ".png", ".webp", ".bmp"],
                "Common images: photos, screenshots or graphics.",
            ),
            CategoryRule::new(
                "documents",
                "Documents",
                "📄 Documents",
                [".pdf", ".docx", ".doc", ".txt", ".xlsx", ".pptx"],
                "Files for work, study or reading.",
            ),
            CategoryRule::new(
                "videos",
                "Videos",
                "🎥 Videos",
                [".mp4", ".mkv", ".avi", ".mov"],
                "Audiovisual content that is probably not temporary.",
            ),
            CategoryRule::new(
                "music",
                "Music",
                "🎵 Music & audio",
                [".mp3", ".wav", ".ogg", ".flac"],
                "Sound files meant for listening, not short-lived effects.",
            ),
            CategoryRule::new(
                "archives",
                "Archives",
                "📦 Archives",
                [".zip", ".rar", ".7z", ".tar.gz"],
                "They contain other files; better kept together.",
            ),
            CategoryRule::new(
                "programs",
                "Programs",
                "⚙️ Programs & installers",
                [".exe", ".msi", ".bat"],
                "Downloaded software. Useful to keep apart for safety.",
            ),
        ])
    }

    /// Finds the rule for an extension, or the fallback rule.
    ///
    /// Comparison is case-insensitive and the first matching rule in table
    /// order wins. An empty extension always yields the fallback.
    pub fn lookup(&self, extension: &str) -> &CategoryRule {
        let extension = normalize_extension(extension);
        if extension.is_empty() {
            return &self.fallback;
        }

        self.rules
            .iter()
            .find(|rule| rule.matches(&extension))
            .unwrap_or(&self.fallback)
    }

    /// The rules in priority order, without the fallback.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// The rule used when nothing matches.
    pub fn fallback(&self) -> &CategoryRule {
        &self.fallback
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::standard()
    }
}
