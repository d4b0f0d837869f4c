//! Configuration loaded from TOML.
//!
//! The configuration controls three things:
//! - which files the planner skips (exact names, globs, extensions, regexes)
//! - the category table, when the built-in one does not fit
//! - where the move log lives and which directory is offered by default
//!
//! # Configuration File Format
//!
//! ```toml
//! log_file = "tidyup_moves.json"
//! default_directory = "~/Downloads"
//!
//! [filters]
//! enable_hidden_files = true
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.part"]
//! extensions = ["crdownload"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//!
//! [[categories]]
//! id = "ebooks"
//! folder = "Books"
//! label = "📚 Books"
//! extensions = [".epub", ".mobi"]
//! rationale = "Reading material."
//! ```

use crate::file_category::{CategoryRule, CategoryTable};
use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the move log when none is configured, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "tidyup_moves.json";

/// Name of the configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".tidyuprc.toml";

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    Io(String),
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Location of the move log. Relative paths resolve against the working directory.
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Directory offered when the user leaves the directory prompt blank.
    #[serde(default)]
    pub default_directory: Option<PathBuf>,

    #[serde(default)]
    pub filters: FilterRules,

    /// Replaces the built-in category table when non-empty.
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,
}

/// A category as written in the configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    pub id: String,
    /// Folder name; defaults to the id.
    #[serde(default)]
    pub folder: Option<String>,
    /// Display label; defaults to the folder name.
    #[serde(default)]
    pub label: Option<String>,
    pub extensions: Vec<String>,
    #[serde(default)]
    pub rationale: String,
}

impl CategoryEntry {
    fn into_rule(self) -> CategoryRule {
        let folder = self.folder.unwrap_or_else(|| self.id.clone());
        let label = self.label.unwrap_or_else(|| folder.clone());
        CategoryRule::new(&self.id, &folder, &label, self.extensions, &self.rationale)
    }
}

/// File filtering rules.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterRules {
    /// Whether files starting with "." are organized. Defaults to true.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

fn default_enable_hidden_files() -> bool {
    true
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: default_enable_hidden_files(),
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeRules {
    #[serde(default)]
    pub filenames: Vec<String>,

    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions, with or without the leading dot.
    #[serde(default)]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub regex: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl AppConfig {
    /// Loads configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if provided (must exist)
    /// 2. `.tidyuprc.toml` in the current directory
    /// 3. `<home>/.config/tidyup/config.toml`
    /// 4. built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config").join("tidyup").join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Loads configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// The category table to classify with.
    pub fn category_table(&self) -> Result<CategoryTable, ConfigError> {
        if self.categories.is_empty() {
            return Ok(CategoryTable::standard());
        }

        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(self.categories.len());
        for entry in &self.categories {
            if !seen.insert(entry.id.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate category id '{}'",
                    entry.id
                )));
            }
            let rule = entry.clone().into_rule();
            if rule.folder_name.is_empty()
                || rule.folder_name.contains(['/', '\\'])
                || rule.folder_name == "."
                || rule.folder_name == ".."
            {
                return Err(ConfigError::Invalid(format!(
                    "category '{}' has an invalid folder name '{}'",
                    rule.id, rule.folder_name
                )));
            }
            rules.push(rule);
        }
        Ok(CategoryTable::new(rules))
    }

    /// The configured log path, or the default one.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }

    /// Compiles the filter rules for matching.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }
}

/// Pre-compiled filters, ready for matching file paths.
#[derive(Debug)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl Default for CompiledFilters {
    /// Filters that let every file through.
    fn default() -> Self {
        Self {
            enable_hidden_files: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Checks whether a file takes part in organization.
    ///
    /// Patterns are matched against the file name. Include patterns win over
    /// everything else; then hidden files, exact names, extensions, globs and
    /// regexes each exclude.
    pub fn should_include(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self
            .include_patterns
            .iter()
            .any(|pattern| pattern.matches(&file_name))
        {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(&file_name))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_includes_everything() {
        let compiled = AppConfig::default().compile_filters().unwrap();
        assert!(compiled.should_include(Path::new(".DS_Store")));
        assert!(compiled.should_include(Path::new("photo.jpg")));
        assert!(compiled.should_include(Path::new("Makefile")));
    }

    #[test]
    fn test_default_log_path() {
        assert_eq!(AppConfig::default().log_path(), PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_parse_full_document() {
        let config = AppConfig::from_toml(
            r#"
            log_file = "/tmp/moves.json"
            default_directory = "~/Inbox"

            [filters]
            enable_hidden_files = false

            [filters.exclude]
            filenames = ["Thumbs.db"]
            extensions = [".part", "crdownload"]

            [[categories]]
            id = "ebooks"
            folder = "Books"
            extensions = [".epub", "MOBI"]
            rationale = "Reading material."
            "#,
        )
        .unwrap();

        assert_eq!(config.log_path(), PathBuf::from("/tmp/moves.json"));
        assert_eq!(config.default_directory, Some(PathBuf::from("~/Inbox")));

        let table = config.category_table().unwrap();
        assert_eq!(table.rules().len(), 1);
        let rule = table.lookup(".mobi");
        assert_eq!(rule.id, "ebooks");
        assert_eq!(rule.folder_name, "Books");
        assert_eq!(rule.label, "Books");

        let filters = config.compile_filters().unwrap();
        assert!(!filters.should_include(Path::new(".hidden")));
        assert!(!filters.should_include(Path::new("Thumbs.db")));
        assert!(!filters.should_include(Path::new("movie.PART")));
        assert!(!filters.should_include(Path::new("setup.crdownload")));
        assert!(filters.should_include(Path::new("book.epub")));
    }

    #[test]
    fn test_empty_categories_use_standard_table() {
        let table = AppConfig::default().category_table().unwrap();
        assert_eq!(table.lookup(".png").id, "photos");
    }

    #[test]
    fn test_duplicate_category_id_rejected() {
        let config = AppConfig::from_toml(
            r#"
            [[categories]]
            id = "a"
            extensions = [".x"]

            [[categories]]
            id = "a"
            extensions = [".y"]
            "#,
        )
        .unwrap();
        assert!(matches!(config.category_table(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_folder_with_separator_rejected() {
        let config = AppConfig::from_toml(
            r#"
            [[categories]]
            id = "nested"
            folder = "a/b"
            extensions = [".x"]
            "#,
        )
        .unwrap();
        assert!(config.category_table().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AppConfig::from_toml("filters = 3"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_explicit_config() {
        let result = AppConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_exclude_glob_and_regex() {
        let config = AppConfig {
            filters: FilterRules {
                exclude: ExcludeRules {
                    patterns: vec!["*.tmp".to_string()],
                    regex: vec![r"^~\$".to_string()],
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };
        let compiled = config.compile_filters().unwrap();

        assert!(!compiled.should_include(Path::new("/downloads/cache.tmp")));
        assert!(!compiled.should_include(Path::new("~$report.docx")));
        assert!(compiled.should_include(Path::new("report.docx")));
    }

    #[test]
    fn test_include_overrides_exclude() {
        let config = AppConfig {
            filters: FilterRules {
                enable_hidden_files: false,
                exclude: ExcludeRules {
                    extensions: vec!["log".to_string()],
                    ..Default::default()
                },
                include: IncludeRules {
                    patterns: vec!["keep*".to_string(), ".important".to_string()],
                },
            },
            ..Default::default()
        };
        let compiled = config.compile_filters().unwrap();

        assert!(compiled.should_include(Path::new("keep.log")));
        assert!(compiled.should_include(Path::new(".important")));
        assert!(!compiled.should_include(Path::new("debug.log")));
        assert!(!compiled.should_include(Path::new(".other")));
    }

    #[test]
    fn test_invalid_patterns_return_errors() {
        let bad_glob = AppConfig {
            filters: FilterRules {
                exclude: ExcludeRules {
                    patterns: vec!["[invalid".to_string()],
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            bad_glob.compile_filters(),
            Err(ConfigError::InvalidGlobPattern(_))
        ));

        let bad_regex = AppConfig {
            filters: FilterRules {
                exclude: ExcludeRules {
                    regex: vec!["[invalid(".to_string()],
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            bad_regex.compile_filters(),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));
    }
}
