//! Orchestration of the organize and revert commands.
//!
//! Organize runs the full pipeline: load configuration, pick the directory,
//! build the plan, ask for confirmation, apply, and print a summary.
//! Revert hands the stored log to the undo engine.

use crate::classifier::Classifier;
use crate::config::AppConfig;
use crate::error::OrganizeResult;
use crate::file_organizer::{ApplyReport, FileOrganizer};
use crate::log_store::LogStore;
use crate::output::OutputFormatter;
use crate::planner::PlanBuilder;
use crate::prompt::{Prompter, default_directory, expand_tilde};
use crate::undo::{UndoManager, UndoReport};
use std::path::PathBuf;

/// Represents a CLI command to execute.
#[derive(Debug, Clone)]
pub enum OrganizeCommand {
    /// Organize a directory. Without a path the user is asked for one.
    Organize { directory: Option<PathBuf> },
    /// Put back the files moved by the last organize run.
    Revert,
}

/// Settings shared by both commands.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Explicit configuration file.
    pub config_path: Option<PathBuf>,
    /// Overrides the configured move log location.
    pub log_file: Option<PathBuf>,
}

/// How a successful run ended.
#[derive(Debug)]
pub enum Outcome {
    Applied(ApplyReport),
    /// The user declined; nothing was changed.
    Declined { planned: usize },
    /// The directory had no files to organize.
    NothingToDo,
    Reverted(UndoReport),
}

/// Runs a command, asking questions through `prompter`.
///
/// # Examples
///
/// ```no_run
/// use tidyup::cli::{OrganizeCommand, RunOptions, run_cli};
/// use tidyup::prompt::StdioPrompter;
///
/// let mut prompter = StdioPrompter::default();
/// let result = run_cli(OrganizeCommand::Revert, &RunOptions::default(), &mut prompter);
/// if let Err(e) = result {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(
    command: OrganizeCommand,
    options: &RunOptions,
    prompter: &mut dyn Prompter,
) -> OrganizeResult<Outcome> {
    let config = AppConfig::load(options.config_path.as_deref())?;
    let store = LogStore::new(
        options
            .log_file
            .clone()
            .unwrap_or_else(|| config.log_path()),
    );

    match command {
        OrganizeCommand::Organize { directory } => {
            organize_directory(&config, &store, directory, prompter)
        }
        OrganizeCommand::Revert => revert(&store).map(Outcome::Reverted),
    }
}

/// Plans, confirms and applies the organization of one directory.
fn organize_directory(
    config: &AppConfig,
    store: &LogStore,
    directory: Option<PathBuf>,
    prompter: &mut dyn Prompter,
) -> OrganizeResult<Outcome> {
    // Validate everything configurable before touching the filesystem.
    let classifier = Classifier::new(config.category_table()?);
    let filters = config.compile_filters()?;

    let directory = match directory {
        Some(dir) => dir,
        None => {
            let default = default_directory(config.default_directory.as_deref());
            prompter.ask_directory(&expand_tilde(&default))?
        }
    };
    let directory = expand_tilde(&directory);

    let plan = PlanBuilder::new(classifier, filters)
        .ignore_path(store.path())
        .build_plan(&directory)?;

    if plan.is_empty() {
        OutputFormatter::success("No files to organize.");
        return Ok(Outcome::NothingToDo);
    }

    if !prompter.confirm(&plan)? {
        OutputFormatter::info("Cancelled. Everything stays as it was.");
        return Ok(Outcome::Declined {
            planned: plan.len(),
        });
    }

    OutputFormatter::info(&format!("Organizing contents of: {}", directory.display()));
    let report = FileOrganizer::apply(&plan, &directory, store)?;
    OutputFormatter::apply_summary(&report, store.path());
    Ok(Outcome::Applied(report))
}

/// Undoes the previous organization.
fn revert(store: &LogStore) -> OrganizeResult<UndoReport> {
    OutputFormatter::info("Undoing the last organization...");
    let report = UndoManager::undo(store)?;
    OutputFormatter::undo_summary(&report);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrganizeError;
    use crate::planner::Action;
    use std::fs;
    use std::io;
    use std::path::Path;
    use tempfile::TempDir;

    struct Scripted {
        answer: bool,
        asked: usize,
    }

    impl Prompter for Scripted {
        fn ask_directory(&mut self, default: &Path) -> io::Result<PathBuf> {
            Ok(default.to_path_buf())
        }

        fn confirm(&mut self, _actions: &[Action]) -> io::Result<bool> {
            self.asked += 1;
            Ok(self.answer)
        }
    }

    fn options(dir: &Path) -> RunOptions {
        let config = dir.join("config.toml");
        fs::write(&config, "").unwrap();
        RunOptions {
            config_path: Some(config),
            log_file: Some(dir.join("moves.json")),
        }
    }

    #[test]
    fn test_empty_directory_asks_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("empty");
        fs::create_dir(&target).unwrap();
        let mut prompter = Scripted { answer: true, asked: 0 };

        let outcome = run_cli(
            OrganizeCommand::Organize {
                directory: Some(target),
            },
            &options(temp_dir.path()),
            &mut prompter,
        )
        .unwrap();

        assert!(matches!(outcome, Outcome::NothingToDo));
        assert_eq!(prompter.asked, 0);
        assert!(!temp_dir.path().join("moves.json").exists());
    }

    #[test]
    fn test_missing_directory_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut prompter = Scripted { answer: true, asked: 0 };

        let err = run_cli(
            OrganizeCommand::Organize {
                directory: Some(temp_dir.path().join("missing")),
            },
            &options(temp_dir.path()),
            &mut prompter,
        )
        .unwrap_err();

        assert!(matches!(err, OrganizeError::DirectoryNotFound { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_invalid_config_aborts_before_planning() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("inbox");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("a.txt"), "a").unwrap();
        let config = temp_dir.path().join("bad.toml");
        fs::write(&config, "[filters.exclude]\nregex = [\"(\"]").unwrap();
        let mut prompter = Scripted { answer: true, asked: 0 };

        let err = run_cli(
            OrganizeCommand::Organize {
                directory: Some(target.clone()),
            },
            &RunOptions {
                config_path: Some(config),
                log_file: Some(temp_dir.path().join("moves.json")),
            },
            &mut prompter,
        )
        .unwrap_err();

        assert_eq!(err.exit_code(), 3);
        assert!(target.join("a.txt").exists());
    }

    #[test]
    fn test_revert_without_log() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut prompter = Scripted { answer: true, asked: 0 };

        let err = run_cli(OrganizeCommand::Revert, &options(temp_dir.path()), &mut prompter)
            .unwrap_err();
        assert!(matches!(err, OrganizeError::NoLogFound { .. }));
        assert_eq!(err.exit_code(), 2);
    }
}
