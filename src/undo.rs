/// Reverting the most recent organize run.
///
/// Undo reads the stored move log and moves every file back to where it
/// came from. Records whose file has since disappeared are skipped, and a
/// record whose original location is occupied again is reported as a
/// conflict instead of overwriting anything. The log is deleted afterwards
/// in every case: an undo is one-shot and cannot be resumed. Category folders
/// the organize run created are removed again once empty; folders that were
/// already there are left alone.
use crate::error::{OrganizeError, OrganizeResult};
use crate::file_organizer::move_file;
use crate::log_store::{LogStore, MoveRecord};
use std::fs;
use std::path::PathBuf;

/// Represents the result of an undo operation.
#[derive(Debug, Default)]
pub struct UndoReport {
    /// Original paths of the files moved back.
    pub restored: Vec<PathBuf>,
    /// Files no longer present where the log expected them.
    pub skipped: Vec<(PathBuf, String)>,
    /// Files left in their category folder because the original path is taken.
    pub conflicts: Vec<(PathBuf, String)>,
    /// Files that could not be moved back for another reason.
    pub failed: Vec<(PathBuf, String)>,
    /// Folders created by the organize run and removed because they ended up empty.
    pub removed_folders: Vec<PathBuf>,
}

impl UndoReport {
    pub fn restored_count(&self) -> usize {
        self.restored.len()
    }

    /// Returns the total number of records processed.
    pub fn total_processed(&self) -> usize {
        self.restored.len() + self.skipped.len() + self.conflicts.len() + self.failed.len()
    }

    /// Returns true if every record was restored.
    pub fn is_complete_success(&self) -> bool {
        self.skipped.is_empty() && self.conflicts.is_empty() && self.failed.is_empty()
    }
}

/// Manages undo operations for file organization.
pub struct UndoManager;

enum Restore {
    Done,
    Missing(String),
    Conflict(String),
}

impl UndoManager {
    /// Undoes the run recorded in `store`.
    ///
    /// # Errors
    ///
    /// [`OrganizeError::NoLogFound`] when there is nothing to undo; nothing is
    /// touched in that case. An unreadable log is also returned as an error and
    /// left in place.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tidyup::log_store::LogStore;
    /// use tidyup::undo::UndoManager;
    ///
    /// let store = LogStore::new("tidyup_moves.json");
    /// match UndoManager::undo(&store) {
    ///     Ok(report) => println!("Restored {} files", report.restored_count()),
    ///     Err(e) => eprintln!("Undo failed: {}", e),
    /// }
    /// ```
    pub fn undo(store: &LogStore) -> OrganizeResult<UndoReport> {
        let log = store.load()?;

        let mut report = UndoReport::default();
        for record in &log.moves {
            match Self::restore_file(record) {
                Ok(Restore::Done) => {
                    tracing::debug!(path = %record.original_path.display(), "restored");
                    report.restored.push(record.original_path.clone());
                }
                Ok(Restore::Missing(reason)) => {
                    tracing::debug!(path = %record.new_path.display(), "skipping missing file");
                    report.skipped.push((record.new_path.clone(), reason));
                }
                Ok(Restore::Conflict(reason)) => {
                    tracing::debug!(path = %record.original_path.display(), "original path is taken");
                    report.conflicts.push((record.new_path.clone(), reason));
                }
                Err(e) => {
                    tracing::debug!(path = %record.new_path.display(), error = %e, "restore failed");
                    report.failed.push((record.new_path.clone(), e.to_string()));
                }
            }
        }

        // remove_dir refuses non-empty folders, so anything left inside stays
        for folder in log.created_folders.iter().rev() {
            if fs::remove_dir(folder).is_ok() {
                tracing::debug!(folder = %folder.display(), "removed empty folder");
                report.removed_folders.push(folder.clone());
            }
        }

        store.clear()?;
        Ok(report)
    }

    /// Moves a single file back to its original location.
    fn restore_file(record: &MoveRecord) -> OrganizeResult<Restore> {
        if fs::symlink_metadata(&record.new_path).is_err() {
            return Ok(Restore::Missing(
                "File not found at expected location".to_string(),
            ));
        }

        if fs::symlink_metadata(&record.original_path).is_ok() {
            return Ok(Restore::Conflict(format!(
                "{} already exists",
                record.original_path.display()
            )));
        }

        if let Some(parent) = record.original_path.parent() {
            fs::create_dir_all(parent).map_err(|e| OrganizeError::MoveFailed {
                from: record.new_path.clone(),
                to: record.original_path.clone(),
                reason: format!("cannot recreate {}: {}", parent.display(), e),
            })?;
        }

        move_file(&record.new_path, &record.original_path)?;
        Ok(Restore::Done)
    }
}
