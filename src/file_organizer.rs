/// Executes a plan by moving files into their category folders.
///
/// Category folders are created directly under the base directory as
/// needed. A file that cannot be moved is reported and skipped; the rest of
/// the batch still runs. Every successful move is recorded, and the resulting
/// log is persisted once the whole batch has been processed.
use crate::error::{OrganizeError, OrganizeResult};
use crate::log_store::{LogStore, MoveLog, MoveRecord};
use crate::output::OutputFormatter;
use crate::planner::Action;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Outcome of applying a plan.
#[derive(Debug)]
pub struct ApplyReport {
    /// Moves that happened, as persisted to the log store.
    pub log: MoveLog,
    /// Files left in place, with the reason.
    pub failures: Vec<(PathBuf, String)>,
    /// Number of files moved per category folder.
    pub category_counts: BTreeMap<String, usize>,
}

impl ApplyReport {
    pub fn moved(&self) -> usize {
        self.log.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A completed move, plus the category folder it created, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub record: MoveRecord,
    pub created_folder: Option<PathBuf>,
}

/// Moves files into category subdirectories.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Applies every action in order and persists the resulting log.
    ///
    /// The log is written even when no file was moved, replacing whatever
    /// log was stored before.
    ///
    /// # Errors
    ///
    /// Per-file failures never abort the batch; they end up in
    /// [`ApplyReport::failures`]. The only error returned is a failure to
    /// persist the log, after all moves have been attempted.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tidyup::file_organizer::FileOrganizer;
    /// use tidyup::log_store::LogStore;
    /// use tidyup::planner::PlanBuilder;
    /// use std::path::Path;
    ///
    /// let base = Path::new("/path/to/downloads");
    /// let plan = PlanBuilder::default().build_plan(base).unwrap();
    /// let store = LogStore::new("tidyup_moves.json");
    /// let report = FileOrganizer::apply(&plan, base, &store).unwrap();
    /// println!("moved {} files", report.moved());
    /// ```
    pub fn apply(actions: &[Action], base_path: &Path, store: &LogStore) -> OrganizeResult<ApplyReport> {
        let base_path = fs::canonicalize(base_path).unwrap_or_else(|_| base_path.to_path_buf());
        let mut report = ApplyReport {
            log: MoveLog::new(base_path.clone()),
            failures: Vec::new(),
            category_counts: BTreeMap::new(),
        };

        let progress = OutputFormatter::create_progress_bar(actions.len() as u64);
        for action in actions {
            progress.set_message(action.file_name.clone());
            match Self::move_to_category_with_record(&base_path, &action.source_path, &action.folder_name) {
                Ok(Placement {
                    record,
                    created_folder,
                }) => {
                    tracing::debug!(
                        from = %record.original_path.display(),
                        to = %record.new_path.display(),
                        "moved"
                    );
                    *report
                        .category_counts
                        .entry(action.folder_name.clone())
                        .or_insert(0) += 1;
                    if let Some(folder) = created_folder {
                        report.log.push_created_folder(folder);
                    }
                    report.log.push(record);
                }
                Err(e) => {
                    tracing::debug!(file = %action.source_path.display(), error = %e, "move failed");
                    report.failures.push((action.source_path.clone(), e.to_string()));
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        if let Err(e) = store.save(&report.log) {
            tracing::error!(moved = report.moved(), error = %e, "moves done but log not saved");
            return Err(e);
        }
        Ok(report)
    }

    /// Moves one file into `base_path/category_dir_name` and records the move.
    ///
    /// The category directory is created if missing. An existing file at the
    /// destination is never overwritten: the move fails with
    /// [`OrganizeError::DestinationExists`] and the source stays untouched.
    /// A folder this call creates is reported in [`Placement::created_folder`];
    /// if the move then fails, the new folder is removed again.
    pub fn move_to_category_with_record(
        base_path: &Path,
        file_path: &Path,
        category_dir_name: &str,
    ) -> OrganizeResult<Placement> {
        if !base_path.is_dir() {
            return Err(OrganizeError::DirectoryNotFound {
                path: base_path.to_path_buf(),
            });
        }

        let category_path = base_path.join(category_dir_name);
        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::MoveFailed {
                from: file_path.to_path_buf(),
                to: category_path.clone(),
                reason: "file has no name component".to_string(),
            })?;
        let destination_path = category_path.join(file_name);

        let created_folder = match fs::create_dir(&category_path) {
            Ok(()) => Some(category_path.clone()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && category_path.is_dir() => None,
            Err(e) => {
                return Err(OrganizeError::MoveFailed {
                    from: file_path.to_path_buf(),
                    to: destination_path,
                    reason: format!("cannot create folder {}: {}", category_path.display(), e),
                });
            }
        };

        // symlink_metadata so a dangling link at the destination also counts
        if fs::symlink_metadata(&destination_path).is_ok() {
            return Err(OrganizeError::DestinationExists {
                path: destination_path,
            });
        }

        if let Err(e) = move_file(file_path, &destination_path) {
            if let Some(folder) = &created_folder {
                let _ = fs::remove_dir(folder);
            }
            return Err(e);
        }

        Ok(Placement {
            record: MoveRecord {
                original_path: file_path.to_path_buf(),
                new_path: destination_path,
            },
            created_folder,
        })
    }
}

/// Renames `from` to `to`, copying across filesystems when a rename is impossible.
pub(crate) fn move_file(from: &Path, to: &Path) -> OrganizeResult<()> {
    let failed = |e: std::io::Error| OrganizeError::MoveFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        reason: e.to_string(),
    };

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            tracing::debug!(from = %from.display(), "rename crosses devices, copying instead");
            fs::copy(from, to).map_err(failed)?;
            if let Err(e) = fs::remove_file(from) {
                let _ = fs::remove_file(to);
                return Err(failed(e));
            }
            Ok(())
        }
        Err(e) => Err(failed(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::PlanBuilder;
    use tempfile::TempDir;

    #[test]
    fn test_move_to_category_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let file_path = base_path.join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let placement = FileOrganizer::move_to_category_with_record(base_path, &file_path, "Documents")
            .expect("Failed to move file");
        let record = placement.record;

        let category_dir = base_path.join("Documents");
        assert!(category_dir.is_dir());
        assert_eq!(placement.created_folder, Some(category_dir.clone()));
        assert!(!file_path.exists());
        assert_eq!(record.original_path, file_path);
        assert_eq!(record.new_path, category_dir.join("test.txt"));
        assert!(record.new_path.exists());
    }

    #[test]
    fn test_move_to_category_uses_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let category_dir = base_path.join("Photos");
        fs::create_dir(&category_dir).expect("Failed to create category directory");
        let file_path = base_path.join("test.png");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let placement = FileOrganizer::move_to_category_with_record(base_path, &file_path, "Photos")
            .expect("Failed to move file");

        assert_eq!(placement.created_folder, None);
        assert!(!file_path.exists());
        assert!(category_dir.join("test.png").exists());
    }

    #[test]
    fn test_move_refuses_to_overwrite() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        fs::create_dir(base_path.join("Documents")).unwrap();
        fs::write(base_path.join("Documents").join("notes.txt"), "old").unwrap();
        let file_path = base_path.join("notes.txt");
        fs::write(&file_path, "new").unwrap();

        let result = FileOrganizer::move_to_category_with_record(base_path, &file_path, "Documents");
        assert!(matches!(result, Err(OrganizeError::DestinationExists { .. })));
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new");
        assert_eq!(
            fs::read_to_string(base_path.join("Documents").join("notes.txt")).unwrap(),
            "old"
        );
    }

    #[test]
    fn test_move_fails_when_folder_name_is_a_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        fs::write(base_path.join("Music"), "not a folder").unwrap();
        let file_path = base_path.join("song.mp3");
        fs::write(&file_path, "x").unwrap();

        let result = FileOrganizer::move_to_category_with_record(base_path, &file_path, "Music");
        assert!(matches!(result, Err(OrganizeError::MoveFailed { .. })));
        assert!(file_path.exists());
    }

    #[test]
    fn test_move_invalid_base_path() {
        let result = FileOrganizer::move_to_category_with_record(
            Path::new("/non/existent/path"),
            Path::new("/some/file.txt"),
            "Documents",
        );
        assert!(matches!(result, Err(OrganizeError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_apply_writes_log_and_counts() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path().join("inbox");
        fs::create_dir(&base_path).unwrap();
        for name in ["a.png", "b.jpg", "c.txt"] {
            fs::write(base_path.join(name), name).unwrap();
        }
        let store = LogStore::new(temp_dir.path().join("moves.json"));

        let plan = PlanBuilder::default().build_plan(&base_path).unwrap();
        let report = FileOrganizer::apply(&plan, &base_path, &store).unwrap();

        assert_eq!(report.moved(), 3);
        assert!(report.is_complete_success());
        assert_eq!(report.category_counts.get("Photos"), Some(&2));
        assert_eq!(report.category_counts.get("Documents"), Some(&1));
        assert_eq!(store.load().unwrap().moves, report.log.moves);
        let mut created = store.load().unwrap().created_folders;
        created.sort();
        assert_eq!(created, vec![base_path.join("Documents"), base_path.join("Photos")]);
    }

    #[test]
    fn test_apply_records_only_folders_it_created() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path().join("inbox");
        fs::create_dir(&base_path).unwrap();
        fs::create_dir(base_path.join("Photos")).unwrap();
        fs::write(base_path.join("a.png"), "png").unwrap();
        fs::write(base_path.join("b.txt"), "txt").unwrap();
        let store = LogStore::new(temp_dir.path().join("moves.json"));

        let plan = PlanBuilder::default().build_plan(&base_path).unwrap();
        let report = FileOrganizer::apply(&plan, &base_path, &store).unwrap();

        assert_eq!(report.moved(), 2);
        assert_eq!(report.log.created_folders, vec![base_path.join("Documents")]);
    }

    #[test]
    fn test_apply_empty_plan_still_writes_log() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = LogStore::new(temp_dir.path().join("moves.json"));

        let report = FileOrganizer::apply(&[], temp_dir.path(), &store).unwrap();
        assert_eq!(report.moved(), 0);
        assert!(store.exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_apply_continues_after_failure() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path().join("inbox");
        fs::create_dir(&base_path).unwrap();
        for name in ["one.txt", "two.txt", "three.png"] {
            fs::write(base_path.join(name), name).unwrap();
        }
        let store = LogStore::new(temp_dir.path().join("moves.json"));
        let plan = PlanBuilder::default().build_plan(&base_path).unwrap();

        // occupy one destination so exactly one move fails
        fs::create_dir(base_path.join("Documents")).unwrap();
        fs::write(base_path.join("Documents").join("two.txt"), "taken").unwrap();

        let report = FileOrganizer::apply(&plan, &base_path, &store).unwrap();
        assert_eq!(report.moved(), 2);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].0.ends_with("two.txt"));
        assert!(base_path.join("two.txt").exists());
        assert_eq!(store.load().unwrap().len(), 2);
    }
}
