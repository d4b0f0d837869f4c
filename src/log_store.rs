/// Persistence of the move log.
///
/// The store holds at most one log: every successful run overwrites it and a
/// completed undo deletes it. The document is pretty-printed JSON:
///
/// ```json
/// {
///   "version": 1,
///   "createdAt": "2026-10-19T08:15:00+00:00",
///   "baseDirectory": "/home/me/Downloads",
///   "moves": [
///     { "originalPath": "/home/me/Downloads/a.png", "newPath": "/home/me/Downloads/Photos/a.png" }
///   ],
///   "createdFolders": ["/home/me/Downloads/Photos"]
/// }
/// ```
///
/// Logs written before the version tag existed were a bare array of moves;
/// those still load, as version 0. Both the `originalPath`/`newPath` keys and
/// the older `origen`/`destino` keys are accepted in that form.
use crate::error::{OrganizeError, OrganizeResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Latest log format this build writes and reads.
pub const LOG_VERSION: u32 = 1;

/// One completed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    #[serde(alias = "origen")]
    pub original_path: PathBuf,
    #[serde(alias = "destino")]
    pub new_path: PathBuf,
}

/// The moves of one organize run, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveLog {
    pub version: u32,
    /// RFC 3339 timestamp of the run.
    pub created_at: String,
    #[serde(default)]
    pub base_directory: Option<PathBuf>,
    pub moves: Vec<MoveRecord>,
    /// Category folders this run had to create. Only these are removed by undo.
    #[serde(default)]
    pub created_folders: Vec<PathBuf>,
}

impl MoveLog {
    /// Creates an empty log for a run over `base_directory`.
    pub fn new(base_directory: PathBuf) -> Self {
        Self {
            version: LOG_VERSION,
            created_at: chrono::Utc::now().to_rfc3339(),
            base_directory: Some(base_directory),
            moves: Vec::new(),
            created_folders: Vec::new(),
        }
    }

    pub fn push(&mut self, record: MoveRecord) {
        self.moves.push(record);
    }

    pub fn push_created_folder(&mut self, folder: PathBuf) {
        if !self.created_folders.contains(&folder) {
            self.created_folders.push(folder);
        }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Reads and writes the move log at a fixed path.
#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes the log, replacing any previous one.
    ///
    /// The document goes to a sibling temporary file first and is then
    /// renamed into place, so readers never see a half-written log.
    pub fn save(&self, log: &MoveLog) -> OrganizeResult<()> {
        let json = serde_json::to_string_pretty(log).map_err(|e| OrganizeError::LogWriteFailed {
            path: self.path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| OrganizeError::LogWriteFailed {
                path: self.path.clone(),
                source: e,
            })?;
        }

        let tmp_path = self.temp_path();
        fs::write(&tmp_path, json).map_err(|e| OrganizeError::LogWriteFailed {
            path: tmp_path.clone(),
            source: e,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            OrganizeError::LogWriteFailed {
                path: self.path.clone(),
                source: e,
            }
        })?;

        tracing::debug!(path = %self.path.display(), moves = log.len(), "saved move log");
        Ok(())
    }

    /// Reads the stored log.
    ///
    /// Fails with [`OrganizeError::NoLogFound`] when there is nothing to load.
    pub fn load(&self) -> OrganizeResult<MoveLog> {
        if !self.exists() {
            return Err(OrganizeError::NoLogFound {
                path: self.path.clone(),
            });
        }

        let content = fs::read_to_string(&self.path).map_err(|e| OrganizeError::LogReadFailed {
            path: self.path.clone(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Deletes the stored log. Deleting an absent log is not an error.
    pub fn clear(&self) -> OrganizeResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(OrganizeError::LogWriteFailed {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn parse(content: &str) -> OrganizeResult<MoveLog> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| OrganizeError::InvalidLogFormat {
                reason: format!("JSON parse error: {}", e),
            })?;

        if value.is_array() {
            let moves: Vec<MoveRecord> =
                serde_json::from_value(value).map_err(|e| OrganizeError::InvalidLogFormat {
                    reason: format!("invalid move record: {}", e),
                })?;
            return Ok(MoveLog {
                version: 0,
                created_at: String::new(),
                base_directory: None,
                moves,
                created_folders: Vec::new(),
            });
        }

        let version = value
            .as_object()
            .ok_or_else(|| OrganizeError::InvalidLogFormat {
                reason: "expected an object or an array of moves".to_string(),
            })?
            .get("version")
            .and_then(Value::as_u64)
            .ok_or_else(|| OrganizeError::InvalidLogFormat {
                reason: "missing or invalid 'version' field".to_string(),
            })?;

        let version = u32::try_from(version).unwrap_or(u32::MAX);
        if version > LOG_VERSION {
            return Err(OrganizeError::UnsupportedLogVersion {
                found: version,
                supported: LOG_VERSION,
            });
        }
        serde_json::from_value(value).map_err(|e| OrganizeError::InvalidLogFormat {
            reason: e.to_string(),
        })
    }
}
