//! tidyup - sort the files of a directory into category folders
//!
//! The pipeline is classify → preview → confirm → apply → undo. Files are
//! classified by extension against an ordered category table, the user sees
//! the plan before anything moves, and every completed move is written to a
//! log so the whole batch can be reverted later.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod file_category;
pub mod file_organizer;
pub mod log_store;
pub mod logging;
pub mod output;
pub mod planner;
pub mod prompt;
pub mod undo;

pub use classifier::{Classification, Classifier};
pub use config::{AppConfig, CompiledFilters, ConfigError};
pub use error::{OrganizeError, OrganizeResult};
pub use file_category::{CategoryRule, CategoryTable};
pub use file_organizer::{ApplyReport, FileOrganizer, Placement};
pub use log_store::{LogStore, MoveLog, MoveRecord};
pub use planner::{Action, PlanBuilder};
pub use prompt::{Prompter, StdioPrompter};
pub use undo::{UndoManager, UndoReport};

pub use cli::{OrganizeCommand, Outcome, RunOptions, run_cli};
