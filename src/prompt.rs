//! Interactive questions: which directory to organize, and whether to proceed.
//!
//! The organize flow talks to the user only through the [`Prompter`] trait,
//! so tests and non-interactive callers can script the answers.

use crate::error::{OrganizeError, OrganizeResult};
use crate::output::OutputFormatter;
use crate::planner::Action;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Answers the questions asked during an organize run.
pub trait Prompter {
    /// Asks for the directory to organize. A blank answer means `default`.
    fn ask_directory(&mut self, default: &Path) -> io::Result<PathBuf>;

    /// Shows the plan and asks whether to apply it.
    fn confirm(&mut self, actions: &[Action]) -> io::Result<bool>;
}

/// Interprets a yes/no answer, case-insensitively.
///
/// ```
/// use tidyup::prompt::parse_confirmation;
///
/// assert!(parse_confirmation(" YES ").unwrap());
/// assert!(!parse_confirmation("n").unwrap());
/// assert!(parse_confirmation("maybe").is_err());
/// ```
pub fn parse_confirmation(input: &str) -> OrganizeResult<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "s" | "si" | "sí" => Ok(true),
        "n" | "no" => Ok(false),
        other => Err(OrganizeError::InvalidResponse {
            input: other.to_string(),
        }),
    }
}

/// Asks "Apply these changes?" until the answer is understood.
///
/// End of input counts as "no".
pub fn prompt_confirmation<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<bool> {
    loop {
        write!(writer, "\nApply these changes? (y/n): ")?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            writeln!(writer)?;
            return Ok(false);
        }

        match parse_confirmation(&line) {
            Ok(answer) => return Ok(answer),
            Err(e) => writeln!(writer, "👉 {}", e)?,
        }
    }
}

/// Asks for a directory, returning `default` for a blank answer or end of input.
pub fn prompt_directory<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    default: &Path,
) -> io::Result<PathBuf> {
    write!(writer, "Directory to organize (Enter = {}): ", default.display())?;
    writer.flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;
    let answer = line.trim();
    if answer.is_empty() {
        Ok(default.to_path_buf())
    } else {
        Ok(PathBuf::from(answer))
    }
}

/// Expands a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// The directory offered when the user does not type one.
pub fn default_directory(configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("~/Downloads"))
}

/// Prompter reading from stdin and writing to stdout.
#[derive(Debug, Default)]
pub struct StdioPrompter {
    /// Skip the confirmation question and proceed.
    pub assume_yes: bool,
}

impl Prompter for StdioPrompter {
    fn ask_directory(&mut self, default: &Path) -> io::Result<PathBuf> {
        prompt_directory(&mut io::stdin().lock(), &mut io::stdout(), default)
    }

    fn confirm(&mut self, actions: &[Action]) -> io::Result<bool> {
        OutputFormatter::preview(actions);
        if self.assume_yes {
            return Ok(true);
        }
        prompt_confirmation(&mut io::stdin().lock(), &mut io::stdout())
    }
}
