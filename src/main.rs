use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tidyup::cli::{OrganizeCommand, RunOptions, run_cli};
use tidyup::output::OutputFormatter;
use tidyup::prompt::StdioPrompter;

#[derive(Parser)]
#[command(
    name = "tidyup",
    version,
    about = "Sort a directory's files into category folders, with preview and undo"
)]
struct Cli {
    /// Directory to organize. Asked interactively when omitted.
    directory: Option<PathBuf>,

    /// Put back the files moved by the last run.
    #[arg(long, alias = "undo", conflicts_with = "directory")]
    revert: bool,

    /// Configuration file (TOML).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where the move log is kept.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Apply the plan without asking for confirmation.
    #[arg(short, long)]
    yes: bool,

    /// Print debug diagnostics to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tidyup::logging::init(cli.verbose);

    let command = if cli.revert {
        OrganizeCommand::Revert
    } else {
        println!("🧹 tidyup");
        OrganizeCommand::Organize {
            directory: cli.directory,
        }
    };
    let options = RunOptions {
        config_path: cli.config,
        log_file: cli.log_file,
    };
    let mut prompter = StdioPrompter {
        assume_yes: cli.yes,
    };

    match run_cli(command, &options, &mut prompter) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}
