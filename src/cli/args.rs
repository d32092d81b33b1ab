//! CLI argument definitions for `GradPlanner`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use grad_planner::config::ConfigOverrides;
use grad_planner::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level` for
/// runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `epoch`, `catalog_file`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

/// Student inputs shared by `quarter` and `plan`
#[derive(Debug, Clone, clap::Args)]
pub struct StudentArgs {
    /// Requirements file: JSON array of `{"id", "num_needed", "courses": [codes]}`
    #[arg(short, long, value_name = "FILE")]
    pub requirements: PathBuf,

    /// Completed course codes, comma separated (e.g. "COMPSCI161, I&CSCI46")
    #[arg(short, long, value_name = "CODES")]
    pub completed: Option<String>,

    /// File of completed course codes, one per line or comma separated
    #[arg(long, value_name = "FILE")]
    pub completed_file: Option<PathBuf>,

    /// Interest keywords, comma separated (e.g. "machine learning, graphics")
    #[arg(short, long, value_name = "KEYWORDS")]
    pub interests: Option<String>,

    /// Courses to recommend per quarter (defaults to config `courses_per_quarter`)
    #[arg(short = 'n', long, value_name = "N")]
    pub courses_per_quarter: Option<usize>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Preview one quarter: eligible courses and the recommended picks.
    Quarter {
        /// Quarter to preview (e.g. "Fall 2026")
        #[arg(value_name = "TERM")]
        term: String,

        #[command(flatten)]
        student: StudentArgs,

        /// Print the preview as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show catalog details for one course.
    Course {
        /// Department code (e.g. "COMPSCI", "I&CSCI")
        #[arg(value_name = "DEPARTMENT")]
        department: String,

        /// Course number (e.g. "161", "45C")
        #[arg(value_name = "NUMBER")]
        course_number: String,

        /// Print the course as JSON
        #[arg(long)]
        json: bool,
    },
    /// Plan every quarter through graduation.
    ///
    /// Starts a session, accepts the recommended courses for each quarter, and
    /// prints the finished plan.
    Plan {
        /// Graduation quarter (e.g. "Spring 2027")
        #[arg(value_name = "TERM")]
        graduation_term: String,

        #[command(flatten)]
        student: StudentArgs,

        /// Print the plan summary as JSON
        #[arg(long)]
        json: bool,

        /// Write a report in the given format (markdown, json)
        #[arg(long, value_name = "FORMAT")]
        report: Option<String>,

        /// Report output path (defaults to config `reports_dir`)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Serve planner requests as JSON lines on stdin/stdout.
    ///
    /// Each input line is one request tagged by `op` (`filter_quarter`,
    /// `course_info`, `start`, `get_quarter_plan`, `add_quarter`, `finish`);
    /// each output line is its response envelope.
    Session,
}

#[derive(Parser, Debug)]
#[command(
    name = "gradplanner",
    about = "Plan university courses quarter by quarter toward graduation",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Course catalog JSON file (overrides config `catalog_file`)
    #[arg(long, value_name = "FILE", global = true)]
    pub catalog: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config planning epoch (first plannable quarter)
    #[arg(long = "config-epoch", value_name = "TERM")]
    pub config_epoch: Option<String>,

    /// Override config reports directory
    #[arg(long = "config-reports-dir", value_name = "DIR")]
    pub config_reports_dir: Option<PathBuf>,

    /// Override config reports directory (short form)
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--reports-dir`) take precedence over long-form
    /// flags (e.g., `--config-reports-dir`) when both are provided.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let path = |p: &PathBuf| p.to_string_lossy().to_string();
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self.config_log_file.as_ref().map(path),
            verbose: self.config_verbose,
            epoch: self.config_epoch.clone(),
            courses_per_quarter: None,
            catalog_file: self.catalog.as_ref().map(path),
            reports_dir: self
                .reports_dir
                .as_ref()
                .or(self.config_reports_dir.as_ref())
                .map(path),
        }
    }
}
