//! Command-line interface entry point for `GradPlanner`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use grad_planner::config::Config;
use grad_planner::info;
use grad_planner::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config; otherwise use config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| config.logging.level.parse().ok())
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    // Machine-readable output owns stdout
    let json_stdout = match &args.command {
        Command::Session => true,
        Command::Quarter { json, .. }
        | Command::Plan { json, .. }
        | Command::Course { json, .. } => *json,
        Command::Config { .. } => false,
    };

    let verbose = (args.verbose || config.logging.verbose) && !json_stdout;
    if verbose {
        enable_verbose();
    }

    // File logging: CLI flag wins, otherwise use config logging.file if set
    let config_log_path = (!config.logging.file.is_empty())
        .then(|| std::path::PathBuf::from(&config.logging.file));
    let mut logging_to_file = false;

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            logging_to_file = true;
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    if json_stdout && !logging_to_file {
        level = level.min(Level::Warn);
    }
    set_level(level);
    if logging_to_file {
        info!("gradplanner {} started", grad_planner::get_version());
    }

    match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
        }
        Command::Quarter {
            term,
            student,
            json,
        } => {
            commands::quarter::run(&term, &student, json, &config);
        }
        Command::Course {
            department,
            course_number,
            json,
        } => {
            commands::course::run(&department, &course_number, json, &config);
        }
        Command::Plan {
            graduation_term,
            student,
            json,
            report,
            output,
        } => {
            let options = commands::plan::PlanOptions {
                graduation_term: &graduation_term,
                student: &student,
                json,
                report: report.as_deref(),
                output: output.as_deref(),
            };
            commands::plan::run(&options, &config);
        }
        Command::Session => commands::session::run(&config),
    }
}
