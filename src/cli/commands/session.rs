//! Session command handler: JSON-lines request loop

use super::{load_catalog, settings};
use grad_planner::config::Config;
use grad_planner::core::planner::api::handle_json;
use grad_planner::core::planner::GraduationPlanner;
use grad_planner::{debug, error, info, warn};
use std::io::{self, BufRead, Write};

/// Serve requests from stdin until EOF, one response line per request line
pub fn run(config: &Config) {
    let planner = match settings(config) {
        Ok(settings) => GraduationPlanner::new(settings),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    // Requests carry full course records; the catalog only backs course_info
    let planner = match load_catalog(config) {
        Ok(catalog) => planner.with_catalog(catalog),
        Err(_) => {
            warn!("Serving without a catalog; course_info requests will fail");
            planner
        }
    };

    if let Err(e) = serve(&planner, io::stdin().lock(), io::stdout().lock()) {
        error!("Session loop stopped: {e}");
        std::process::exit(1);
    }
}

/// Read requests from `input` and write envelopes to `output`
///
/// Blank lines are skipped. Stops at end of input.
///
/// # Errors
/// Returns any I/O error from reading or writing.
pub fn serve<R: BufRead, W: Write>(
    planner: &GraduationPlanner,
    input: R,
    mut output: W,
) -> io::Result<()> {
    info!("Session loop started");
    let mut handled = 0usize;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        debug!("Request: {line}");
        writeln!(output, "{}", handle_json(planner, &line))?;
        output.flush()?;
        handled += 1;
    }

    info!(
        "Session loop ended after {handled} request(s); {} session(s) left open",
        planner.active_sessions()
    );
    Ok(())
}
