#![forbid(unsafe_code)]

mod logging;
mod options;
mod summary;

use buildcounter::{logging::TracingEventLog, BuildCounter, Error, EXIT_SUCCESS};
use clap::Parser;
use color_eyre::eyre;

/// Prefix of diagnostics for failures while reading, rewriting or writing the file.
const FAILURE_PREFIX: &str = "(Reading File) Exception thrown:";

fn run(options: &options::Options, log_format: logging::LogFormat) -> i32 {
    let start = std::time::Instant::now();

    // nothing to do, the file is not even looked up
    if options.args.is_empty() {
        tracing::debug!("no arguments given");
        return EXIT_SUCCESS;
    }

    let resolved = buildcounter::Options::resolve(&options.args);
    let event_log = resolved.use_event_log.then(TracingEventLog::default);
    let logger = summary::SummaryLogger::new(log_format, options.verbosity.verbosity());
    let counter = BuildCounter::new(resolved, logger, event_log).dry_run(options.dry_run);

    match counter.run() {
        Ok(_) => {
            tracing::info!(elapsed = ?start.elapsed(), "done");
            EXIT_SUCCESS
        }
        Err(err @ Error::FileNotFound { .. }) => {
            counter.report(&err.to_string());
            print!("{err}");
            err.exit_code()
        }
        Err(err) => {
            let exit_code = err.exit_code();
            let report = eyre::Report::new(err);
            counter.report(&format!("{FAILURE_PREFIX} {report:#}"));
            eprintln!("{FAILURE_PREFIX} {report:?}");
            exit_code
        }
    }
}

fn main() -> eyre::Result<()> {
    if std::env::var("RUST_SPANTRACE").is_err() {
        std::env::set_var("RUST_SPANTRACE", "0");
    }
    color_eyre::install()?;

    let options = options::Options::parse();
    let color_choice = options.color_choice.unwrap_or(termcolor::ColorChoice::Auto);
    let log_level = options.log_level.or_else(|| options.verbosity.log_level());
    let (log_format, use_color) = logging::setup(log_level, options.log_format, color_choice)?;
    colored::control::set_override(use_color && !log_format.is_structured());

    let exit_code = run(&options, log_format);
    std::process::exit(exit_code);
}
