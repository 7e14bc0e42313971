//! Logging of modifications based on verbosity, and the system log.
use crate::files::Modification;
use colored::{Color, Colorize};

/// Target of events written to the system log.
pub const EVENT_LOG_TARGET: &str = "buildcounter::eventlog";

/// Target of modification summaries emitted by [`TracingLogger`].
pub const SUMMARY_TARGET: &str = "buildcounter::summary";

/// Controls level of detail emitted by loggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Verbosity {
    /// No logs will be emitted.
    Off = 0,
    /// Current and new versions per declaration.
    Low = 1,
    /// Show diffs.
    Medium = 2,
    /// Also show lines that were skipped.
    High = 3,
}

impl From<u8> for Verbosity {
    fn from(value: u8) -> Self {
        match value {
            0 => Verbosity::Off,
            1 => Verbosity::Low,
            2 => Verbosity::Medium,
            _ => Verbosity::High,
        }
    }
}

/// Abstraction for logger implementations.
pub trait Log {
    /// Log a message if `verbosity` is within the configured level.
    fn log(&self, verbosity: Verbosity, message: &str);
}

/// A no-op logger implementation.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoOpLogger {}

impl Log for NoOpLogger {
    fn log(&self, _: Verbosity, _: &str) {}
}

/// A `tracing` based logger implementation.
///
/// Keeps machine readable log formats free of plain text output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TracingLogger {
    /// Only messages with lower or equal verbosity will be logged.
    verbosity: Verbosity,
}

impl TracingLogger {
    #[must_use]
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    #[must_use]
    pub fn enabled(&self, verbosity: Verbosity) -> bool {
        verbosity != Verbosity::Off && verbosity <= self.verbosity
    }
}

impl Log for TracingLogger {
    fn log(&self, verbosity: Verbosity, message: &str) {
        if !self.enabled(verbosity) {
            return;
        }
        let message = message.trim_end();
        if !message.is_empty() {
            tracing::info!(target: SUMMARY_TARGET, "{}", message.trim_start());
        }
    }
}

/// Error sink of the system log.
pub trait EventLog {
    /// Write an error entry.
    ///
    /// # Errors
    /// If the entry could not be written.
    fn error(&self, message: &str) -> Result<(), std::io::Error>;
}

/// Discards all entries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoOpEventLog;

impl EventLog for NoOpEventLog {
    fn error(&self, _: &str) -> Result<(), std::io::Error> {
        Ok(())
    }
}

/// Writes entries as `tracing` error events on [`EVENT_LOG_TARGET`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TracingEventLog {
    source: String,
}

impl TracingEventLog {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl Default for TracingEventLog {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

impl EventLog for TracingEventLog {
    fn error(&self, message: &str) -> Result<(), std::io::Error> {
        tracing::error!(target: EVENT_LOG_TARGET, source = self.source.as_str(), "{message}");
        Ok(())
    }
}

impl<T> EventLog for Option<T>
where
    T: EventLog,
{
    fn error(&self, message: &str) -> Result<(), std::io::Error> {
        match self {
            Some(event_log) => event_log.error(message),
            None => Ok(()),
        }
    }
}

/// Extension methods on `Log`.
pub trait LogExt {
    /// Log a file modification, including replacements and diff if any.
    fn log_modification(&self, modification: &Modification, dry_run: bool);
}

impl<T> LogExt for T
where
    T: Log,
{
    fn log_modification(&self, modification: &Modification, dry_run: bool) {
        self.log(
            Verbosity::Low,
            &format!(
                "{}",
                format!("[{}]", modification.path.to_string_lossy()).magenta()
            ),
        );

        let (search_color, replace_color) = (Color::Red, Color::Green);
        for replacement in &modification.replacements {
            let mut message = format!(
                "\t{:>4}: {} `{}` -> `{}`",
                replacement.line_number,
                replacement.declaration.to_string().dimmed(),
                replacement.search.color(search_color),
                replacement.replace.color(replace_color),
            );
            if let crate::version::Increment::CarryStopped(stop) = replacement.outcome {
                message.push_str(&format!(" ({})", stop.to_string().yellow()));
            }
            self.log(Verbosity::Low, &message);
        }
        for line_number in &modification.skipped {
            self.log(
                Verbosity::High,
                &format!("\t{line_number:>4}: {}", "skipped".dimmed()),
            );
        }

        match modification.diff() {
            Some(diff) => {
                self.log(Verbosity::Medium, "");
                for line in diff.lines() {
                    let mut line = format!("\t{line}");
                    line.push_str("\x1b[0;0m"); // reset all styles at end of line
                    self.log(Verbosity::Medium, &line);
                }
            }
            None => self.log(Verbosity::Low, &format!("{}", "\tno changes".dimmed())),
        }
        if dry_run {
            self.log(
                Verbosity::Low,
                &format!("{}", "\tdry run, file was not written".dimmed()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EventLog, Log, LogExt, NoOpEventLog, TracingLogger, Verbosity};
    use crate::files::Modification;
    use similar_asserts::assert_eq as sim_assert_eq;
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[derive(Debug, Default)]
    struct BufferedLogger {
        verbosity: Option<Verbosity>,
        messages: RefCell<Vec<String>>,
    }

    impl Log for BufferedLogger {
        fn log(&self, verbosity: Verbosity, message: &str) {
            if verbosity <= self.verbosity.unwrap_or(Verbosity::High) {
                self.messages.borrow_mut().push(message.to_string());
            }
        }
    }

    #[test]
    fn test_verbosity_ord() {
        let mut verbosities = [Verbosity::Medium, Verbosity::Low, Verbosity::High];
        verbosities.sort();
        sim_assert_eq!(
            verbosities,
            [Verbosity::Low, Verbosity::Medium, Verbosity::High]
        );
        sim_assert_eq!(Verbosity::from(7), Verbosity::High);
    }

    #[test]
    fn test_tracing_logger_verbosity() {
        let logger = TracingLogger::new(Verbosity::Medium);
        assert!(logger.enabled(Verbosity::Low));
        assert!(logger.enabled(Verbosity::Medium));
        assert!(!logger.enabled(Verbosity::High));
        assert!(!TracingLogger::new(Verbosity::Off).enabled(Verbosity::Off));
        logger.log(Verbosity::Low, "\tlogged");
    }

    #[test]
    fn test_log_dry_run_modification() {
        colored::control::set_override(false);
        let logger = BufferedLogger {
            verbosity: Some(Verbosity::Low),
            ..BufferedLogger::default()
        };
        logger.log(Verbosity::Low, "kept");
        logger.log(Verbosity::Medium, "dropped");
        logger.log_modification(
            &Modification {
                path: PathBuf::from("AssemblyInfo.cs"),
                before: String::new(),
                after: String::new(),
                replacements: vec![],
                skipped: vec![],
            },
            true,
        );
        sim_assert_eq!(
            logger.messages.into_inner(),
            vec![
                "kept".to_string(),
                "[AssemblyInfo.cs]".to_string(),
                "\tno changes".to_string(),
                "\tdry run, file was not written".to_string(),
            ]
        );
    }

    #[test]
    fn test_optional_event_log() {
        assert!(None::<NoOpEventLog>.error("ignored").is_ok());
        assert!(Some(NoOpEventLog).error("ignored").is_ok());
    }

    #[test]
    fn test_log_unchanged_modification() {
        colored::control::set_override(false);
        let logger = BufferedLogger {
            verbosity: Some(Verbosity::Low),
            ..BufferedLogger::default()
        };
        let modification = Modification {
            path: PathBuf::from("AssemblyInfo.cs"),
            before: "same\n".to_string(),
            after: "same\n".to_string(),
            replacements: vec![],
            skipped: vec![2],
        };
        logger.log_modification(&modification, false);
        sim_assert_eq!(
            logger.messages.into_inner(),
            vec!["[AssemblyInfo.cs]".to_string(), "\tno changes".to_string()]
        );
    }
}
