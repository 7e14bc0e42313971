#![forbid(unsafe_code)]

pub mod files;
pub mod logging;
pub mod options;
pub mod rewrite;
pub mod version;

pub use options::{Options, Precision};
pub use version::{Increment, Version};

use files::{IoError, Modification, SourceFile};
use logging::{EventLog, Log, LogExt, Verbosity};
use std::path::PathBuf;

/// Exit code of a successful run.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when the declarations file does not exist.
pub const EXIT_FILE_NOT_FOUND: i32 = -1;
/// Exit code when reading, rewriting or writing the declarations file failed.
pub const EXIT_FAILURE: i32 = -2;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("File [{}] not found", path.display())]
    FileNotFound { path: PathBuf },
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("failed to rewrite version declarations in {path:?}")]
    Rewrite {
        #[source]
        source: rewrite::Error,
        path: PathBuf,
    },
}

impl Error {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => EXIT_FILE_NOT_FOUND,
            Self::Io(_) | Self::Rewrite { .. } => EXIT_FAILURE,
        }
    }
}

/// Rewrites the version declarations of a single file.
#[derive(Debug)]
pub struct BuildCounter<L, E> {
    pub options: Options,
    pub logger: L,
    pub event_log: E,
    pub dry_run: bool,
}

impl<L, E> BuildCounter<L, E>
where
    L: Log,
    E: EventLog,
{
    #[must_use]
    pub fn new(options: Options, logger: L, event_log: E) -> Self {
        Self {
            options,
            logger,
            event_log,
            dry_run: false,
        }
    }

    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Write an entry to the system log, if enabled.
    ///
    /// Failing to write the entry is not an error.
    pub fn report(&self, message: &str) {
        if !self.options.use_event_log {
            return;
        }
        if let Err(err) = self.event_log.error(message) {
            tracing::debug!(?err, "failed to write to the system log");
        }
    }

    /// Increment the versions declared in the configured file.
    ///
    /// # Errors
    /// - If the file does not exist.
    /// - If the file cannot be read or written.
    /// - If a version declaration cannot be parsed.
    pub fn run(&self) -> Result<Modification, Error> {
        let path = &self.options.path;
        tracing::debug!(options = ?self.options, dry_run = self.dry_run, "run");

        if !path.is_file() {
            return Err(Error::FileNotFound { path: path.clone() });
        }

        let file = SourceFile::read(path)?;
        let rewritten =
            rewrite::rewrite_lines(&file.lines, &self.options).map_err(|source| {
                Error::Rewrite {
                    source,
                    path: path.clone(),
                }
            })?;

        for replacement in rewritten.stopped() {
            if let Increment::CarryStopped(stop) = replacement.outcome {
                tracing::warn!(
                    line_number = replacement.line_number,
                    declaration = %replacement.declaration,
                    "{stop}"
                );
                self.report(&format!(
                    "Line {}: {} increment stopped: {stop}",
                    replacement.line_number, replacement.declaration
                ));
            }
        }

        let new_file = file.with_lines(rewritten.lines);
        let modification = Modification {
            path: path.clone(),
            before: file.render(),
            after: new_file.render(),
            replacements: rewritten.replacements,
            skipped: rewritten.skipped,
        };

        if self.dry_run {
            tracing::info!(?path, "dry run active, won't touch any files");
        } else {
            new_file.write(path)?;
            tracing::info!(
                ?path,
                replacements = modification.replacements.len(),
                "updated version declarations"
            );
        }

        self.logger
            .log(Verbosity::Low, &format!("precision: {}", self.options.precision));
        self.logger.log_modification(&modification, self.dry_run);
        Ok(modification)
    }
}

#[cfg(test)]
pub mod tests {
    use super::{BuildCounter, Error, EXIT_FAILURE, EXIT_FILE_NOT_FOUND};
    use crate::logging::{EventLog, NoOpEventLog, NoOpLogger};
    use crate::options::{Options, DEFAULT_FILE_NAME};
    use color_eyre::eyre;
    use similar_asserts::assert_eq as sim_assert_eq;
    use std::cell::RefCell;
    use std::path::Path;

    static INIT: std::sync::Once = std::sync::Once::new();

    /// Initialize test
    ///
    /// This ensures `color_eyre` is setup once.
    pub(crate) fn init() {
        INIT.call_once(|| {
            color_eyre::install().ok();
        });
    }

    #[derive(Debug, Default)]
    struct BufferedEventLog {
        entries: RefCell<Vec<String>>,
        fail: bool,
    }

    impl EventLog for BufferedEventLog {
        fn error(&self, message: &str) -> Result<(), std::io::Error> {
            if self.fail {
                return Err(std::io::Error::other("event log unavailable"));
            }
            self.entries.borrow_mut().push(message.to_string());
            Ok(())
        }
    }

    const ASSEMBLY_INFO: &str = indoc::indoc! {r#"
        using System.Reflection;
        using System.Runtime.InteropServices;

        [assembly: AssemblyTitle("ProjectBuildCounter")]
        [assembly: ComVisible(false)]
        [assembly: AssemblyVersion("1.0.*")]
        [assembly: AssemblyFileVersion("1.0.0.9999")]
        [assembly: AssemblyInformationalVersion("1.0.0.9999")]
    "#};

    fn write_assembly_info(dir: &Path, contents: &str) -> eyre::Result<std::path::PathBuf> {
        let path = dir.join(DEFAULT_FILE_NAME);
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    #[test]
    fn test_run() -> eyre::Result<()> {
        init();

        let dir = tempfile::tempdir()?;
        let path = write_assembly_info(dir.path(), ASSEMBLY_INFO)?;
        let dir_arg = dir.path().to_string_lossy().to_string();

        let options = Options::resolve(&[dir_arg.as_str(), "m"]);
        sim_assert_eq!(options.path, path);

        let counter = BuildCounter::new(options, NoOpLogger::default(), NoOpEventLog);
        let modification = counter.run()?;
        sim_assert_eq!(modification.replacements.len(), 3);

        let expected = indoc::indoc! {r#"
            using System.Reflection;
            using System.Runtime.InteropServices;

            [assembly: AssemblyTitle("ProjectBuildCounter")]
            [assembly: ComVisible(false)]
            [assembly: AssemblyVersion("1.1.0")]
            [assembly: AssemblyFileVersion("1.1.0.9999")]
            [assembly: AssemblyInformationalVersion("1.1.0.9999")]
        "#};
        sim_assert_eq!(std::fs::read_to_string(&path)?, expected);
        Ok(())
    }

    #[test]
    fn test_run_carries_and_skips_file_version() -> eyre::Result<()> {
        init();

        let dir = tempfile::tempdir()?;
        let path = write_assembly_info(dir.path(), ASSEMBLY_INFO)?;
        let path_arg = path.to_string_lossy().to_string();

        let options = Options::resolve(&[path_arg.as_str(), "R", "nofile"]);
        let counter = BuildCounter::new(options, NoOpLogger::default(), NoOpEventLog);
        counter.run()?;

        let after = std::fs::read_to_string(&path)?;
        let declarations: Vec<&str> = after.lines().skip(5).collect();
        sim_assert_eq!(
            declarations,
            vec![
                r#"[assembly: AssemblyVersion("1.0.0")]"#,
                r#"[assembly: AssemblyFileVersion("1.0.0.9999")]"#,
                r#"[assembly: AssemblyInformationalVersion("1.0.1.1")]"#,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_run_dry_run() -> eyre::Result<()> {
        init();

        let dir = tempfile::tempdir()?;
        let path = write_assembly_info(dir.path(), ASSEMBLY_INFO)?;

        let options = Options {
            path: path.clone(),
            ..Options::default()
        };
        let counter =
            BuildCounter::new(options, NoOpLogger::default(), NoOpEventLog).dry_run(true);
        let modification = counter.run()?;

        assert!(modification.is_changed());
        assert!(modification.diff().is_some());
        sim_assert_eq!(std::fs::read_to_string(&path)?, ASSEMBLY_INFO);
        Ok(())
    }

    #[test]
    fn test_run_file_not_found() -> eyre::Result<()> {
        init();

        let dir = tempfile::tempdir()?;
        let dir_arg = dir.path().join("Properties").to_string_lossy().to_string();
        let options = Options::resolve(&[dir_arg.as_str()]);

        let counter = BuildCounter::new(options, NoOpLogger::default(), NoOpEventLog);
        let err = counter.run().expect_err("file does not exist");
        assert!(matches!(err, Error::FileNotFound { .. }));
        sim_assert_eq!(err.exit_code(), EXIT_FILE_NOT_FOUND);
        assert!(!dir.path().join("Properties").exists());
        Ok(())
    }

    #[test]
    fn test_run_invalid_version() -> eyre::Result<()> {
        init();

        let dir = tempfile::tempdir()?;
        let contents = "[assembly: AssemblyVersion(\"1.0.0.99999999999\")]\n";
        let path = write_assembly_info(dir.path(), contents)?;

        let options = Options {
            path: path.clone(),
            ..Options::default()
        };
        let counter = BuildCounter::new(options, NoOpLogger::default(), NoOpEventLog);
        let err = counter.run().expect_err("version is invalid");
        assert!(matches!(err, Error::Rewrite { .. }));
        sim_assert_eq!(err.exit_code(), EXIT_FAILURE);
        sim_assert_eq!(std::fs::read_to_string(&path)?, contents);
        Ok(())
    }

    #[test]
    fn test_run_reports_stopped_carry() -> eyre::Result<()> {
        init();

        let dir = tempfile::tempdir()?;
        let contents = "[assembly: AssemblyVersion(\"9.2.3.4\")]\n";
        let path = write_assembly_info(dir.path(), contents)?;

        let options = Options {
            path: path.clone(),
            precision: crate::Precision::Major,
            use_event_log: true,
            ..Options::default()
        };
        let counter = BuildCounter::new(options, NoOpLogger::default(), BufferedEventLog::default());
        let modification = counter.run()?;

        assert!(!modification.is_changed());
        sim_assert_eq!(std::fs::read_to_string(&path)?, contents);
        sim_assert_eq!(counter.event_log.entries.borrow().len(), 1);
        Ok(())
    }

    #[test]
    fn test_run_ignores_event_log_failure() -> eyre::Result<()> {
        init();

        let dir = tempfile::tempdir()?;
        let path = write_assembly_info(dir.path(), "AssemblyVersion(\"9.0\")\n")?;

        let options = Options {
            path,
            precision: crate::Precision::Major,
            use_event_log: true,
            ..Options::default()
        };
        let event_log = BufferedEventLog {
            fail: true,
            ..BufferedEventLog::default()
        };
        let counter = BuildCounter::new(options, NoOpLogger::default(), event_log);
        assert!(counter.run().is_ok());
        Ok(())
    }

    #[test]
    fn test_event_log_disabled() {
        init();

        let counter = BuildCounter::new(
            Options::default(),
            NoOpLogger::default(),
            BufferedEventLog::default(),
        );
        counter.report("not written");
        assert!(counter.event_log.entries.borrow().is_empty());
    }
}
