//! Resolve positional command-line arguments into [`Options`].
use std::path::PathBuf;

/// File name of the version declarations file.
pub const DEFAULT_FILE_NAME: &str = "AssemblyInfo.cs";

/// Argument that disables incrementing file version declarations.
pub const NO_FILE_VERSION_FLAG: &str = "nofile";

/// Argument that enables writing errors to the system log.
pub const USE_EVENT_LOG_FLAG: &str = "useeventlog";

/// Maximum number of positional arguments that are considered.
pub const MAX_ARGS: usize = 4;

/// The version component to start incrementing from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precision {
    Major,
    Minor,
    Build,
    #[default]
    Revision,
}

impl Precision {
    /// Parse a precision selector.
    ///
    /// `M` selects major, `m` minor and `b` or `B` build.
    /// Any other value selects revision.
    #[must_use]
    pub fn from_selector(selector: &str) -> Self {
        match selector {
            "M" => Self::Major,
            "m" => Self::Minor,
            "b" | "B" => Self::Build,
            _ => Self::Revision,
        }
    }

    /// Index of the component in a `major.minor.build.revision` version.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Major => 0,
            Self::Minor => 1,
            Self::Build => 2,
            Self::Revision => 3,
        }
    }
}

impl AsRef<str> for Precision {
    fn as_ref(&self) -> &str {
        crate::version::COMPONENT_NAMES[self.index()]
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Resolved options of a single invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Options {
    /// Path of the file to rewrite.
    pub path: PathBuf,
    /// Component to start incrementing from.
    pub precision: Precision,
    /// Leave file version declarations untouched.
    pub skip_file_version: bool,
    /// Also report errors to the system log.
    pub use_event_log: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_FILE_NAME),
            precision: Precision::default(),
            skip_file_version: false,
            use_event_log: false,
        }
    }
}

impl Options {
    /// Resolve positional arguments, falling back to defaults for anything missing.
    ///
    /// 0. path to the declarations file, or a directory containing it
    /// 1. precision selector (see [`Precision::from_selector`])
    /// 2. `nofile` to skip file version declarations
    /// 3. `useeventlog` to report errors to the system log
    ///
    /// Arguments beyond the fourth are ignored. No argument is ever rejected.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(args: &[S]) -> Self {
        let args: Vec<&str> = args.iter().take(MAX_ARGS).map(AsRef::as_ref).collect();

        let path = match args.first() {
            None => PathBuf::from(DEFAULT_FILE_NAME),
            Some(path) if path.contains(DEFAULT_FILE_NAME) => PathBuf::from(path),
            Some(dir) => PathBuf::from(dir).join(DEFAULT_FILE_NAME),
        };

        let precision = args
            .get(1)
            .copied()
            .map(Precision::from_selector)
            .unwrap_or_default();

        let skip_file_version = args
            .get(2)
            .is_some_and(|arg| arg.eq_ignore_ascii_case(NO_FILE_VERSION_FLAG));
        let use_event_log = args
            .get(3)
            .is_some_and(|arg| arg.eq_ignore_ascii_case(USE_EVENT_LOG_FLAG));

        Self {
            path,
            precision,
            skip_file_version,
            use_event_log,
        }
    }
}
