use clap::Parser;

/// Logging flags to `#[command(flatten)]` into your CLI
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct Verbosity {
    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity",
        long_help = None,
    )]
    pub verbose: u8,

    #[arg(
        long,
        short = 'q',
        action = clap::ArgAction::Count,
        global = true,
        help = "Decrease logging verbosity",
        long_help = None,
        conflicts_with = "verbose",
    )]
    pub quiet: u8,
}

impl Verbosity {
    /// Log level implied by the flags, if any was given.
    #[must_use]
    pub fn log_level(&self) -> Option<tracing::metadata::Level> {
        use tracing::metadata::Level;
        if self.quiet > 0 {
            return Some(Level::ERROR);
        }
        match self.verbose {
            0 => None,
            1 => Some(Level::INFO),
            2 => Some(Level::DEBUG),
            _ => Some(Level::TRACE),
        }
    }

    /// Detail of the modification summary.
    #[must_use]
    pub fn verbosity(&self) -> buildcounter::logging::Verbosity {
        if self.quiet > 0 {
            buildcounter::logging::Verbosity::Off
        } else {
            self.verbose.into()
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[clap(
    name = "buildcounter",
    version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown"),
    about = "increment the version declarations in AssemblyInfo.cs",
    author = "romnn <contact@romnn.com>",
)]
pub struct Options {
    #[arg(
        long = "color",
        env = "BUILDCOUNTER_COLOR",
        help = "enable or disable color"
    )]
    pub color_choice: Option<termcolor::ColorChoice>,

    #[command(flatten)]
    pub verbosity: Verbosity,

    #[arg(
        long = "log",
        env = "BUILDCOUNTER_LOG_LEVEL",
        aliases = ["log-level"],
        help = "Log level. When using a more sophisticated logging setup using RUST_LOG environment variable, this option is overwritten."
    )]
    pub log_level: Option<tracing::metadata::Level>,

    #[arg(
        long = "log-format",
        env = "BUILDCOUNTER_LOG_FORMAT",
        help = "log format (json, pretty or pretty-compact)"
    )]
    pub log_format: Option<crate::logging::LogFormat>,

    #[clap(
        short = 'n',
        long = "dry-run",
        help = "don't write any files, just pretend.",
        env = "BUILDCOUNTER_DRY_RUN",
        action = clap::ArgAction::SetTrue
    )]
    pub dry_run: bool,

    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "ARGS",
        help = "[PATH [PRECISION [nofile [useeventlog]]]]",
        long_help = "Positional arguments:\n  \
            PATH         AssemblyInfo.cs or the directory containing it\n  \
            PRECISION    M (major), m (minor), b or B (build), anything else (revision)\n  \
            nofile       do not increment AssemblyFileVersion\n  \
            useeventlog  also write errors to the system log"
    )]
    pub args: Vec<String>,
}
