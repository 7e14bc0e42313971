use buildcounter::logging::{EVENT_LOG_TARGET, SUMMARY_TARGET};
use color_eyre::eyre;
use termcolor::ColorChoice;
use tracing::metadata::Level;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, Layer, Registry};

/// Format of diagnostics written to stderr.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogFormat {
    Json,
    #[default]
    PrettyCompact,
    Pretty,
}

impl LogFormat {
    const NAMES: [(&'static str, LogFormat); 3] = [
        ("json", LogFormat::Json),
        ("pretty-compact", LogFormat::PrettyCompact),
        ("pretty", LogFormat::Pretty),
    ];

    /// Machine readable formats must not be mixed with plain text summaries.
    #[must_use]
    pub fn is_structured(self) -> bool {
        self == LogFormat::Json
    }
}

impl std::str::FromStr for LogFormat {
    type Err = eyre::Report;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, format)| *format)
            .ok_or_else(|| eyre::eyre!("unknown log format: {s:?}"))
    }
}

/// Default level when neither a log level nor verbosity flags are given.
const DEFAULT_LOG_LEVEL: Level = Level::WARN;

/// Directive used when `RUST_LOG` is unset or invalid.
///
/// Only events of this crate are shown, except for summaries and
/// the system log, which are always enabled.
fn default_directive(log_level: Level) -> String {
    format!(
        "none,buildcounter={},{SUMMARY_TARGET}=info,{EVENT_LOG_TARGET}=error",
        log_level.to_string().to_ascii_lowercase(),
    )
}

fn env_filter(log_level: Level, rust_log: Option<String>) -> eyre::Result<EnvFilter> {
    let default_env_filter = EnvFilter::builder()
        .with_regex(true)
        .with_default_directive(log_level.into())
        .parse(default_directive(log_level))?;

    let Some(directive) = rust_log else {
        return Ok(default_env_filter);
    };
    match EnvFilter::builder().with_regex(true).parse(&directive) {
        Ok(env_filter) => Ok(env_filter),
        Err(err) => {
            eprintln!("invalid log filter: {err}");
            eprintln!("falling back to default logging");
            Ok(default_env_filter)
        }
    }
}

/// Whether output written to stderr should be colored.
fn use_color(color_choice: ColorChoice, is_terminal: impl FnOnce() -> bool) -> bool {
    match color_choice {
        ColorChoice::Always | ColorChoice::AlwaysAnsi => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => is_terminal(),
    }
}

fn fmt_layer(log_format: LogFormat, use_color: bool) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = tracing_subscriber::fmt::Layer::new()
        .without_time()
        .with_writer(std::io::stderr);
    match log_format {
        LogFormat::Json => layer.json().with_ansi(false).boxed(),
        LogFormat::PrettyCompact => layer.compact().with_ansi(use_color).boxed(),
        LogFormat::Pretty => layer
            .pretty()
            .with_ansi(use_color)
            .fmt_fields(tracing_subscriber::fmt::format::PrettyFields::new())
            .boxed(),
    }
}

/// Setup logging
///
/// # Errors
/// - If the logging directive cannot be parsed.
/// - If the global tracing subscriber cannot be installed.
pub fn setup(
    log_level: Option<Level>,
    log_format: Option<LogFormat>,
    color_choice: ColorChoice,
) -> eyre::Result<(LogFormat, bool)> {
    let env_filter = env_filter(
        log_level.unwrap_or(DEFAULT_LOG_LEVEL),
        std::env::var("RUST_LOG").ok(),
    )?;
    let log_format = log_format.unwrap_or_default();
    let use_color = use_color(color_choice, || {
        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    });

    let subscriber = tracing_subscriber::registry()
        .with(fmt_layer(log_format, use_color))
        .with(env_filter);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok((log_format, use_color))
}
