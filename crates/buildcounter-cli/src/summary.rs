use crate::logging::LogFormat;
use buildcounter::logging::{Log, TracingLogger, Verbosity};

/// Where the modification summary goes.
///
/// Plain text goes to stdout, unless diagnostics are structured,
/// in which case the summary becomes part of the `tracing` stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SummaryLogger {
    Stdout { verbosity: Verbosity },
    Tracing(TracingLogger),
}

impl SummaryLogger {
    pub fn new(log_format: LogFormat, verbosity: Verbosity) -> Self {
        if log_format.is_structured() {
            Self::Tracing(TracingLogger::new(verbosity))
        } else {
            Self::Stdout { verbosity }
        }
    }
}

impl Log for SummaryLogger {
    fn log(&self, verbosity: Verbosity, message: &str) {
        match self {
            Self::Stdout { verbosity: max } if verbosity <= *max => println!("{message}"),
            Self::Stdout { .. } => {}
            Self::Tracing(logger) => logger.log(verbosity, message),
        }
    }
}
