//! Find version declarations in source lines and bump the version they declare.
use crate::{
    options::Options,
    version::{self, Increment, Version},
};

pub const VERSION_MARKER: &str = "AssemblyVersion";
pub const FILE_VERSION_MARKER: &str = "AssemblyFileVersion";
pub const INFORMATIONAL_VERSION_MARKER: &str = "AssemblyInformationalVersion";

/// Placeholder for an automatically assigned version component.
pub const WILDCARD: char = '*';

/// Matches everything that can not be part of a dotted numeric version.
static NON_VERSION_CHARS_REGEX: once_cell::sync::Lazy<regex::Regex> =
    once_cell::sync::Lazy::new(|| regex::Regex::new(r"[^0-9.]").unwrap());

/// Kind of version declaration found in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Declaration {
    Version,
    FileVersion,
    InformationalVersion,
}

impl Declaration {
    /// Classify a line, returning `None` if it declares no version.
    #[must_use]
    pub fn classify(line: &str) -> Option<Self> {
        if line.contains(FILE_VERSION_MARKER) {
            Some(Self::FileVersion)
        } else if line.contains(INFORMATIONAL_VERSION_MARKER) {
            Some(Self::InformationalVersion)
        } else if line.contains(VERSION_MARKER) {
            Some(Self::Version)
        } else {
            None
        }
    }

    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Self::Version => VERSION_MARKER,
            Self::FileVersion => FILE_VERSION_MARKER,
            Self::InformationalVersion => INFORMATIONAL_VERSION_MARKER,
        }
    }
}

impl std::fmt::Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.marker())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("line {line_number}: {declaration} declaration {line:?} does not contain a version")]
    MissingVersion {
        line_number: usize,
        declaration: Declaration,
        line: String,
    },
    #[error("line {line_number}: invalid {declaration} version")]
    InvalidVersion {
        #[source]
        source: version::ParseError,
        line_number: usize,
        declaration: Declaration,
    },
}

/// A version that was replaced in a single line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Replacement {
    /// 1-based line number.
    pub line_number: usize,
    pub declaration: Declaration,
    /// The version text that was searched for.
    pub search: String,
    /// The version text it was replaced with.
    pub replace: String,
    pub outcome: Increment,
}

/// What happened to a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRewrite {
    /// The line declares no version.
    Unchanged,
    /// The line declares a version that is not bumped.
    Skipped(Declaration),
    /// The line was rewritten (it may still be equal to the input).
    Rewritten {
        line: String,
        replacement: Replacement,
    },
}

/// Normalize wildcards and strip everything but digits and dots.
///
/// Returns the normalized line and the extracted version text.
#[must_use]
pub fn extract_version(line: &str) -> (String, String) {
    let normalized = line.replace(WILDCARD, "0");
    let extracted = NON_VERSION_CHARS_REGEX.replace_all(&normalized, "").into_owned();
    (normalized, extracted)
}

/// Rewrite a single line.
///
/// # Errors
/// If the line declares a version but the version cannot be parsed.
pub fn rewrite_line(
    line: &str,
    line_number: usize,
    options: &Options,
) -> Result<LineRewrite, Error> {
    let Some(declaration) = Declaration::classify(line) else {
        return Ok(LineRewrite::Unchanged);
    };
    if options.skip_file_version && declaration == Declaration::FileVersion {
        tracing::debug!(line_number, "skipping file version");
        return Ok(LineRewrite::Skipped(declaration));
    }

    let (normalized, search) = extract_version(line);
    let mut version = Version::parse(&search).map_err(|source| match source {
        version::ParseError::Empty => Error::MissingVersion {
            line_number,
            declaration,
            line: line.to_string(),
        },
        source => Error::InvalidVersion {
            source,
            line_number,
            declaration,
        },
    })?;

    let outcome = version.increment(options.precision);
    let replace = version.to_string();
    tracing::debug!(
        line_number,
        %declaration,
        current = search.as_str(),
        new = replace.as_str(),
        ?outcome,
        "bump version"
    );

    let line = normalized.replacen(&search, &replace, 1);
    Ok(LineRewrite::Rewritten {
        line,
        replacement: Replacement {
            line_number,
            declaration,
            search,
            replace,
            outcome,
        },
    })
}

/// The rewritten lines of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewritten {
    pub lines: Vec<String>,
    pub replacements: Vec<Replacement>,
    /// 1-based numbers of version declarations that were skipped.
    pub skipped: Vec<usize>,
}

impl Rewritten {
    /// Replacements whose increment stopped early.
    pub fn stopped(&self) -> impl Iterator<Item = &Replacement> {
        self.replacements
            .iter()
            .filter(|replacement| replacement.outcome.is_stopped())
    }
}

/// Rewrite all version declarations, keeping every other line as is.
///
/// # Errors
/// If any version declaration cannot be parsed.
pub fn rewrite_lines<S: AsRef<str>>(lines: &[S], options: &Options) -> Result<Rewritten, Error> {
    let mut rewritten = Rewritten {
        lines: Vec::with_capacity(lines.len()),
        ..Rewritten::default()
    };
    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let line_number = idx + 1;
        match rewrite_line(line, line_number, options)? {
            LineRewrite::Unchanged => rewritten.lines.push(line.to_string()),
            LineRewrite::Skipped(_) => {
                rewritten.skipped.push(line_number);
                rewritten.lines.push(line.to_string());
            }
            LineRewrite::Rewritten { line, replacement } => {
                rewritten.replacements.push(replacement);
                rewritten.lines.push(line);
            }
        }
    }
    Ok(rewritten)
}
