use crate::rewrite::Replacement;
use std::path::{Path, PathBuf};

const BOM: char = '\u{feff}';

#[derive(thiserror::Error, Debug)]
#[error("io error for {path:?}")]
pub struct IoError {
    #[source]
    pub source: std::io::Error,
    pub path: PathBuf,
}

impl IoError {
    pub fn new(source: impl Into<std::io::Error>, path: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// Split the line ending off a line produced by `split_inclusive('\n')`.
    fn split(line: &str) -> (&str, Option<Self>) {
        if let Some(line) = line.strip_suffix("\r\n") {
            (line, Some(Self::CrLf))
        } else if let Some(line) = line.strip_suffix('\n') {
            (line, Some(Self::Lf))
        } else {
            (line, None)
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// The lines of a text file.
///
/// Each line keeps its own line ending, so files with mixed line endings
/// are written back as they were read.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub lines: Vec<String>,
    /// Line ending of each line in `lines`.
    pub line_endings: Vec<LineEnding>,
    /// The file starts with a byte order mark.
    pub bom: bool,
    /// Line ending of the first line, used for lines without one.
    pub line_ending: LineEnding,
}

impl SourceFile {
    #[must_use]
    pub fn parse(contents: &str) -> Self {
        let (contents, bom) = match contents.strip_prefix(BOM) {
            Some(contents) => (contents, true),
            None => (contents, false),
        };
        let (lines, endings): (Vec<_>, Vec<_>) = contents
            .split_inclusive('\n')
            .map(LineEnding::split)
            .unzip();
        let line_ending = endings.iter().flatten().copied().next().unwrap_or_default();
        Self {
            lines: lines.into_iter().map(ToString::to_string).collect(),
            line_endings: endings
                .into_iter()
                .map(|ending| ending.unwrap_or(line_ending))
                .collect(),
            bom,
            line_ending,
        }
    }

    /// Read and split the file at `path`.
    ///
    /// Invalid UTF-8 sequences are replaced with `U+FFFD`.
    ///
    /// # Errors
    /// If the file cannot be read.
    pub fn read(path: &Path) -> Result<Self, IoError> {
        let bytes = std::fs::read(path).map_err(|source| IoError::new(source, path))?;
        let contents = String::from_utf8_lossy(&bytes);
        if let std::borrow::Cow::Owned(_) = contents {
            tracing::warn!(?path, "replaced invalid UTF-8 sequences");
        }
        Ok(Self::parse(&contents))
    }

    /// Copy of this file with different lines but the same layout.
    #[must_use]
    pub fn with_lines(&self, lines: Vec<String>) -> Self {
        Self {
            lines,
            ..self.clone()
        }
    }

    /// Join the lines, terminating every line with its line ending.
    #[must_use]
    pub fn render(&self) -> String {
        let mut contents = String::new();
        if self.bom {
            contents.push(BOM);
        }
        for (index, line) in self.lines.iter().enumerate() {
            let line_ending = self
                .line_endings
                .get(index)
                .copied()
                .unwrap_or(self.line_ending);
            contents.push_str(line);
            contents.push_str(line_ending.as_str());
        }
        contents
    }

    /// Overwrite the existing file at `path`.
    ///
    /// # Errors
    /// If the file cannot be opened or written.
    pub fn write(&self, path: &Path) -> Result<(), IoError> {
        use std::io::Write;
        let write = || -> std::io::Result<()> {
            let file = std::fs::OpenOptions::new()
                .write(true)
                .create(false)
                .truncate(true)
                .open(path)?;
            let mut writer = std::io::BufWriter::new(file);
            writer.write_all(self.render().as_bytes())?;
            writer.flush()?;
            Ok(())
        };
        write().map_err(|source| IoError::new(source, path))
    }
}

/// The change made to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    pub path: PathBuf,
    pub before: String,
    pub after: String,
    pub replacements: Vec<Replacement>,
    /// 1-based numbers of version declarations that were left untouched.
    pub skipped: Vec<usize>,
}

impl Modification {
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.before != self.after
    }

    /// Render a diff of the contents, or `None` if nothing changed.
    #[must_use]
    pub fn diff(&self) -> Option<String> {
        if !self.is_changed() {
            return None;
        }
        let label_existing = format!("{:?} (before)", self.path);
        let label_new = format!("{:?} (after)", self.path);
        let diff = similar_asserts::SimpleDiff::from_str(
            &self.before,
            &self.after,
            &label_existing,
            &label_new,
        );
        Some(diff.to_string())
    }
}
