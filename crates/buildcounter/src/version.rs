//! Dotted numeric versions (`major.minor.build.revision`) and bumping with carry.
use crate::options::Precision;

/// Number of components of a complete version.
pub const NUM_COMPONENTS: usize = 4;

/// Component names, from most to least significant.
pub const COMPONENT_NAMES: [&str; NUM_COMPONENTS] = ["major", "minor", "build", "revision"];

/// Largest value the component at `index` may hold.
///
/// The component at index `i` has at most `i + 1` digits, i.e. 9, 99, 999 and 9999.
#[must_use]
pub fn max_value(index: usize) -> u32 {
    let digits = u32::try_from(index + 1).unwrap_or(u32::MAX);
    10u32.checked_pow(digits).map_or(u32::MAX, |limit| limit - 1)
}

/// Errors encountered when parsing a dotted numeric version.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// There is no version text at all.
    #[error("version is empty")]
    Empty,
    /// A component is not a valid number (e.g. too large).
    #[error("{value:?} of version {version:?} is not a valid number")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
        version: String,
        value: String,
    },
}

/// Why a carry could not be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarryStop {
    /// The major component overflowed and there is nothing left to carry into.
    MajorOverflow { value: u32 },
    /// The version has no component at the requested index.
    MissingComponent { index: usize, len: usize },
}

impl std::fmt::Display for CarryStop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MajorOverflow { value } => write!(
                f,
                "major component {value} exceeds {} and cannot be carried",
                max_value(0)
            ),
            Self::MissingComponent { index, len } => write!(
                f,
                "version has {len} component(s) and no {} component",
                COMPONENT_NAMES.get(*index).copied().unwrap_or("unknown")
            ),
        }
    }
}

/// Result of incrementing a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Increment {
    /// The increment (and any carries) completed.
    Incremented,
    /// The increment stopped early.
    ///
    /// Components that were already reset or incremented keep their new value.
    CarryStopped(CarryStop),
}

impl Increment {
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::CarryStopped(_))
    }
}

/// A parsed dotted numeric version.
///
/// Holds up to [`NUM_COMPONENTS`] components, but versions with fewer
/// components are kept as they are and never padded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Version {
    components: Vec<u32>,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut components = self.components.iter();
        if let Some(first) = components.next() {
            write!(f, "{first}")?;
        }
        for component in components {
            write!(f, ".{component}")?;
        }
        Ok(())
    }
}

impl From<Vec<u32>> for Version {
    fn from(components: Vec<u32>) -> Self {
        Self { components }
    }
}

impl<const N: usize> From<[u32; N]> for Version {
    fn from(components: [u32; N]) -> Self {
        Self {
            components: components.to_vec(),
        }
    }
}

impl Version {
    /// Parse a version consisting of digits and dots only.
    ///
    /// Empty tokens (e.g. from `1..2` or a trailing dot) are skipped,
    /// so a value consisting only of dots has no components.
    ///
    /// # Errors
    /// - If the value is empty.
    /// - If a component does not fit into a `u32`.
    pub fn parse(value: &str) -> Result<Self, ParseError> {
        if value.is_empty() {
            return Err(ParseError::Empty);
        }
        let components = value
            .split('.')
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<u32>().map_err(|source| ParseError::InvalidNumber {
                    source,
                    version: value.to_string(),
                    value: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { components })
    }

    #[must_use]
    pub fn components(&self) -> &[u32] {
        &self.components
    }

    /// Value of the component at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u32> {
        self.components.get(index).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Increment the component selected by `precision`, carrying into more
    /// significant components on overflow.
    pub fn increment(&mut self, precision: Precision) -> Increment {
        self.increment_at(precision.index())
    }

    /// Increment the component at `index`.
    ///
    /// An overflowing component first carries into `index - 1` and is then reset to 1,
    /// even if that carry stopped further up.
    /// An overflowing major component is left untouched.
    pub fn increment_at(&mut self, index: usize) -> Increment {
        let Some(value) = self.get(index) else {
            return Increment::CarryStopped(CarryStop::MissingComponent {
                index,
                len: self.len(),
            });
        };

        if value >= max_value(index) {
            let Some(next) = index.checked_sub(1) else {
                return Increment::CarryStopped(CarryStop::MajorOverflow { value });
            };
            let outcome = self.increment_at(next);
            self.components[index] = 1;
            return outcome;
        }

        self.components[index] = value + 1;
        Increment::Incremented
    }
}
