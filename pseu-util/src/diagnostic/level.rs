use std::fmt;

/// Diagnostic severity. Only `Error` and `Warning` are produced by this
/// pipeline (spec.md §7); `Note`/`Help` exist for symmetry with the
/// builder API and for future compiler passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Error,
    Warning,
    Note,
    Help,
}

impl Level {
    pub fn is_error(self) -> bool {
        matches!(self, Level::Error)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
            Level::Help => write!(f, "help"),
        }
    }
}
