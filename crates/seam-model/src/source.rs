//! Source location metadata for error reporting.
//!
//! Locations are attached to shapes and traits by whatever loaded them and
//! are passed through unchanged; the model core only uses them when
//! formatting structural errors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a shape or trait was defined in its source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    filename: String,
    line: usize,
    column: usize,
}

impl SourceLocation {
    /// Create a location from a filename and 1-based line/column numbers.
    pub fn new(filename: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            filename: filename.into(),
            line,
            column,
        }
    }

    /// The location used for shapes with no source information.
    pub fn none() -> Self {
        Self {
            filename: String::new(),
            line: 0,
            column: 0,
        }
    }

    /// Returns `true` if this is the empty placeholder location.
    pub fn is_none(&self) -> bool {
        self.filename.is_empty() && self.line == 0 && self.column == 0
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "<unknown>")
        } else {
            write!(f, "{} [{}, {}]", self.filename, self.line, self.column)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let location = SourceLocation::new("weather.idl", 14, 3);
        assert_eq!(location.to_string(), "weather.idl [14, 3]");
    }

    #[test]
    fn test_none_placeholder() {
        assert!(SourceLocation::none().is_none());
        assert_eq!(SourceLocation::none().to_string(), "<unknown>");
        assert!(!SourceLocation::new("f", 1, 1).is_none());
    }
}
