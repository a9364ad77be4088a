//! Validation events: findings reported by diffing and validation.
//!
//! Event id strings are stable contracts: consumers filter and assert on
//! exact values such as `"RemovedServiceBoundShape"`, so changing an id is
//! a breaking change.

use std::fmt;

use crate::{ShapeId, SourceLocation};

/// How serious a finding is.
///
/// Ordered from least to most severe, with `Suppressed` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Note,
    Warning,
    Danger,
    Error,
    /// A finding that was matched by a suppression and demoted.
    Suppressed,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Note => "NOTE",
            Severity::Warning => "WARNING",
            Severity::Danger => "DANGER",
            Severity::Error => "ERROR",
            Severity::Suppressed => "SUPPRESSED",
        };
        write!(f, "{name}")
    }
}

/// A reported finding: severity, message, and an optional shape reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationEvent {
    id: String,
    severity: Severity,
    shape_id: Option<ShapeId>,
    message: String,
    source_location: Option<SourceLocation>,
}

impl ValidationEvent {
    /// Start building an event with the given stable id and severity.
    pub fn builder(id: impl Into<String>, severity: Severity) -> ValidationEventBuilder {
        ValidationEventBuilder {
            id: id.into(),
            severity,
            shape_id: None,
            message: String::new(),
            source_location: None,
        }
    }

    /// The stable event id consumers match on.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn shape_id(&self) -> Option<&ShapeId> {
        self.shape_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_location(&self) -> Option<&SourceLocation> {
        self.source_location.as_ref()
    }
}

impl fmt::Display for ValidationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.id)?;
        if let Some(shape_id) = &self.shape_id {
            write!(f, " ({shape_id})")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Staging builder for [`ValidationEvent`].
#[derive(Debug, Clone)]
pub struct ValidationEventBuilder {
    id: String,
    severity: Severity,
    shape_id: Option<ShapeId>,
    message: String,
    source_location: Option<SourceLocation>,
}

impl ValidationEventBuilder {
    pub fn shape_id(mut self, id: ShapeId) -> Self {
        self.shape_id = Some(id);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn source_location(mut self, location: SourceLocation) -> Self {
        self.source_location = Some(location);
        self
    }

    pub fn build(self) -> ValidationEvent {
        ValidationEvent {
            id: self.id,
            severity: self.severity,
            shape_id: self.shape_id,
            message: self.message,
            source_location: self.source_location,
        }
    }
}
