//! Error types for building and querying models.

use thiserror::Error;

use crate::{ShapeId, SourceLocation};

/// A structural invariant violation raised while freezing a builder or
/// assembling a model.
///
/// Carries the offending shape id (when known) and the source location the
/// shape was defined at. Structural errors abort construction of the shape
/// and, transitively, the whole model assembly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", error_context(.id, .location))]
pub struct StructuralError {
    id: Option<ShapeId>,
    location: SourceLocation,
    message: String,
}

impl StructuralError {
    pub fn new(
        id: Option<ShapeId>,
        location: SourceLocation,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            location,
            message: message.into(),
        }
    }

    /// The id of the shape the violation was detected on, when known.
    pub fn id(&self) -> Option<&ShapeId> {
        self.id.as_ref()
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn error_context(id: &Option<ShapeId>, location: &SourceLocation) -> String {
    let mut context = String::new();
    if let Some(id) = id {
        context.push_str(&format!(" (shape `{id}`"));
        if location.is_none() {
            context.push(')');
        } else {
            context.push_str(&format!(" at {location})"));
        }
    } else if !location.is_none() {
        context.push_str(&format!(" (at {location})"));
    }
    context
}

/// A lookup that the caller asserted would succeed did not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpectationError {
    /// The model has no shape with the given id.
    #[error("shape `{0}` not found in the model")]
    ShapeNotFound(ShapeId),

    /// The shape has no trait with the given id.
    #[error("shape `{shape}` has no trait `{trait_id}`")]
    TraitNotFound { shape: ShapeId, trait_id: ShapeId },
}

impl ExpectationError {
    pub(crate) fn missing_trait(shape: &ShapeId, trait_id: &ShapeId) -> Self {
        Self::TraitNotFound {
            shape: shape.clone(),
            trait_id: trait_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error_display_with_shape_and_location() {
        let id: ShapeId = "ns.foo#Bar".parse().unwrap();
        let err = StructuralError::new(
            Some(id),
            SourceLocation::new("model.idl", 3, 7),
            "missing member target",
        );
        assert_eq!(
            err.to_string(),
            "missing member target (shape `ns.foo#Bar` at model.idl [3, 7])"
        );
    }

    #[test]
    fn test_structural_error_display_without_context() {
        let err = StructuralError::new(None, SourceLocation::none(), "oops");
        assert_eq!(err.to_string(), "oops");
    }
}
