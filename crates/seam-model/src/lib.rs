//! Seam model - the shape graph at the core of the Seam IDL toolchain.
//!
//! Service APIs are described as an immutable graph of [`Shape`]s carrying
//! [`Trait`] metadata, assembled into a closed [`Model`] and queried through
//! derived knowledge indices such as [`NullableIndex`].
//!
//! # Pipeline Position
//!
//! ```text
//! Source / AST (external loaders)
//!     ↓ ShapeBuilder
//! Staged shapes - mutable, single-writer
//!     ↓ ModelAssembler (mixin resolution, closure validation)
//! Model - immutable, closed shape graph
//!     ↓ knowledge indices / diffing
//! Answers and ValidationEvents
//! ```
//!
//! Shapes and models are immutable after construction and freely shareable
//! across threads; builders are sequential staging objects whose
//! [`build`](ShapeBuilder::build) is a one-way freeze.

pub mod assembler;
pub mod error;
pub mod knowledge;
pub mod model;
pub mod node;
pub mod shapes;
pub mod source;
pub mod traits;
pub mod validation;

pub use assembler::ModelAssembler;
pub use error::{ExpectationError, StructuralError};
pub use knowledge::nullable::{CheckMode, NullableIndex};
pub use model::Model;
pub use node::Node;
pub use shapes::{
    EnumShape, ListShape, MapShape, MemberShape, OperationShape, ResourceShape, ServiceShape,
    SetShape, Shape, ShapeKind, ShapeType, SimpleType, StructureShape, UnionShape,
    builder::ShapeBuilder,
    shape_id::{ShapeId, ShapeIdError, ToShapeId},
};
pub use source::SourceLocation;
pub use traits::{Trait, TraitMap, prelude};
pub use validation::{Severity, ValidationEvent, ValidationEventBuilder};
