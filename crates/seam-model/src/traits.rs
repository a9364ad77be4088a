//! Traits: structured metadata attached to shapes by id.
//!
//! A shape owns an insertion-ordered [`TraitMap`]; lookup is by trait id,
//! which is unique within a shape. The [`prelude`] module defines the ids of
//! the distinguished traits and shapes in the `seam.api` namespace that the
//! model core itself interprets.

use indexmap::IndexMap;

use crate::{Node, ShapeId, SourceLocation};

/// A trait value applied to a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Trait {
    id: ShapeId,
    value: Node,
    location: SourceLocation,
}

impl Trait {
    /// Create a trait with the given id and document value.
    pub fn new(id: ShapeId, value: Node) -> Self {
        Self {
            id,
            value,
            location: SourceLocation::none(),
        }
    }

    /// Create an annotation trait: one whose value is an empty object.
    pub fn annotation(id: ShapeId) -> Self {
        Self::new(id, Node::object())
    }

    /// Attach a source location to the trait.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn value(&self) -> &Node {
        &self.value
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }
}

/// Insertion-ordered mapping from trait id to trait.
pub type TraitMap = IndexMap<ShapeId, Trait>;

/// Distinguished trait and shape ids in the `seam.api` namespace.
pub mod prelude {
    use std::sync::LazyLock;

    use crate::ShapeId;

    fn parse(text: &str) -> ShapeId {
        text.parse().expect("prelude ids are well formed")
    }

    macro_rules! prelude_ids {
        ($($(#[$doc:meta])* $name:ident => $text:literal;)*) => {
            $(
                $(#[$doc])*
                pub fn $name() -> &'static ShapeId {
                    static ID: LazyLock<ShapeId> = LazyLock::new(|| parse($text));
                    &ID
                }
            )*
        };
    }

    prelude_ids! {
        /// Marks a structure member that must always be present.
        required => "seam.api#required";
        /// Marks a structure member that has a default value.
        default => "seam.api#default";
        /// Marks a structure member that clients must treat as optional.
        client_optional => "seam.api#clientOptional";
        /// Marks a structure as an operation input with loose coupling.
        input => "seam.api#input";
        /// Marks a list or map whose values may be null.
        sparse => "seam.api#sparse";
        /// Legacy v1 nullability marker on shapes and members.
        box_trait => "seam.api#box";
        /// Carry-over marker recording that a root shape was boxed in v1.
        box_v1 => "seam.api#boxV1";
        /// Marks a list whose items are unique; implicit on set shapes.
        unique_items => "seam.api#uniqueItems";
        /// The wire value of an enum member.
        enum_value => "seam.api#enumValue";
        /// Synthetic summary of an enum shape's members. Reserved: maintained
        /// by the member-management API and never set or removed directly.
        enum_trait => "seam.api#enum";
        /// Marks the distinguished unit structure.
        unit_type => "seam.api#unitType";
        /// The distinguished unit shape targeted by enum and idempotent members.
        unit => "seam.api#Unit";
    }
}

/// Keeps the legacy v1 `box` trait and its `boxV1` carry-over in sync on a
/// trait map at freeze time: either one implies the other.
pub(crate) fn sync_box_traits(traits: &mut TraitMap) {
    let has_box = traits.contains_key(prelude::box_trait());
    let has_v1 = traits.contains_key(prelude::box_v1());
    if has_box && !has_v1 {
        let id = prelude::box_v1().clone();
        traits.insert(id.clone(), Trait::annotation(id));
    } else if has_v1 && !has_box {
        let id = prelude::box_trait().clone();
        traits.insert(id.clone(), Trait::annotation(id));
    }
}
