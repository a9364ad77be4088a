//! Member nullability resolution.
//!
//! [`NullableIndex`] answers whether a member may be absent, deriving the
//! answer from the member's container kind and trait combinations under a
//! selectable consumer [`CheckMode`]. A legacy entry point implements the
//! pre-version-2 semantics, where only the `box` and `sparse` traits matter.

use std::sync::{Arc, Weak};

use log::trace;

use crate::{
    Model, Shape, ShapeKind, ShapeType,
    model::ModelInner,
    shapes::shape_id::ToShapeId,
    traits::prelude,
};

/// The kind of model consumer to assume when checking nullability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CheckMode {
    /// A non-authoritative consumer, such as a generated client, that must
    /// honor the `input` and `clientOptional` traits.
    #[default]
    Client,

    /// An authoritative consumer, such as a server deployed in lock-step
    /// with model updates, that ignores the optionality-widening traits.
    Server,
}

/// An index that checks whether a member is nullable.
///
/// Obtained through [`NullableIndex::of`], which caches the index per
/// model. The index holds only a weak reference to its model: using it
/// after the model has been dropped is a caller bug and panics with a
/// lifecycle message rather than silently answering from stale data.
pub struct NullableIndex {
    model: Weak<ModelInner>,
}

impl NullableIndex {
    fn new(model: &Model) -> Self {
        trace!(shape_count = model.len(); "building nullable index");
        Self {
            model: model.downgrade(),
        }
    }

    /// Get the nullable index of a model, building it on first request.
    pub fn of(model: &Model) -> Arc<Self> {
        model.knowledge(Self::new)
    }

    fn model(&self) -> Arc<ModelInner> {
        self.model
            .upgrade()
            .expect("NullableIndex accessed after its owning Model was dropped")
    }

    /// Check if a member is nullable under [`CheckMode::Client`].
    pub fn is_member_nullable(&self, member: &Shape) -> bool {
        self.is_member_nullable_in(member, CheckMode::Client)
    }

    /// Check if a member is nullable under the given mode.
    ///
    /// Non-member shapes are never nullable under these rules; use the
    /// legacy [`is_nullable`](Self::is_nullable) for whole-shape checks.
    pub fn is_member_nullable_in(&self, member: &Shape, mode: CheckMode) -> bool {
        let model = self.model();
        let Some(container_id) = member.member_container() else {
            return false;
        };
        let container = model
            .get_shape(&container_id)
            .expect("member containers exist in a closed model");

        match container.shape_type() {
            ShapeType::Structure => {
                // Client mode honors the optionality-widening traits.
                if mode == CheckMode::Client
                    && (member.has_trait(prelude::client_optional())
                        || container.has_trait(prelude::input()))
                {
                    return true;
                }
                // Required or defaulted structure members are not nullable.
                !member.has_trait(prelude::default()) && !member.has_trait(prelude::required())
            }
            // Union and set members are never null.
            ShapeType::Union | ShapeType::Set => false,
            ShapeType::Map => {
                // Map keys are never null.
                if member.member_name() == Some("key") {
                    return false;
                }
                container.has_trait(prelude::sparse())
            }
            // List members are only null when the list is sparse.
            ShapeType::List => container.has_trait(prelude::sparse()),
            _ => false,
        }
    }

    /// Check if a shape is nullable using the legacy v1 semantics.
    ///
    /// The `required`, `default`, `clientOptional`, and `input` traits are
    /// ignored entirely; only the `box` and `sparse` traits matter. An id
    /// that does not resolve in the model is treated as not nullable:
    /// reporting broken references is another component's job.
    pub fn is_nullable(&self, id: &impl ToShapeId) -> bool {
        let model = self.model();
        let Some(shape) = model.get_shape(id.to_shape_id()) else {
            return false;
        };

        match shape.kind() {
            ShapeKind::Member(_) => self.is_member_nullable_v1(&model, shape),
            ShapeKind::Simple(simple) if simple.is_boxable() => {
                shape.has_trait(prelude::box_trait())
            }
            // Aggregates, strings, and everything else default to nullable
            // in v1.
            _ => true,
        }
    }

    fn is_member_nullable_v1(&self, model: &ModelInner, member: &Shape) -> bool {
        let container = member
            .member_container()
            .and_then(|container_id| model.get_shape(&container_id).cloned());
        // Ignore broken models here; validators report the dangling ids.
        let Some(container) = container else {
            return false;
        };

        match container.shape_type() {
            ShapeType::Structure => {
                if member.has_trait(prelude::box_trait()) {
                    true
                } else {
                    let target = member.target().expect("member shapes carry targets");
                    self.is_nullable(target)
                }
            }
            ShapeType::Map => {
                if member.member_name() == Some("key") {
                    return false;
                }
                container.has_trait(prelude::sparse())
            }
            ShapeType::List => container.has_trait(prelude::sparse()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{ShapeBuilder, ShapeId, Trait};

    fn id(text: &str) -> ShapeId {
        text.parse().unwrap()
    }

    /// Flatten shapes and their members into a model the way the assembler
    /// would.
    fn model_of(shapes: Vec<Shape>) -> Model {
        let mut map = BTreeMap::new();
        for shape in shapes {
            for member in shape.members() {
                map.insert(member.id().clone(), member.clone());
            }
            map.insert(shape.id().clone(), shape);
        }
        Model::from_shapes(map)
    }

    fn integer() -> Shape {
        ShapeBuilder::integer().id(id("ns.foo#Int")).build().unwrap()
    }

    #[test]
    fn test_plain_structure_member_is_nullable() {
        let structure = ShapeBuilder::structure()
            .id(id("ns.foo#S"))
            .member("a", id("ns.foo#Int"))
            .build()
            .unwrap();
        let model = model_of(vec![structure, integer()]);
        let index = NullableIndex::of(&model);
        let member = model.expect_shape(&id("ns.foo#S$a")).unwrap();

        assert!(index.is_member_nullable(member));
        assert!(index.is_member_nullable_in(member, CheckMode::Server));
    }

    #[test]
    fn test_sparse_list_member_is_nullable() {
        let sparse_list = ShapeBuilder::list()
            .id(id("ns.foo#L"))
            .member("member", id("ns.foo#Int"))
            .add_trait(Trait::annotation(prelude::sparse().clone()))
            .build()
            .unwrap();
        let dense_list = ShapeBuilder::list()
            .id(id("ns.foo#D"))
            .member("member", id("ns.foo#Int"))
            .build()
            .unwrap();
        let model = model_of(vec![sparse_list, dense_list, integer()]);
        let index = NullableIndex::of(&model);

        let sparse = model.expect_shape(&id("ns.foo#L$member")).unwrap();
        let dense = model.expect_shape(&id("ns.foo#D$member")).unwrap();
        assert!(index.is_member_nullable(sparse));
        assert!(!index.is_member_nullable(dense));
    }

    #[test]
    fn test_v1_boxed_integer_is_nullable() {
        let boxed = ShapeBuilder::integer()
            .id(id("ns.foo#Boxed"))
            .add_trait(Trait::annotation(prelude::box_trait().clone()))
            .build()
            .unwrap();
        let model = model_of(vec![boxed, integer()]);
        let index = NullableIndex::of(&model);

        assert!(index.is_nullable(&id("ns.foo#Boxed")));
        assert!(!index.is_nullable(&id("ns.foo#Int")));
    }

    #[test]
    fn test_v1_unresolved_id_fails_soft() {
        let model = model_of(vec![integer()]);
        let index = NullableIndex::of(&model);
        assert!(!index.is_nullable(&id("ns.foo#Missing")));
    }

    #[test]
    fn test_index_is_cached_per_model() {
        let model = model_of(vec![integer()]);
        let first = NullableIndex::of(&model);
        let second = NullableIndex::of(&model);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    #[should_panic(expected = "owning Model was dropped")]
    fn test_access_after_model_drop_panics() {
        let model = model_of(vec![integer()]);
        let shape = model.expect_shape(&id("ns.foo#Int")).unwrap().clone();
        let index = NullableIndex::of(&model);
        drop(model);
        index.is_nullable(&shape);
    }
}
