//! The immutable model container.
//!
//! A [`Model`] is a closed graph of shapes keyed by id, produced once by the
//! [`ModelAssembler`](crate::ModelAssembler) and never mutated; "modifying"
//! a model means assembling a new one. `Model` is a cheap-to-clone handle
//! and is freely shareable across threads.

use std::{
    any::{Any, TypeId},
    collections::{BTreeMap, HashMap},
    fmt,
    sync::{Arc, Mutex, Weak},
};

use crate::{
    Shape,
    error::ExpectationError,
    shapes::shape_id::{ShapeId, ToShapeId},
};

pub(crate) struct ModelInner {
    shapes: BTreeMap<ShapeId, Shape>,
    // Lazily built derived indices, keyed by index type. The side table is
    // owned by the model and dropped with it; indices hold only a weak
    // back-reference, so the cache never keeps a model alive.
    knowledge: Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl ModelInner {
    pub(crate) fn get_shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }
}

/// An immutable, closed collection of shapes forming one version of an API
/// description.
#[derive(Clone)]
pub struct Model {
    inner: Arc<ModelInner>,
}

impl Model {
    pub(crate) fn from_shapes(shapes: BTreeMap<ShapeId, Shape>) -> Self {
        Self {
            inner: Arc::new(ModelInner {
                shapes,
                knowledge: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Look up a shape by id. Member shapes are addressable by their member
    /// ids alongside their containers.
    pub fn get_shape(&self, id: &impl ToShapeId) -> Option<&Shape> {
        self.inner.shapes.get(id.to_shape_id())
    }

    /// Look up a shape by id, failing when absent.
    pub fn expect_shape(&self, id: &impl ToShapeId) -> Result<&Shape, ExpectationError> {
        let id = id.to_shape_id();
        self.get_shape(id)
            .ok_or_else(|| ExpectationError::ShapeNotFound(id.clone()))
    }

    pub fn contains(&self, id: &impl ToShapeId) -> bool {
        self.inner.shapes.contains_key(id.to_shape_id())
    }

    /// All shapes in id order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.inner.shapes.values()
    }

    /// All shape ids in order.
    pub fn shape_ids(&self) -> impl Iterator<Item = &ShapeId> {
        self.inner.shapes.keys()
    }

    pub fn len(&self) -> usize {
        self.inner.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.shapes.is_empty()
    }

    /// Get or lazily build the derived index of type `T` for this model.
    ///
    /// The index is built at most once per model and cached until the model
    /// is dropped. The builder closure must not request knowledge indices
    /// itself, since the cache is locked while it runs.
    pub fn knowledge<T>(&self, build: impl FnOnce(&Model) -> T) -> Arc<T>
    where
        T: Any + Send + Sync,
    {
        let mut cache = self
            .inner
            .knowledge
            .lock()
            .expect("knowledge cache lock poisoned");
        let entry = cache
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Arc::new(build(self)));
        Arc::clone(entry)
            .downcast::<T>()
            .expect("knowledge cache entries are keyed by their own type")
    }

    pub(crate) fn downgrade(&self) -> Weak<ModelInner> {
        Arc::downgrade(&self.inner)
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("shapes", &self.inner.shapes)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.inner.shapes == other.inner.shapes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShapeBuilder;

    fn id(text: &str) -> ShapeId {
        text.parse().unwrap()
    }

    fn model_of(ids: &[&str]) -> Model {
        let shapes = ids
            .iter()
            .map(|text| {
                let shape_id = id(text);
                let shape = ShapeBuilder::string().id(shape_id.clone()).build().unwrap();
                (shape_id, shape)
            })
            .collect();
        Model::from_shapes(shapes)
    }

    #[test]
    fn test_get_and_expect_shape() {
        let model = model_of(&["ns.foo#A"]);
        assert!(model.get_shape(&id("ns.foo#A")).is_some());
        assert!(model.get_shape(&id("ns.foo#B")).is_none());
        assert_eq!(
            model.expect_shape(&id("ns.foo#B")).unwrap_err(),
            ExpectationError::ShapeNotFound(id("ns.foo#B")),
        );
    }

    #[test]
    fn test_iteration_is_id_ordered() {
        let model = model_of(&["ns.foo#B", "a.ns#Z", "ns.foo#A"]);
        let order: Vec<String> = model.shape_ids().map(ShapeId::to_string).collect();
        assert_eq!(order, ["a.ns#Z", "ns.foo#A", "ns.foo#B"]);
    }

    #[test]
    fn test_knowledge_is_cached_per_model() {
        struct Counter(usize);

        let model = model_of(&["ns.foo#A"]);
        let first = model.knowledge(|m| Counter(m.len()));
        let second = model.knowledge(|_| Counter(999));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.0, 1);
    }

    #[test]
    fn test_knowledge_cache_does_not_outlive_model() {
        let model = model_of(&["ns.foo#A"]);
        let weak = model.downgrade();
        let _index = model.knowledge(|_| ());
        drop(model);
        assert!(weak.upgrade().is_none());
    }
}
