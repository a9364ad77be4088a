//! The partition of two models' identifiers into removed, added, and
//! common sets.

use seam_model::{Model, Shape, ShapeId};

/// A read-only snapshot of how two models differ, shared by every
/// evaluator in a comparison.
///
/// The id partition is computed once; all sets follow the models' id
/// iteration order, so evaluator output derived from them is
/// deterministic.
pub struct Differences {
    old: Model,
    new: Model,
    removed: Vec<ShapeId>,
    added: Vec<ShapeId>,
    common: Vec<ShapeId>,
}

impl Differences {
    pub(crate) fn new(old: &Model, new: &Model) -> Self {
        let removed = old
            .shape_ids()
            .filter(|id| !new.contains(*id))
            .cloned()
            .collect();
        let added = new
            .shape_ids()
            .filter(|id| !old.contains(*id))
            .cloned()
            .collect();
        let common = old
            .shape_ids()
            .filter(|id| new.contains(*id))
            .cloned()
            .collect();
        Self {
            old: old.clone(),
            new: new.clone(),
            removed,
            added,
            common,
        }
    }

    pub fn old_model(&self) -> &Model {
        &self.old
    }

    pub fn new_model(&self) -> &Model {
        &self.new
    }

    /// Ids present only in the old model.
    pub fn removed_ids(&self) -> &[ShapeId] {
        &self.removed
    }

    /// Ids present only in the new model.
    pub fn added_ids(&self) -> &[ShapeId] {
        &self.added
    }

    /// Ids present in both models, candidates for member- and trait-level
    /// diffing.
    pub fn common_ids(&self) -> &[ShapeId] {
        &self.common
    }

    pub fn removed_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.removed
            .iter()
            .map(|id| self.old.expect_shape(id).expect("partitioned from old model"))
    }

    pub fn added_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.added
            .iter()
            .map(|id| self.new.expect_shape(id).expect("partitioned from new model"))
    }

    /// Old/new shape pairs for every common id.
    pub fn changed_shapes(&self) -> impl Iterator<Item = (&Shape, &Shape)> {
        self.common.iter().map(|id| {
            (
                self.old.expect_shape(id).expect("partitioned from old model"),
                self.new.expect_shape(id).expect("partitioned from new model"),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use seam_model::{ModelAssembler, ShapeBuilder};

    use super::*;

    fn id(text: &str) -> ShapeId {
        text.parse().unwrap()
    }

    fn model_of(ids: &[&str]) -> Model {
        let mut assembler = ModelAssembler::new();
        for text in ids {
            assembler = assembler.add_builder(ShapeBuilder::string().id(id(text)));
        }
        assembler.assemble().unwrap()
    }

    #[test]
    fn test_partition() {
        let old = model_of(&["ns.foo#A", "ns.foo#B"]);
        let new = model_of(&["ns.foo#B", "ns.foo#C"]);
        let differences = Differences::new(&old, &new);

        assert_eq!(differences.removed_ids(), [id("ns.foo#A")]);
        assert_eq!(differences.added_ids(), [id("ns.foo#C")]);
        // The unit shape is common to every assembled model.
        assert!(differences.common_ids().contains(&id("ns.foo#B")));
    }

    #[test]
    fn test_identical_models_have_empty_removed_and_added_sets() {
        let model = model_of(&["ns.foo#A"]);
        let differences = Differences::new(&model, &model.clone());
        assert!(differences.removed_ids().is_empty());
        assert!(differences.added_ids().is_empty());
        assert_eq!(differences.common_ids().len(), model.len());
    }
}
