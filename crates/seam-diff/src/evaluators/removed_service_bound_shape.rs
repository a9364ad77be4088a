//! Detects shapes unbound from a service's auxiliary bound-shape list.
//!
//! This evaluator is the exemplar of the general relation-diff pattern:
//! for each shape present in both models, compare one of its shape-id
//! collections and report the entries that disappeared. Operation error
//! lists and resource bindings diff the same way.

use std::collections::HashSet;

use seam_model::{Severity, ShapeId, ValidationEvent};

use crate::{Differences, evaluators::DiffEvaluator};

/// Emits a warning for every shape removed from a service's bound-shape
/// list.
///
/// Fires purely on removal from the binding relation: whether the unbound
/// shape still exists elsewhere in the new model is irrelevant. Services
/// removed entirely are another evaluator's concern, so their bindings are
/// not reported here. Emission follows the old model's binding declaration
/// order.
pub struct RemovedServiceBoundShape;

impl DiffEvaluator for RemovedServiceBoundShape {
    fn name(&self) -> &'static str {
        "RemovedServiceBoundShape"
    }

    fn evaluate(&self, differences: &Differences) -> Vec<ValidationEvent> {
        let mut events = Vec::new();
        for (old, new) in differences.changed_shapes() {
            let (Some(old_service), Some(new_service)) = (old.as_service(), new.as_service())
            else {
                continue;
            };
            let still_bound: HashSet<&ShapeId> = new_service.bound_shapes().iter().collect();
            for bound in old_service.bound_shapes() {
                if !still_bound.contains(bound) {
                    events.push(
                        ValidationEvent::builder("RemovedServiceBoundShape", Severity::Warning)
                            .shape_id(bound.clone())
                            .message(format!(
                                "the `{bound}` shape is no longer bound to the `{}` service",
                                old.id()
                            ))
                            .source_location(old.source().clone())
                            .build(),
                    );
                }
            }
        }
        events
    }
}
