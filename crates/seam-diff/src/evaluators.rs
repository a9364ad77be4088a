//! Diff evaluators: independent detectors of one category of semantic
//! change between two models.

pub mod removed_service_bound_shape;

pub use removed_service_bound_shape::RemovedServiceBoundShape;

use seam_model::ValidationEvent;

use crate::Differences;

/// An independent unit of the diff engine.
///
/// Evaluators are pure and read-only over both models: they never mutate
/// either model and never depend on another evaluator's output, so the
/// engine is free to run them in parallel as long as the final event order
/// is restored by registration order. Each evaluator's own emission order
/// must be deterministic, typically the order of the relation being
/// compared.
pub trait DiffEvaluator: Send + Sync {
    /// A stable name used when reporting evaluator failures.
    fn name(&self) -> &'static str;

    /// Emit events for every change this evaluator detects.
    fn evaluate(&self, differences: &Differences) -> Vec<ValidationEvent>;
}

/// The evaluators every comparison runs, in registration order.
pub(crate) fn default_evaluators() -> Vec<Box<dyn DiffEvaluator>> {
    vec![Box::new(RemovedServiceBoundShape)]
}
