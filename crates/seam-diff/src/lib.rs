//! Seam diff - semantic comparison of two Seam IDL models.
//!
//! [`ModelDiff`] structurally compares two immutable model snapshots and
//! reports semantic changes as ordered
//! [`ValidationEvent`](seam_model::ValidationEvent)s, driven by a registry
//! of independent [`DiffEvaluator`]s. Evaluators are registered explicitly:
//! there is no runtime discovery.
//!
//! # Examples
//!
//! ```
//! use seam_diff::ModelDiff;
//! use seam_model::{ModelAssembler, ShapeBuilder};
//!
//! let model = ModelAssembler::new()
//!     .add_builder(ShapeBuilder::string().id("ns.demo#Name".parse().unwrap()))
//!     .assemble()
//!     .unwrap();
//!
//! // A model compared against itself reports no changes.
//! assert!(ModelDiff::compare(&model, &model.clone()).is_empty());
//! ```

mod differences;
pub mod evaluators;

pub use differences::Differences;
pub use evaluators::{DiffEvaluator, RemovedServiceBoundShape};

use std::panic::{AssertUnwindSafe, catch_unwind};

use log::{debug, error};

use seam_model::{Model, ValidationEvent};

/// Compares two models and reports semantic changes.
pub struct ModelDiff;

impl ModelDiff {
    /// Compare two models with the default evaluators.
    ///
    /// Events are concatenated in evaluator-registration order, each
    /// evaluator's own emission order preserved.
    pub fn compare(old: &Model, new: &Model) -> Vec<ValidationEvent> {
        Self::builder().compare(old, new).into_events()
    }

    /// Start a comparison with the default evaluators, allowing additional
    /// evaluators to be registered.
    pub fn builder() -> ModelDiffBuilder {
        ModelDiffBuilder {
            evaluators: evaluators::default_evaluators(),
        }
    }
}

/// Configures a comparison: an ordered registry of evaluators.
pub struct ModelDiffBuilder {
    evaluators: Vec<Box<dyn DiffEvaluator>>,
}

impl ModelDiffBuilder {
    /// Register an evaluator after the ones already present.
    pub fn add_evaluator(mut self, evaluator: impl DiffEvaluator + 'static) -> Self {
        self.evaluators.push(Box::new(evaluator));
        self
    }

    /// Run every registered evaluator over the two models.
    ///
    /// Evaluators are isolated from one another: an unexpected panic inside
    /// one is caught, logged, and recorded as an [`EvaluatorFailure`] in
    /// the report while the remaining evaluators still run.
    pub fn compare(&self, old: &Model, new: &Model) -> DiffReport {
        let differences = Differences::new(old, new);
        debug!(
            removed = differences.removed_ids().len(),
            added = differences.added_ids().len(),
            common = differences.common_ids().len();
            "comparing models"
        );

        let mut events = Vec::new();
        let mut failures = Vec::new();
        for evaluator in &self.evaluators {
            match catch_unwind(AssertUnwindSafe(|| evaluator.evaluate(&differences))) {
                Ok(emitted) => events.extend(emitted),
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(evaluator = evaluator.name(); "diff evaluator failed: {message}");
                    failures.push(EvaluatorFailure {
                        evaluator: evaluator.name().to_string(),
                        message,
                    });
                }
            }
        }
        DiffReport { events, failures }
    }
}

/// The outcome of a comparison: emitted events plus diagnostic metadata for
/// evaluators that failed.
#[derive(Debug)]
pub struct DiffReport {
    events: Vec<ValidationEvent>,
    failures: Vec<EvaluatorFailure>,
}

impl DiffReport {
    /// Events from every evaluator that succeeded, in registration order.
    pub fn events(&self) -> &[ValidationEvent] {
        &self.events
    }

    /// Evaluators that failed during this comparison.
    pub fn failures(&self) -> &[EvaluatorFailure] {
        &self.failures
    }

    pub fn into_events(self) -> Vec<ValidationEvent> {
        self.events
    }
}

/// Diagnostic record of one evaluator failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorFailure {
    evaluator: String,
    message: String,
}

impl EvaluatorFailure {
    pub fn evaluator(&self) -> &str {
        &self.evaluator
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "evaluator panicked".to_string()
    }
}
