//! Derived, cached, read-only views over a model.
//!
//! Knowledge indices are computed on first request per model and cached in
//! the model's side table for that model's lifetime (see
//! [`Model::knowledge`](crate::Model::knowledge)).

pub mod nullable;
