//! Infer a shared, deduplicated type graph from sampled JSON documents.
pub mod cli;
pub mod error;
pub mod graph;
pub mod group;
pub mod inference;
pub mod jq_exec;
pub mod naming;
pub mod schema;
pub mod value;

pub use error::{InferenceError, Result};
pub use graph::{Primitive, Property, TypeGraph, TypeId, TypeKind};
pub use group::NestedGroup;
pub use inference::{Inference, InferenceOptions, Inferred, TypeInference, infer_from_values};
pub use value::{Sample, ValueStore};
