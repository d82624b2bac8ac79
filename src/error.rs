//! Errors raised by an inference pass.
//!
//! Every variant marks a broken contract between the accumulator, the value
//! store and the driver. Input data itself never fails: any mix of tags,
//! depths and emptiness has a defined type.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    #[error("enum finalization for `{name}` was invoked with no observed cases")]
    EmptyEnum { name: String },

    #[error("class finalization for `{name}` found {count} parallel map candidate(s)")]
    MapCandidatesPresent { name: String, count: usize },

    #[error("object key in `{name}` is not an interned string")]
    NonStringKey { name: String },

    #[error("object encoding in `{name}` ends with a key that has no value")]
    DanglingKey { name: String },
}

pub type Result<T> = std::result::Result<T, InferenceError>;
