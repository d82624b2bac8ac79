//! Recursive type inference over sampled JSON values.
//!
//! Samples are grouped per position (a property, an array element, the
//! document root). Each group is classified tag by tag into a
//! [`UnionAccumulator`], then finalized through a [`ShapeStrategy`] that
//! decides the structural heuristics:
//! - interned strings with few distinct literals become enums,
//! - objects become classes with nullable optional properties,
//! - classes with many properties of one shared type become maps,
//! - arrays recurse on their pooled elements under a singular name.
//!
//! All nodes are interned into one [`TypeGraph`] shared by the whole pass.
pub mod obj;
pub mod shape;
pub mod union;

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::graph::{TypeGraph, TypeId};
use crate::group::NestedGroup;
use crate::value::{Sample, ValueStore};

pub use shape::{ShapeStrategy, UnionShape};
pub use union::UnionAccumulator;

// ------------------------------- Policy ---------------------------------- //

/// Groups smaller than this never produce enums.
pub const MIN_ENUM_SAMPLES: usize = 10;

/// Classes with fewer properties are never turned into maps.
pub const MIN_MAP_PROPERTIES: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InferenceOptions {
    pub infer_maps: bool,
    pub infer_enums: bool,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self { infer_maps: true, infer_enums: true }
    }
}

// ------------------------------- Driver ---------------------------------- //

#[derive(Debug)]
pub struct TypeInference<'a> {
    store: &'a ValueStore,
    graph: TypeGraph,
    options: InferenceOptions,
}

impl<'a> TypeInference<'a> {
    pub fn new(store: &'a ValueStore, options: InferenceOptions) -> Self {
        Self::with_graph(store, TypeGraph::new(), options)
    }

    /// Continue interning into an existing graph.
    pub fn with_graph(store: &'a ValueStore, graph: TypeGraph, options: InferenceOptions) -> Self {
        Self { store, graph, options }
    }

    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    pub fn into_graph(self) -> TypeGraph {
        self.graph
    }

    /// Infer the (possibly union) type of every sample in `group`.
    pub fn infer_type(&mut self, name: &str, group: &NestedGroup<'_>) -> Result<TypeId> {
        let sample_count = group.sample_count();
        let try_enums = self.options.infer_enums && sample_count >= MIN_ENUM_SAMPLES;
        let store = self.store;

        let mut acc = UnionAccumulator::new();
        group.for_each_sample(|sample| match sample {
            Sample::Null => acc.register_null(),
            Sample::False | Sample::True => acc.register_bool(),
            Sample::Integer => acc.register_integer(),
            Sample::Double => acc.register_double(),
            // once a plain string is in, later literals stay plain too
            Sample::InternedString(id) if try_enums && !acc.has_string() => {
                acc.register_enum_case(store.string(id))
            }
            Sample::InternedString(_) | Sample::UninternedString => acc.register_string(),
            Sample::Object(id) => acc.register_class_candidate(store.object(id)),
            Sample::Array(id) => acc.register_array_candidate(store.array(id)),
        });

        let mut shape = ShapeStrategy::new(self, name, sample_count);
        let ty = acc.finalize(&mut shape)?;
        if self.graph.is_nameable(ty) {
            self.graph.add_name_hint(ty, name);
        }
        Ok(ty)
    }
}

// ------------------------------- Front API -------------------------------- //

#[derive(Debug)]
pub struct Inferred {
    pub graph: TypeGraph,
    pub root: TypeId,
}

/// Collects documents, then runs one pass over all of them.
#[derive(Debug, Default)]
pub struct Inference {
    store: ValueStore,
    samples: Vec<Sample>,
    options: InferenceOptions,
}

impl Inference {
    pub fn new(options: InferenceOptions) -> Self {
        Self { options, ..Self::default() }
    }

    pub fn observe_value(&mut self, v: &Value) {
        let sample = self.store.ingest(v);
        self.samples.push(sample);
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn solve(&self, name: &str) -> Result<Inferred> {
        let mut inference = TypeInference::new(&self.store, self.options);
        let root = inference.infer_type(name, &NestedGroup::Leaf(&self.samples))?;
        let graph = inference.into_graph();
        debug!(name, samples = self.samples.len(), types = graph.len(), "inference pass complete");
        Ok(Inferred { graph, root })
    }
}

pub fn infer_from_values<'v, I>(name: &str, values: I, options: InferenceOptions) -> Result<Inferred>
where
    I: IntoIterator<Item = &'v Value>,
{
    let mut inf = Inference::new(options);
    for v in values {
        inf.observe_value(v);
    }
    inf.solve(name)
}

// ------------------------------- Tests ------------------------------------ //
