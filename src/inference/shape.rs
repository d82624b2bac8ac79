use indexmap::IndexSet;
use tracing::debug;

use crate::error::{InferenceError, Result};
use crate::graph::{TypeGraph, TypeId};
use crate::group::NestedGroup;
use crate::naming::singular;

use super::TypeInference;

/// Decision hooks the accumulator calls once every sample is classified.
pub trait UnionShape<'g> {
    fn graph(&mut self) -> &mut TypeGraph;

    /// `Ok(None)` means the cases are free text and become a plain string.
    fn make_enum(&mut self, cases: &IndexSet<&'g str>) -> Result<Option<TypeId>>;

    fn make_class(&mut self, objects: NestedGroup<'g>, maps: &[TypeId]) -> Result<TypeId>;

    fn make_array(&mut self, arrays: NestedGroup<'g>) -> Result<TypeId>;
}

/// Per-invocation strategy: one type name, one sample count.
pub struct ShapeStrategy<'i, 'a> {
    inference: &'i mut TypeInference<'a>,
    name: &'i str,
    sample_count: usize,
}

impl<'i, 'a> ShapeStrategy<'i, 'a> {
    pub fn new(inference: &'i mut TypeInference<'a>, name: &'i str, sample_count: usize) -> Self {
        Self { inference, name, sample_count }
    }
}

impl<'g, 'i, 'a> UnionShape<'g> for ShapeStrategy<'i, 'a> {
    fn graph(&mut self) -> &mut TypeGraph {
        &mut self.inference.graph
    }

    fn make_enum(&mut self, cases: &IndexSet<&'g str>) -> Result<Option<TypeId>> {
        if cases.is_empty() {
            return Err(InferenceError::EmptyEnum { name: self.name.to_owned() });
        }
        // cases < sqrt(samples), kept in integers
        let distinct = cases.len();
        if distinct.saturating_mul(distinct) < self.sample_count {
            Ok(Some(self.inference.graph.enumeration(cases.iter().copied())))
        } else {
            debug!(
                name = self.name,
                distinct,
                samples = self.sample_count,
                "too many distinct literals for an enum, keeping string"
            );
            Ok(None)
        }
    }

    fn make_class(&mut self, objects: NestedGroup<'g>, maps: &[TypeId]) -> Result<TypeId> {
        if !maps.is_empty() {
            return Err(InferenceError::MapCandidatesPresent {
                name: self.name.to_owned(),
                count: maps.len(),
            });
        }
        self.inference.infer_class_type(self.name, &objects)
    }

    fn make_array(&mut self, arrays: NestedGroup<'g>) -> Result<TypeId> {
        let item_name = singular(self.name);
        let item = self.inference.infer_type(&item_name, &arrays)?;
        Ok(self.inference.graph.array(item))
    }
}
