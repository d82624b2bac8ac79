use indexmap::IndexSet;

use crate::error::Result;
use crate::graph::{Primitive, TypeId};
use crate::group::NestedGroup;
use crate::value::Sample;

use super::shape::UnionShape;

/// Which kinds were seen during one inference invocation.
///
/// Compound candidates are kept as groups and only turned into types at
/// `finalize`, through the hooks of a [`UnionShape`].
#[derive(Clone, Debug, Default)]
pub struct UnionAccumulator<'g> {
    has_null: bool,
    has_bool: bool,
    has_integer: bool,
    has_double: bool,
    has_string: bool,
    enum_cases: IndexSet<&'g str>,
    objects: Vec<NestedGroup<'g>>,
    maps: Vec<TypeId>,
    arrays: Vec<NestedGroup<'g>>,
}

impl<'g> UnionAccumulator<'g> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_null(&mut self) {
        self.has_null = true;
    }

    pub fn register_bool(&mut self) {
        self.has_bool = true;
    }

    pub fn register_integer(&mut self) {
        self.has_integer = true;
    }

    pub fn register_double(&mut self) {
        self.has_double = true;
    }

    pub fn register_string(&mut self) {
        self.has_string = true;
    }

    pub fn register_enum_case(&mut self, literal: &'g str) {
        self.enum_cases.insert(literal);
    }

    /// `fields` is a flattened key/value object encoding.
    pub fn register_class_candidate(&mut self, fields: &'g [Sample]) {
        self.objects.push(NestedGroup::Leaf(fields));
    }

    /// A prebuilt map type; its value type is merged at finalization.
    pub fn register_map_candidate(&mut self, map: TypeId) {
        self.maps.push(map);
    }

    pub fn register_array_candidate(&mut self, items: NestedGroup<'g>) {
        self.arrays.push(items);
    }

    pub fn has_string(&self) -> bool {
        self.has_string
    }

    pub fn finalize<S: UnionShape<'g>>(self, shape: &mut S) -> Result<TypeId> {
        let mut members = Vec::new();
        let mut has_string = self.has_string;

        for (seen, p) in [
            (self.has_null, Primitive::Null),
            (self.has_bool, Primitive::Bool),
            (self.has_integer, Primitive::Integer),
            (self.has_double, Primitive::Double),
        ] {
            if seen {
                members.push(shape.graph().primitive(p));
            }
        }

        if !self.enum_cases.is_empty() {
            match shape.make_enum(&self.enum_cases)? {
                Some(enumeration) => members.push(enumeration),
                None => has_string = true,
            }
        }
        if has_string {
            members.push(shape.graph().primitive(Primitive::String));
        }

        if !self.objects.is_empty() {
            members.push(shape.make_class(NestedGroup::Branch(self.objects), &self.maps)?);
        } else if !self.maps.is_empty() {
            members.push(merge_maps(shape, &self.maps));
        }

        if !self.arrays.is_empty() {
            members.push(shape.make_array(NestedGroup::Branch(self.arrays))?);
        }

        Ok(shape.graph().union(members))
    }
}

fn merge_maps<'g, S: UnionShape<'g>>(shape: &mut S, maps: &[TypeId]) -> TypeId {
    let graph = shape.graph();
    let values: Vec<TypeId> = maps
        .iter()
        .map(|&m| match graph.kind(m) {
            crate::graph::TypeKind::Map(value) => *value,
            _ => m,
        })
        .collect();
    let value = graph.union(values);
    graph.map(value)
}
