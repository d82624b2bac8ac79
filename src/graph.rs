//! Structurally deduplicated type graph.
//!
//! Every node is interned by its `TypeKind`, so two requests for the same
//! shape return the same `TypeId`. Names live beside the nodes as hints and
//! never take part in identity: two classes with equal properties collapse
//! to one node no matter what they were called.

use std::collections::BTreeSet;

use indexmap::IndexSet;
use serde::Serialize;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    /// Nothing was observed.
    Any,
    Null,
    Bool,
    Integer,
    Double,
    String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Property {
    pub name: String,
    pub ty: TypeId,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self { name: name.into(), ty }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Primitive(Primitive),
    Enum(BTreeSet<String>),
    Array(TypeId),
    /// Properties in first-discovery order.
    Class(Vec<Property>),
    Map(TypeId),
    Union(BTreeSet<TypeId>),
}

#[derive(Debug, Default)]
pub struct TypeGraph {
    kinds: IndexSet<TypeKind>,
    names: Vec<IndexSet<String>>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, kind: TypeKind) -> TypeId {
        let (index, inserted) = self.kinds.insert_full(kind);
        if inserted {
            self.names.push(IndexSet::new());
            trace!(id = index, kind = ?self.kinds[index], "new type node");
        }
        TypeId(index as u32)
    }

    pub fn primitive(&mut self, p: Primitive) -> TypeId {
        self.intern(TypeKind::Primitive(p))
    }

    pub fn enumeration<I, S>(&mut self, cases: I) -> TypeId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cases: BTreeSet<String> = cases.into_iter().map(Into::into).collect();
        debug_assert!(!cases.is_empty(), "enum types always carry at least one case");
        self.intern(TypeKind::Enum(cases))
    }

    pub fn array(&mut self, item: TypeId) -> TypeId {
        self.intern(TypeKind::Array(item))
    }

    pub fn map(&mut self, value: TypeId) -> TypeId {
        self.intern(TypeKind::Map(value))
    }

    pub fn class(&mut self, properties: Vec<Property>) -> TypeId {
        self.intern(TypeKind::Class(properties))
    }

    /// Flattens nested unions. A single member is returned as-is and an
    /// empty member list yields `Any`.
    pub fn union(&mut self, members: impl IntoIterator<Item = TypeId>) -> TypeId {
        let mut flat = BTreeSet::new();
        for member in members {
            match self.kind(member) {
                TypeKind::Union(inner) => flat.extend(inner.iter().copied()),
                _ => {
                    flat.insert(member);
                }
            }
        }
        if flat.len() > 1 {
            return self.intern(TypeKind::Union(flat));
        }
        match flat.first() {
            Some(&only) => only,
            None => self.primitive(Primitive::Any),
        }
    }

    pub fn make_nullable(&mut self, ty: TypeId) -> TypeId {
        let null = self.primitive(Primitive::Null);
        self.union([ty, null])
    }

    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.kinds[id.index()]
    }

    pub fn is_nullable(&self, id: TypeId) -> bool {
        match self.kind(id) {
            TypeKind::Primitive(Primitive::Null) => true,
            TypeKind::Union(members) => members
                .iter()
                .any(|m| matches!(self.kind(*m), TypeKind::Primitive(Primitive::Null))),
            _ => false,
        }
    }

    pub fn is_nameable(&self, id: TypeId) -> bool {
        matches!(
            self.kind(id),
            TypeKind::Enum(_) | TypeKind::Class(_) | TypeKind::Map(_) | TypeKind::Union(_)
        )
    }

    pub fn add_name_hint(&mut self, id: TypeId, hint: &str) {
        if !hint.is_empty() && !self.names[id.index()].contains(hint) {
            self.names[id.index()].insert(hint.to_owned());
        }
    }

    pub fn name_hints(&self, id: TypeId) -> impl Iterator<Item = &str> {
        self.names[id.index()].iter().map(String::as_str)
    }

    /// First hint attached to `id`, if any.
    pub fn name(&self, id: TypeId) -> Option<&str> {
        self.name_hints(id).next()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeKind)> {
        self.kinds.iter().enumerate().map(|(i, k)| (TypeId(i as u32), k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn identical_classes_collapse_regardless_of_name() {
        let mut graph = TypeGraph::new();
        let int = graph.primitive(Primitive::Integer);
        let a = graph.class(vec![Property::new("id", int)]);
        graph.add_name_hint(a, "User");
        let b = graph.class(vec![Property::new("id", int)]);
        graph.add_name_hint(b, "Account");

        assert_eq!(a, b);
        assert_eq!(graph.name_hints(a).collect::<Vec<_>>(), vec!["User", "Account"]);
        assert_eq!(graph.name(a), Some("User"));
    }

    #[test]
    fn property_order_is_part_of_identity() {
        let mut graph = TypeGraph::new();
        let int = graph.primitive(Primitive::Integer);
        let s = graph.primitive(Primitive::String);
        let ab = graph.class(vec![Property::new("a", int), Property::new("b", s)]);
        let ba = graph.class(vec![Property::new("b", s), Property::new("a", int)]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn unions_flatten_and_collapse() {
        let mut graph = TypeGraph::new();
        let int = graph.primitive(Primitive::Integer);
        let s = graph.primitive(Primitive::String);
        let b = graph.primitive(Primitive::Bool);

        assert_eq!(graph.union([int]), int);
        let empty = graph.union([]);
        assert_eq!(graph.kind(empty), &TypeKind::Primitive(Primitive::Any));

        let int_or_s = graph.union([int, s]);
        let nested = graph.union([int_or_s, b]);
        let flat = graph.union([b, s, int]);
        assert_eq!(nested, flat);
        assert_eq!(graph.kind(flat), &TypeKind::Union([int, s, b].into_iter().collect()));
    }

    #[test]
    fn nullable_wrapping_is_idempotent() {
        let mut graph = TypeGraph::new();
        let null = graph.primitive(Primitive::Null);
        let int = graph.primitive(Primitive::Integer);

        assert_eq!(graph.make_nullable(null), null);
        let once = graph.make_nullable(int);
        assert_eq!(graph.make_nullable(once), once);
        assert!(graph.is_nullable(once));
        assert!(!graph.is_nullable(int));
    }

    #[test]
    fn enum_identity_ignores_case_order() {
        let mut graph = TypeGraph::new();
        let a = graph.enumeration(["b", "a"]);
        let b = graph.enumeration(["a", "b", "a"]);
        assert_eq!(a, b);
        assert!(graph.is_nameable(a));
    }
}
