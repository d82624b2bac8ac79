//! Compact sample encoding.
//!
//! Decoded JSON documents are flattened into a `ValueStore`: scalars become
//! bare tags, short strings are interned, objects become alternating
//! key/value runs and arrays become leaf groups. A `Sample` is the handle
//! that the inference pass walks over.

use indexmap::IndexSet;
use serde_json::Value;

use crate::group::NestedGroup;

// ------------------------------- Policy ---------------------------------- //

/// Strings longer than this (in chars) are never enum candidates.
pub const MAX_INTERNED_STRING_LEN: usize = 64;

// ------------------------------- Handles --------------------------------- //

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StringId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArrayId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sample {
    Null,
    False,
    True,
    Integer,
    Double,
    InternedString(StringId),
    UninternedString,
    Object(ObjectId),
    Array(ArrayId),
}

// -------------------------------- Store ---------------------------------- //

#[derive(Debug, Default)]
pub struct ValueStore {
    strings: IndexSet<String>,
    objects: Vec<Vec<Sample>>,
    arrays: Vec<Vec<Sample>>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn string(&self, id: StringId) -> &str {
        &self.strings[id.0 as usize]
    }

    /// Flattened `key, value, key, value, ...` encoding of an object.
    pub fn object(&self, id: ObjectId) -> &[Sample] {
        &self.objects[id.0 as usize]
    }

    pub fn array(&self, id: ArrayId) -> NestedGroup<'_> {
        NestedGroup::Leaf(&self.arrays[id.0 as usize])
    }

    /// One leaf per object sample; anything else is skipped.
    pub fn object_group(&self, samples: &[Sample]) -> NestedGroup<'_> {
        NestedGroup::Branch(
            samples
                .iter()
                .filter_map(|s| match *s {
                    Sample::Object(id) => Some(NestedGroup::Leaf(self.object(id))),
                    _ => None,
                })
                .collect(),
        )
    }

    pub fn intern(&mut self, s: &str) -> Sample {
        let index = match self.strings.get_index_of(s) {
            Some(index) => index,
            None => self.strings.insert_full(s.to_owned()).0,
        };
        Sample::InternedString(StringId(index as u32))
    }

    pub fn push_object<'k>(&mut self, fields: impl IntoIterator<Item = (&'k str, Sample)>) -> Sample {
        let mut flat = Vec::new();
        for (key, value) in fields {
            flat.push(self.intern(key));
            flat.push(value);
        }
        self.objects.push(flat);
        Sample::Object(ObjectId((self.objects.len() - 1) as u32))
    }

    pub fn push_array(&mut self, items: impl IntoIterator<Item = Sample>) -> Sample {
        self.arrays.push(items.into_iter().collect());
        Sample::Array(ArrayId((self.arrays.len() - 1) as u32))
    }

    pub fn ingest(&mut self, v: &Value) -> Sample {
        match v {
            Value::Null => Sample::Null,
            Value::Bool(false) => Sample::False,
            Value::Bool(true) => Sample::True,
            Value::Number(n) if n.is_i64() || n.is_u64() => Sample::Integer,
            Value::Number(_) => Sample::Double,
            Value::String(s) if s.chars().count() <= MAX_INTERNED_STRING_LEN => self.intern(s),
            Value::String(_) => Sample::UninternedString,
            Value::Array(xs) => {
                let items: Vec<Sample> = xs.iter().map(|x| self.ingest(x)).collect();
                self.push_array(items)
            }
            Value::Object(map) => {
                let mut flat = Vec::with_capacity(map.len() * 2);
                for (k, x) in map {
                    flat.push(self.intern(k));
                    flat.push(self.ingest(x));
                }
                self.objects.push(flat);
                Sample::Object(ObjectId((self.objects.len() - 1) as u32))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn scalars_are_tagged_by_kind() {
        let mut store = ValueStore::new();
        assert_eq!(store.ingest(&json!(null)), Sample::Null);
        assert_eq!(store.ingest(&json!(false)), Sample::False);
        assert_eq!(store.ingest(&json!(true)), Sample::True);
        assert_eq!(store.ingest(&json!(42)), Sample::Integer);
        assert_eq!(store.ingest(&json!(u64::MAX)), Sample::Integer);
        assert_eq!(store.ingest(&json!(4.5)), Sample::Double);
    }

    #[test]
    fn short_strings_are_interned_once() {
        let mut store = ValueStore::new();
        let a = store.ingest(&json!("red"));
        let b = store.ingest(&json!("red"));
        assert_eq!(a, b);
        let Sample::InternedString(id) = a else { panic!("expected interned string, got {a:?}") };
        assert_eq!(store.string(id), "red");

        let long = "x".repeat(MAX_INTERNED_STRING_LEN + 1);
        assert_eq!(store.ingest(&Value::String(long)), Sample::UninternedString);
    }

    #[test]
    fn objects_flatten_in_document_order() {
        let mut store = ValueStore::new();
        let long = "y".repeat(200);
        let sample = store.ingest(&json!({ "zeta": 1, "alpha": [true], long.as_str(): null }));
        let Sample::Object(id) = sample else { panic!("expected object") };

        let fields = store.object(id);
        assert_eq!(fields.len(), 6);
        let keys: Vec<&str> = fields
            .chunks(2)
            .map(|pair| match pair[0] {
                Sample::InternedString(k) => store.string(k),
                other => panic!("key not interned: {other:?}"),
            })
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", long.as_str()]);

        let Sample::Array(arr) = fields[3] else { panic!("expected array") };
        assert_eq!(store.array(arr).sample_count(), 1);
    }

    #[test]
    fn object_group_has_one_leaf_per_object() {
        let mut store = ValueStore::new();
        let samples = vec![
            store.ingest(&json!({ "a": 1 })),
            store.ingest(&json!(3)),
            store.ingest(&json!({})),
        ];
        let group = store.object_group(&samples);
        assert_eq!(group.leaf_count(), 2);
        assert_eq!(group.sample_count(), 2);
    }
}
