//! JSON Schema (draft-07) emission from the type graph.
//!
//! Classes and enums are emitted once under `definitions` and referenced by
//! `$ref`; everything else is inlined.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value, json};

use crate::graph::{Primitive, TypeGraph, TypeId, TypeKind};
use crate::naming::pascal_case;

const SCHEMA_DIALECT: &str = "http://json-schema.org/draft-07/schema#";

pub fn emit_schema(graph: &TypeGraph, root: TypeId) -> Value {
    let mut emitter = SchemaEmitter::new(graph);
    let body = emitter.schema_for(root);

    let mut out = Map::new();
    out.insert("$schema".into(), Value::from(SCHEMA_DIALECT));
    if let Value::Object(fields) = body {
        out.extend(fields);
    }
    if !emitter.definitions.is_empty() {
        out.insert("definitions".into(), Value::Object(emitter.definitions));
    }
    Value::Object(out)
}

struct SchemaEmitter<'t> {
    graph: &'t TypeGraph,
    definitions: Map<String, Value>,
    assigned: HashMap<TypeId, String>,
    taken: HashSet<String>,
}

impl<'t> SchemaEmitter<'t> {
    fn new(graph: &'t TypeGraph) -> Self {
        Self {
            graph,
            definitions: Map::new(),
            assigned: HashMap::new(),
            taken: HashSet::new(),
        }
    }

    fn schema_for(&mut self, id: TypeId) -> Value {
        let graph = self.graph;
        match graph.kind(id) {
            TypeKind::Primitive(Primitive::Any) => json!({}),
            TypeKind::Primitive(Primitive::Null) => json!({ "type": "null" }),
            TypeKind::Primitive(Primitive::Bool) => json!({ "type": "boolean" }),
            TypeKind::Primitive(Primitive::Integer) => json!({ "type": "integer" }),
            TypeKind::Primitive(Primitive::Double) => json!({ "type": "number" }),
            TypeKind::Primitive(Primitive::String) => json!({ "type": "string" }),
            TypeKind::Enum(cases) => self.definition(id, |_| {
                json!({ "type": "string", "enum": cases.iter().collect::<Vec<_>>() })
            }),
            TypeKind::Array(item) => json!({ "type": "array", "items": self.schema_for(*item) }),
            TypeKind::Map(value) => {
                json!({ "type": "object", "additionalProperties": self.schema_for(*value) })
            }
            TypeKind::Class(props) => self.definition(id, |emitter| {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for p in props {
                    properties.insert(p.name.clone(), emitter.schema_for(p.ty));
                    if !graph.is_nullable(p.ty) {
                        required.push(Value::from(p.name.clone()));
                    }
                }
                let mut o = json!({
                    "type": "object",
                    "additionalProperties": false,
                    "properties": properties,
                });
                if !required.is_empty() {
                    o["required"] = Value::Array(required);
                }
                o
            }),
            TypeKind::Union(members) => {
                json!({ "anyOf": members.iter().map(|m| self.schema_for(*m)).collect::<Vec<_>>() })
            }
        }
    }

    /// Emit `id` under `definitions` once and return a `$ref` to it.
    fn definition(&mut self, id: TypeId, body: impl FnOnce(&mut Self) -> Value) -> Value {
        if let Some(name) = self.assigned.get(&id) {
            return reference(name);
        }
        let name = self.unique_name(id);
        self.assigned.insert(id, name.clone());
        let schema = body(self);
        self.definitions.insert(name.clone(), schema);
        reference(&name)
    }

    fn unique_name(&mut self, id: TypeId) -> String {
        let base = match self.graph.name(id).map(pascal_case) {
            Some(name) if !name.is_empty() => name,
            _ => format!("Type{}", id.index()),
        };
        let mut name = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&name) {
            name = format!("{base}{suffix}");
            suffix += 1;
        }
        self.taken.insert(name.clone());
        name
    }
}

fn reference(name: &str) -> Value {
    json!({ "$ref": format!("#/definitions/{name}") })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::{InferenceOptions, infer_from_values};
    use pretty_assertions::assert_eq;

    fn schema(values: &[Value]) -> Value {
        let inferred = infer_from_values("root", values, InferenceOptions::default()).unwrap();
        emit_schema(&inferred.graph, inferred.root)
    }

    #[test]
    fn classes_are_emitted_as_definitions() {
        let s = schema(&[
            json!({"id": 1, "tag": "a"}),
            json!({"id": 2, "tag": "b"}),
            json!({"id": 3}),
        ]);
        assert_eq!(s["$ref"], json!("#/definitions/Root"));
        let root = &s["definitions"]["Root"];
        assert_eq!(root["properties"]["id"], json!({ "type": "integer" }));
        assert_eq!(root["required"], json!(["id"]));
        let tag = root["properties"]["tag"]["anyOf"].as_array().unwrap();
        assert_eq!(tag.len(), 2);
        assert!(tag.contains(&json!({ "type": "string" })));
        assert!(tag.contains(&json!({ "type": "null" })));
    }

    #[test]
    fn shared_classes_are_defined_once() {
        let s = schema(&[json!({"home": {"lat": 1.5}, "work": {"lat": 2.5}})]);
        let root = &s["definitions"]["Root"];
        assert_eq!(root["properties"]["home"], json!({ "$ref": "#/definitions/Home" }));
        assert_eq!(root["properties"]["work"], json!({ "$ref": "#/definitions/Home" }));
        assert_eq!(s["definitions"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn colliding_names_get_suffixes() {
        let s = schema(&[json!({"root": {"x": 1}})]);
        let definitions = s["definitions"].as_object().unwrap();
        assert!(definitions.contains_key("Root"));
        assert!(definitions.contains_key("Root2"));
    }

    #[test]
    fn enums_maps_and_arrays() {
        let colors: Vec<Value> = ["red", "green"].repeat(6).into_iter().map(Value::from).collect();
        let s = schema(&colors);
        assert_eq!(s["definitions"]["Root"], json!({ "type": "string", "enum": ["green", "red"] }));

        let mut wide = Map::new();
        for i in 0..20 {
            wide.insert(format!("k{i}"), json!(i));
        }
        let s = schema(&[Value::Object(wide)]);
        assert_eq!(s["type"], json!("object"));
        assert_eq!(s["additionalProperties"], json!({ "type": "integer" }));

        let s = schema(&[json!([])]);
        assert_eq!(s["items"], json!({}));
    }
}
