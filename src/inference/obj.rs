use indexmap::IndexMap;
use tracing::debug;

use crate::error::{InferenceError, Result};
use crate::graph::{Property, TypeId};
use crate::group::NestedGroup;
use crate::value::Sample;

use super::{MIN_MAP_PROPERTIES, TypeInference};

impl<'a> TypeInference<'a> {
    /// Infer a class (or a map, when every property agrees) from a group
    /// whose leaves are flattened object encodings.
    pub fn infer_class_type(&mut self, name: &str, objects: &NestedGroup<'_>) -> Result<TypeId> {
        let object_count = objects.leaf_count();

        let mut property_values: IndexMap<&'a str, Vec<Sample>> = IndexMap::new();
        for fields in objects.leaves() {
            for pair in fields.chunks(2) {
                let &[key, value] = pair else {
                    return Err(InferenceError::DanglingKey { name: name.to_owned() });
                };
                let Sample::InternedString(key) = key else {
                    return Err(InferenceError::NonStringKey { name: name.to_owned() });
                };
                property_values.entry(self.store.string(key)).or_default().push(value);
            }
        }

        let mut could_be_map = self.options.infer_maps;
        let mut first: Option<TypeId> = None;
        let mut properties = Vec::with_capacity(property_values.len());

        for (key, values) in &property_values {
            let mut ty = self.infer_type(key, &NestedGroup::Leaf(values))?;
            if values.len() < object_count {
                ty = self.graph.make_nullable(ty);
                if self.graph.is_nameable(ty) {
                    self.graph.add_name_hint(ty, key);
                }
            }
            match first {
                None => first = Some(ty),
                Some(shared) if shared != ty => could_be_map = false,
                Some(_) => {}
            }
            properties.push(Property::new(*key, ty));
        }

        if could_be_map && properties.len() >= MIN_MAP_PROPERTIES {
            if let Some(value) = first {
                debug!(name, properties = properties.len(), "homogeneous properties, inferring map");
                let map = self.graph.map(value);
                self.graph.add_name_hint(map, name);
                return Ok(map);
            }
        }

        let class = self.graph.class(properties);
        self.graph.add_name_hint(class, name);
        Ok(class)
    }
}
