use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Destination, Target, Unpack, UnpackError, UnpackPath, unpack_or_reset, unpack_target};

/// A map-shaped destination: accepts any string key.
pub trait MapTarget {
    /// Removes every entry.
    fn clear_entries(&mut self);

    /// Unpacks `value` and stores it under `key`.
    ///
    /// # Errors
    ///
    /// Fails when `value` does not fit the map value type.
    fn insert_entry(
        &mut self,
        key: &str,
        value: &Value,
        path: &mut UnpackPath,
    ) -> Result<(), UnpackError>;
}

pub(super) fn unpack_map(
    map: &mut dyn MapTarget,
    object: &Map<String, Value>,
    path: &mut UnpackPath,
) -> Result<(), UnpackError> {
    map.clear_entries();
    for (key, value) in object {
        path.push_key(key);
        let result = map.insert_entry(key, value, path);
        path.pop();
        result?;
    }
    Ok(())
}

impl MapTarget for Map<String, Value> {
    fn clear_entries(&mut self) {
        self.clear();
    }

    fn insert_entry(
        &mut self,
        key: &str,
        value: &Value,
        _path: &mut UnpackPath,
    ) -> Result<(), UnpackError> {
        self.insert(key.to_string(), value.clone());
        Ok(())
    }
}

impl Unpack for Map<String, Value> {
    fn unpack(&mut self, value: &Value, path: &mut UnpackPath) -> Result<(), UnpackError> {
        unpack_target(Target::Map(self), Some(value), path)
    }

    fn reset(&mut self) {
        self.clear();
    }
}

impl Destination for Map<String, Value> {
    fn target(&mut self) -> Target<'_> {
        Target::Map(self)
    }
}

macro_rules! map_destination {
    ($($map:ident),+) => {
        $(
            impl<V> MapTarget for $map<String, V>
            where
                V: Unpack + Default,
            {
                fn clear_entries(&mut self) {
                    self.clear();
                }

                fn insert_entry(
                    &mut self,
                    key: &str,
                    value: &Value,
                    path: &mut UnpackPath,
                ) -> Result<(), UnpackError> {
                    let mut slot = V::default();
                    unpack_or_reset(&mut slot, value, path)?;
                    self.insert(key.to_string(), slot);
                    Ok(())
                }
            }

            impl<V> Unpack for $map<String, V>
            where
                V: Unpack + Default,
            {
                fn unpack(&mut self, value: &Value, path: &mut UnpackPath) -> Result<(), UnpackError> {
                    unpack_target(Target::Map(self), Some(value), path)
                }

                fn reset(&mut self) {
                    self.clear();
                }
            }

            impl<V> Destination for $map<String, V>
            where
                V: Unpack + Default,
            {
                fn target(&mut self) -> Target<'_> {
                    Target::Map(self)
                }
            }
        )+
    };
}

map_destination!(HashMap, BTreeMap, IndexMap);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::unpack::unpack;

    #[test]
    fn should_copy_structure_without_filtering() {
        let data = json!({ "id": "1", "name": "bob", "extra": true });
        let mut map = HashMap::<String, Value>::new();

        unpack(Some(&data), &mut map).expect("should unpack");

        assert_eq!(map.len(), 3);
        assert_eq!(map.get("extra"), Some(&json!(true)));
    }

    #[test]
    fn should_clear_previous_entries() {
        let mut map = BTreeMap::from([("stale".to_string(), "value".to_string())]);

        unpack(Some(&json!({ "fresh": "value" })), &mut map).expect("should unpack");

        insta::assert_debug_snapshot!(map, @r#"
        {
            "fresh": "value",
        }
        "#);
    }

    #[test]
    fn should_keep_response_order_in_index_map() {
        let data = json!({ "b": 2, "a": 1, "c": 3 });
        let mut map = IndexMap::<String, i64>::new();

        unpack(Some(&data), &mut map).expect("should unpack");

        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        let expected: Vec<_> = data
            .as_object()
            .map(|object| object.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(keys, expected);
    }

    #[test]
    fn should_type_check_map_values() {
        let data = json!({ "count": "many" });
        let mut map = HashMap::<String, u32>::new();

        let error = unpack(Some(&data), &mut map).expect_err("should fail");

        assert_eq!(
            error,
            UnpackError::TypeMismatch {
                path: "count".to_string(),
                expected: "u32",
                actual: "string",
            }
        );
    }

    #[test]
    fn should_reject_non_object_data() {
        let mut map = Map::new();

        let error = unpack(Some(&json!([1, 2])), &mut map).expect_err("should fail");

        assert!(matches!(
            error,
            UnpackError::TypeMismatch { expected: "object", actual: "array", .. }
        ));
    }
}
