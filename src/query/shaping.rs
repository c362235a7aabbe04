//! Field shaping: projecting an object onto the attributes a client asked for.
//!
//! Destination shapes implement [`Shape`], normally through
//! `#[derive(Shape)]`, which gives every shape a compile-time table of its
//! public field names in declaration order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::query::error::{QueryError, QueryResult};

/// A type whose public fields can be listed and read by position.
pub trait Shape {
    /// Public field names in declaration order.
    const FIELDS: &'static [&'static str];

    /// Serialized value of the field at `index` in [`FIELDS`](Self::FIELDS).
    fn field_value(&self, index: usize) -> serde_json::Result<Value>;
}

/// Finds a field of `T` by name, ignoring case.
fn field_index<T: Shape>(name: &str) -> Option<usize> {
    T::FIELDS.iter().position(|f| f.eq_ignore_ascii_case(name))
}

/// A resolved, ordered set of field positions of one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    indices: Vec<usize>,
}

impl FieldSelection {
    /// Every field of `T`, in declaration order.
    pub fn all<T: Shape>() -> Self {
        Self {
            indices: (0..T::FIELDS.len()).collect(),
        }
    }

    /// Resolves a comma-separated list against `T`.
    ///
    /// Names are trimmed and matched case-insensitively; the request order is
    /// kept and repeated names count once. Blank input selects every field.
    pub fn parse<T: Shape>(fields: &str) -> QueryResult<Self> {
        let mut indices = Vec::new();
        for name in fields.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let index =
                field_index::<T>(name).ok_or_else(|| QueryError::UnknownField(name.to_string()))?;
            if !indices.contains(&index) {
                indices.push(index);
            }
        }

        if indices.is_empty() {
            return Ok(Self::all::<T>());
        }
        Ok(Self { indices })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

/// The projected attributes of one object, in selection order.
///
/// Owns its values; nothing in it refers back to the source object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapedObject(Map<String, Value>);

impl ShapedObject {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends an extra member such as `links` after the shaped fields.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Applies field selections to [`Shape`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldShaper;

impl FieldShaper {
    /// Projects `object` onto `fields`, see [`FieldSelection::parse`].
    pub fn shape<T: Shape>(object: &T, fields: &str) -> QueryResult<ShapedObject> {
        let selection = FieldSelection::parse::<T>(fields)?;
        Self::shape_with(object, &selection)
    }

    /// Projects every object with one selection. Fails without partial output.
    pub fn shape_many<T: Shape>(objects: &[T], fields: &str) -> QueryResult<Vec<ShapedObject>> {
        let selection = FieldSelection::parse::<T>(fields)?;
        objects
            .iter()
            .map(|object| Self::shape_with(object, &selection))
            .collect()
    }

    pub fn shape_with<T: Shape>(object: &T, selection: &FieldSelection) -> QueryResult<ShapedObject> {
        let mut map = Map::with_capacity(selection.indices.len());
        for &index in &selection.indices {
            map.insert(T::FIELDS[index].to_string(), object.field_value(index)?);
        }
        Ok(ShapedObject(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macros::Shape;
    use proptest::prelude::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Shape)]
    #[shape(rename_all = "PascalCase")]
    struct BookView {
        id: u32,
        title: String,
        description: Option<String>,
        #[shape(skip)]
        #[allow(dead_code)]
        internal: bool,
    }

    fn book() -> BookView {
        BookView {
            id: 7,
            title: "Dune".into(),
            description: None,
            internal: true,
        }
    }

    #[test]
    fn test_field_table_from_derive() {
        assert_eq!(BookView::FIELDS, ["Id", "Title", "Description"]);
    }

    #[test]
    fn test_blank_fields_shape_everything() {
        let shaped = FieldShaper::shape(&book(), "").unwrap();
        assert_eq!(
            shaped.into_value(),
            json!({"Id": 7, "Title": "Dune", "Description": null})
        );
        let keys: Vec<_> = FieldShaper::shape(&book(), " , ").unwrap().keys().map(str::to_string).collect();
        assert_eq!(keys, ["Id", "Title", "Description"]);
    }

    #[test]
    fn test_selected_fields() {
        let shaped = FieldShaper::shape(&book(), "Id,Title").unwrap();
        assert_eq!(shaped.len(), 2);
        assert_eq!(shaped.get("Id"), Some(&json!(7)));
        assert_eq!(shaped.get("Title"), Some(&json!("Dune")));
    }

    #[test]
    fn test_request_order_and_case() {
        let shaped = FieldShaper::shape(&book(), " title , ID, title").unwrap();
        let keys: Vec<_> = shaped.keys().collect();
        assert_eq!(keys, ["Title", "Id"]);
        assert_eq!(
            serde_json::to_string(&shaped).unwrap(),
            r#"{"Title":"Dune","Id":7}"#
        );
    }

    #[test]
    fn test_unknown_field() {
        let err = FieldShaper::shape(&book(), "Id,Internal").unwrap_err();
        assert!(matches!(err, QueryError::UnknownField(name) if name == "Internal"));
        assert!(FieldSelection::parse::<BookView>("id, description").is_ok());
    }

    #[test]
    fn test_shape_many_is_atomic() {
        let books = vec![book(), book()];
        assert_eq!(FieldShaper::shape_many(&books, "Id").unwrap().len(), 2);
        assert!(FieldShaper::shape_many(&books, "Id,Nope").is_err());
        assert!(FieldShaper::shape_many::<BookView>(&[], "").unwrap().is_empty());
    }

    #[test]
    fn test_insert_appends_after_fields() {
        let mut shaped = FieldShaper::shape(&book(), "title").unwrap();
        shaped.insert("links", json!([]));
        let keys: Vec<_> = shaped.keys().collect();
        assert_eq!(keys, ["Title", "links"]);
    }

    proptest! {
        #[test]
        fn property_shaping_preserves_request_order(
            order in Just(vec!["Id", "Title", "Description"]).prop_shuffle(),
            take in 1usize..=3,
        ) {
            let requested = &order[..take];
            let shaped = FieldShaper::shape(&book(), &requested.join(",")).unwrap();
            let keys: Vec<_> = shaped.keys().collect();
            prop_assert_eq!(keys, requested.to_vec());
        }
    }
}
