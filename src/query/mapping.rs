//! Logical-to-physical property mappings.
//!
//! A [`MappingRegistry`] is built once at startup through
//! [`MappingRegistryBuilder`] and is read-only afterwards, so concurrent
//! lookups need no locking. Tables are keyed by the (source shape,
//! destination shape) type pair, e.g. `<AuthorDto, Author>`.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::query::error::{QueryError, QueryResult};

/// One logical property and the physical properties it expands to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    logical: String,
    physical: Vec<String>,
    reverse_direction: bool,
}

impl MappingEntry {
    /// Maps `logical` to the given physical properties, in order.
    pub fn new<I, S>(logical: impl Into<String>, physical: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            logical: logical.into(),
            physical: physical.into_iter().map(Into::into).collect(),
            reverse_direction: false,
        }
    }

    /// Flips the sort direction for every physical property of this entry.
    ///
    /// Used when the physical value orders opposite to the logical one,
    /// e.g. `Age` backed by `DateOfBirth`.
    pub fn reversed(mut self) -> Self {
        self.reverse_direction = true;
        self
    }

    pub fn logical(&self) -> &str {
        &self.logical
    }

    pub fn physical(&self) -> &[String] {
        &self.physical
    }

    pub fn reverse_direction(&self) -> bool {
        self.reverse_direction
    }
}

/// The set of entries for one (source, destination) pair.
///
/// Lookups by logical name are case-insensitive.
#[derive(Debug, Clone)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
    index: HashMap<String, usize>,
}

impl MappingTable {
    /// Builds a table, rejecting logical names that collide case-insensitively.
    pub fn new(entries: Vec<MappingEntry>) -> QueryResult<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if index.insert(entry.logical.to_lowercase(), i).is_some() {
                return Err(QueryError::DuplicateLogicalName(entry.logical.clone()));
            }
        }
        Ok(Self { entries, index })
    }

    /// Finds the entry for a logical name, ignoring case.
    pub fn get(&self, logical: &str) -> Option<&MappingEntry> {
        self.index
            .get(&logical.to_lowercase())
            .map(|&i| &self.entries[i])
    }

    pub fn contains(&self, logical: &str) -> bool {
        self.get(logical).is_some()
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Checks every comma-separated token of `fields` against the table.
    ///
    /// Tokens are trimmed and anything after the first space (an ordering
    /// qualifier such as `desc`) is ignored. Blank input is always valid.
    pub fn validate_fields(&self, fields: &str) -> bool {
        self.first_unknown(fields).is_none()
    }

    /// Checks the properties of an `orderBy` value before it is translated.
    ///
    /// Same rules as [`validate_fields`](Self::validate_fields); the first
    /// unknown logical name is reported as [`QueryError::UnknownSortKey`].
    pub fn check_sort_keys(&self, order_by: &str) -> QueryResult<()> {
        match self.first_unknown(order_by) {
            Some(name) => Err(QueryError::UnknownSortKey(name.to_string())),
            None => Ok(()),
        }
    }

    fn first_unknown<'a>(&self, fields: &'a str) -> Option<&'a str> {
        fields
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| token.split(' ').next().unwrap_or(token))
            .find(|name| !self.contains(name))
    }
}

type ShapePair = (TypeId, TypeId);

/// Accumulates mapping tables during startup.
#[derive(Debug, Default)]
pub struct MappingRegistryBuilder {
    tables: HashMap<ShapePair, Arc<MappingTable>>,
}

impl MappingRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the table for `<S, D>`.
    ///
    /// # Errors
    /// `DuplicateMapping` when the pair is already registered,
    /// `DuplicateLogicalName` when two entries share a logical name.
    pub fn register<S: 'static, D: 'static>(
        mut self,
        entries: Vec<MappingEntry>,
    ) -> QueryResult<Self> {
        let key = (TypeId::of::<S>(), TypeId::of::<D>());
        if self.tables.contains_key(&key) {
            return Err(QueryError::DuplicateMapping {
                source_shape: type_name::<S>(),
                destination_shape: type_name::<D>(),
            });
        }
        let table = MappingTable::new(entries)?;
        tracing::debug!(
            source = type_name::<S>(),
            destination = type_name::<D>(),
            entries = table.entries().len(),
            "Property mapping registered"
        );
        self.tables.insert(key, Arc::new(table));
        Ok(self)
    }

    /// Freezes the registry.
    pub fn build(self) -> MappingRegistry {
        MappingRegistry {
            tables: Arc::new(self.tables),
        }
    }
}

/// Immutable, cheaply clonable table of property mappings.
#[derive(Debug, Clone)]
pub struct MappingRegistry {
    tables: Arc<HashMap<ShapePair, Arc<MappingTable>>>,
}

impl MappingRegistry {
    pub fn builder() -> MappingRegistryBuilder {
        MappingRegistryBuilder::new()
    }

    /// Returns the table for `<S, D>`.
    ///
    /// # Errors
    /// `MappingNotFound` when nothing was registered for the pair. This is a
    /// wiring defect and should not be retried.
    pub fn lookup<S: 'static, D: 'static>(&self) -> QueryResult<&MappingTable> {
        self.tables
            .get(&(TypeId::of::<S>(), TypeId::of::<D>()))
            .map(Arc::as_ref)
            .ok_or(QueryError::MappingNotFound {
                source_shape: type_name::<S>(),
                destination_shape: type_name::<D>(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dto;
    struct Entity;
    struct Other;

    fn author_entries() -> Vec<MappingEntry> {
        vec![
            MappingEntry::new("Id", ["Id"]),
            MappingEntry::new("Genre", ["Genre"]),
            MappingEntry::new("Age", ["DateOfBirth"]).reversed(),
            MappingEntry::new("Name", ["FirstName", "LastName"]),
        ]
    }

    fn registry() -> MappingRegistry {
        MappingRegistry::builder()
            .register::<Dto, Entity>(author_entries())
            .unwrap()
            .build()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = registry();
        let table = registry.lookup::<Dto, Entity>().unwrap();
        assert_eq!(table.get("name").unwrap().physical(), ["FirstName", "LastName"]);
        assert!(table.get("AGE").unwrap().reverse_direction());
        assert!(table.get("unknown").is_none());
    }

    #[test]
    fn test_lookup_missing_pair() {
        let registry = registry();
        let err = registry.lookup::<Entity, Dto>().unwrap_err();
        assert!(matches!(err, QueryError::MappingNotFound { .. }));
        assert!(registry.lookup::<Dto, Other>().is_err());
    }

    #[test]
    fn test_duplicate_registration() {
        let err = MappingRegistry::builder()
            .register::<Dto, Entity>(author_entries())
            .unwrap()
            .register::<Dto, Entity>(vec![])
            .unwrap_err();
        assert!(matches!(err, QueryError::DuplicateMapping { .. }));
    }

    #[test]
    fn test_duplicate_logical_name() {
        let err = MappingTable::new(vec![
            MappingEntry::new("Name", ["FirstName"]),
            MappingEntry::new("NAME", ["LastName"]),
        ])
        .unwrap_err();
        assert!(matches!(err, QueryError::DuplicateLogicalName(name) if name == "NAME"));
    }

    #[test]
    fn test_validate_fields() {
        let registry = registry();
        let table = registry.lookup::<Dto, Entity>().unwrap();
        assert!(table.validate_fields(""));
        assert!(table.validate_fields("   "));
        assert!(table.validate_fields("Name"));
        assert!(table.validate_fields(" name desc , age"));
        assert!(table.validate_fields("Genre,"));
        assert!(!table.validate_fields("Name, Title"));

        assert!(table.check_sort_keys("age desc, name").is_ok());
        let err = table.check_sort_keys("age desc, title desc").unwrap_err();
        assert!(matches!(err, QueryError::UnknownSortKey(name) if name == "title"));
    }
}
