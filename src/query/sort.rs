//! Sort specification parsing and logical-to-physical translation.
//!
//! `orderBy=name desc, age` is parsed into logical clauses, validated
//! against a [`MappingTable`], and expanded into physical [`SortClause`]s.
//! The resulting list is a genuine multi-key sort: the first clause is the
//! primary key, every following clause only breaks ties of the ones before.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::query::error::{QueryError, QueryResult};
use crate::query::mapping::MappingTable;

/// Direction of a single ordering term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Orients an ascending comparison result to this direction.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

}

/// A parsed, not yet validated, clause of a sort specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderClause<'a> {
    pub property: &'a str,
    pub direction: SortDirection,
}

/// One physical ordering term handed to the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortClause {
    pub property: String,
    pub direction: SortDirection,
}

impl SortClause {
    pub fn new(property: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }
}

/// Translates client sort specifications using one mapping table.
#[derive(Debug, Clone, Copy)]
pub struct SortTranslator<'a> {
    table: &'a MappingTable,
}

impl<'a> SortTranslator<'a> {
    pub fn new(table: &'a MappingTable) -> Self {
        Self { table }
    }

    /// Splits a specification into clauses, keeping their order.
    ///
    /// A clause ending in ` desc` (any case) sorts descending, otherwise
    /// ascending. The property name is everything before the first space.
    /// Blank clauses are skipped.
    pub fn parse(order_by: &str) -> Vec<OrderClause<'_>> {
        order_by
            .split(',')
            .map(str::trim)
            .filter(|clause| !clause.is_empty())
            .map(|clause| {
                let descending = clause.len() > 5
                    && clause
                        .get(clause.len() - 5..)
                        .is_some_and(|tail| tail.eq_ignore_ascii_case(" desc"));
                let property = clause.split(' ').next().unwrap_or(clause);
                OrderClause {
                    property,
                    direction: if descending {
                        SortDirection::Descending
                    } else {
                        SortDirection::Ascending
                    },
                }
            })
            .collect()
    }

    /// Parses, validates and expands `order_by` into physical terms.
    ///
    /// Every clause is validated before any is expanded, so an unknown key
    /// yields `UnknownSortKey` with no partial output. A blank specification
    /// yields an empty list.
    pub fn translate(&self, order_by: &str) -> QueryResult<Vec<SortClause>> {
        let clauses = Self::parse(order_by);

        let entries = clauses
            .iter()
            .map(|clause| {
                self.table
                    .get(clause.property)
                    .map(|entry| (entry, clause.direction))
                    .ok_or_else(|| QueryError::UnknownSortKey(clause.property.to_string()))
            })
            .collect::<QueryResult<Vec<_>>>()?;

        let terms: Vec<SortClause> = entries
            .into_iter()
            .flat_map(|(entry, direction)| {
                let direction = if entry.reverse_direction() {
                    direction.reversed()
                } else {
                    direction
                };
                entry
                    .physical()
                    .iter()
                    .map(move |property| SortClause::new(property.clone(), direction))
            })
            .collect();

        tracing::debug!(order_by = %order_by, terms = ?terms, "Sort specification translated");
        Ok(terms)
    }
}

/// A comparable value extracted from an entity for in-memory ordering.
///
/// Text orders case-insensitively; values differing only in case fall back
/// to a byte comparison so the order stays total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Integer(i64),
    Date(jiff::civil::Date),
    Id(Uuid),
}

impl SortValue<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Text(_) => 0,
            SortValue::Integer(_) => 1,
            SortValue::Date(_) => 2,
            SortValue::Id(_) => 3,
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

impl Ord for SortValue<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => compare_text(a, b),
            (SortValue::Integer(a), SortValue::Integer(b)) => a.cmp(b),
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            (SortValue::Id(a), SortValue::Id(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortValue<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Entities a data source can order by physical property name.
pub trait Sortable {
    /// Physical property names accepted by [`sort_value`](Self::sort_value).
    const SORT_PROPERTIES: &'static [&'static str];

    fn sort_value(&self, property: &str) -> Option<SortValue<'_>>;
}

/// Checks that every term names a property `T` can be ordered by.
pub fn ensure_sortable<T: Sortable>(terms: &[SortClause]) -> QueryResult<()> {
    match terms
        .iter()
        .find(|term| !T::SORT_PROPERTIES.contains(&term.property.as_str()))
    {
        Some(term) => Err(QueryError::UnsortableProperty(term.property.clone())),
        None => Ok(()),
    }
}

/// Compares two entities term by term; later terms only break ties.
pub fn compare_by<T: Sortable>(a: &T, b: &T, terms: &[SortClause]) -> Ordering {
    terms.iter().fold(Ordering::Equal, |acc, term| {
        acc.then_with(|| {
            let left = a.sort_value(&term.property);
            let right = b.sort_value(&term.property);
            term.direction.apply(left.cmp(&right))
        })
    })
}

/// Stable multi-key sort of `items` by `terms`.
pub fn sort_by_terms<T: Sortable>(items: &mut [T], terms: &[SortClause]) -> QueryResult<()> {
    ensure_sortable::<T>(terms)?;
    items.sort_by(|a, b| compare_by(a, b, terms));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::mapping::MappingEntry;
    use proptest::prelude::*;

    fn table() -> MappingTable {
        MappingTable::new(vec![
            MappingEntry::new("Id", ["Id"]),
            MappingEntry::new("Genre", ["Genre"]),
            MappingEntry::new("Age", ["DateOfBirth"]).reversed(),
            MappingEntry::new("Name", ["FirstName", "LastName"]),
        ])
        .unwrap()
    }

    #[derive(Debug, Clone)]
    struct Row {
        first: &'static str,
        last: &'static str,
        genre: &'static str,
        born: jiff::civil::Date,
    }

    impl Sortable for Row {
        const SORT_PROPERTIES: &'static [&'static str] =
            &["FirstName", "LastName", "Genre", "DateOfBirth"];

        fn sort_value(&self, property: &str) -> Option<SortValue<'_>> {
            match property {
                "FirstName" => Some(SortValue::Text(self.first)),
                "LastName" => Some(SortValue::Text(self.last)),
                "Genre" => Some(SortValue::Text(self.genre)),
                "DateOfBirth" => Some(SortValue::Date(self.born)),
                _ => None,
            }
        }
    }

    fn row(first: &'static str, last: &'static str, genre: &'static str, year: i16) -> Row {
        Row {
            first,
            last,
            genre,
            born: jiff::civil::date(year, 1, 1),
        }
    }

    #[test]
    fn test_parse_directions() {
        let clauses = SortTranslator::parse("name, age desc,genre DESC , id asc");
        assert_eq!(
            clauses,
            vec![
                OrderClause { property: "name", direction: SortDirection::Ascending },
                OrderClause { property: "age", direction: SortDirection::Descending },
                OrderClause { property: "genre", direction: SortDirection::Descending },
                OrderClause { property: "id", direction: SortDirection::Ascending },
            ]
        );
    }

    #[test]
    fn test_parse_skips_blank_clauses() {
        assert!(SortTranslator::parse("").is_empty());
        assert_eq!(SortTranslator::parse(" ,name,").len(), 1);
    }

    #[test]
    fn test_parse_bare_desc_is_a_property() {
        let clauses = SortTranslator::parse("desc");
        assert_eq!(clauses[0].property, "desc");
        assert_eq!(clauses[0].direction, SortDirection::Ascending);
    }

    #[test]
    fn test_translate_unknown_key() {
        let table = table();
        let err = SortTranslator::new(&table)
            .translate("name, unknownfield desc")
            .unwrap_err();
        assert!(matches!(err, QueryError::UnknownSortKey(name) if name == "unknownfield"));
    }

    #[test]
    fn test_translate_fan_out_keeps_entry_order() {
        let table = table();
        let terms = SortTranslator::new(&table).translate("Name desc").unwrap();
        assert_eq!(
            terms,
            vec![
                SortClause::new("FirstName", SortDirection::Descending),
                SortClause::new("LastName", SortDirection::Descending),
            ]
        );
    }

    #[test]
    fn test_translate_reverse_direction() {
        let table = table();
        let translator = SortTranslator::new(&table);
        assert_eq!(
            translator.translate("age").unwrap(),
            vec![SortClause::new("DateOfBirth", SortDirection::Descending)]
        );
        assert_eq!(
            translator.translate("age desc").unwrap(),
            vec![SortClause::new("DateOfBirth", SortDirection::Ascending)]
        );
    }

    #[test]
    fn test_translate_preserves_clause_order() {
        let table = table();
        let terms = SortTranslator::new(&table).translate("genre, name").unwrap();
        let properties: Vec<&str> = terms.iter().map(|t| t.property.as_str()).collect();
        assert_eq!(properties, ["Genre", "FirstName", "LastName"]);
    }

    #[test]
    fn test_multi_key_composition_primary_then_tiebreak() {
        // Sorting by name alone would put Ann first; genre must dominate.
        let mut rows = vec![
            row("Zed", "Young", "Fantasy", 1970),
            row("Ann", "Smith", "Horror", 1960),
            row("Bob", "Adams", "Fantasy", 1950),
            row("Ann", "Brown", "Horror", 1980),
        ];
        let table = table();
        let terms = SortTranslator::new(&table).translate("genre, name").unwrap();
        sort_by_terms(&mut rows, &terms).unwrap();

        let names: Vec<String> = rows.iter().map(|r| format!("{} {}", r.first, r.last)).collect();
        assert_eq!(names, ["Bob Adams", "Zed Young", "Ann Brown", "Ann Smith"]);
    }

    #[test]
    fn test_text_sort_ignores_case() {
        let mut rows = vec![
            row("Zed", "Young", "x", 1970),
            row("adams", "Lee", "x", 1960),
            row("Bob", "Adams", "x", 1950),
        ];
        let table = table();
        let terms = SortTranslator::new(&table).translate("name").unwrap();
        sort_by_terms(&mut rows, &terms).unwrap();
        let firsts: Vec<&str> = rows.iter().map(|r| r.first).collect();
        assert_eq!(firsts, ["adams", "Bob", "Zed"]);

        assert_eq!(SortValue::Text("abc").cmp(&SortValue::Text("ABC")), Ordering::Greater);
        assert_eq!(SortValue::Text("abc").cmp(&SortValue::Text("abc")), Ordering::Equal);
    }

    #[test]
    fn test_age_sort_orders_youngest_first() {
        let mut rows = vec![
            row("A", "A", "x", 1950),
            row("B", "B", "x", 1990),
            row("C", "C", "x", 1970),
        ];
        let table = table();
        let terms = SortTranslator::new(&table).translate("age").unwrap();
        sort_by_terms(&mut rows, &terms).unwrap();
        let firsts: Vec<&str> = rows.iter().map(|r| r.first).collect();
        assert_eq!(firsts, ["B", "C", "A"]);
    }

    #[test]
    fn test_unsortable_property() {
        let mut rows = vec![row("A", "A", "x", 1950)];
        let terms = vec![SortClause::new("Id", SortDirection::Ascending)];
        let err = sort_by_terms(&mut rows, &terms).unwrap_err();
        assert!(matches!(err, QueryError::UnsortableProperty(p) if p == "Id"));
    }

    proptest! {
        #[test]
        fn property_desc_suffix_is_case_insensitive(
            field in prop_oneof![Just("Id"), Just("Genre"), Just("Name"), Just("age")],
            suffix in "[dD][eE][sS][cC]",
        ) {
            let asc = SortTranslator::parse(field);
            prop_assert_eq!(asc[0].direction, SortDirection::Ascending);
            prop_assert_eq!(asc[0].property, field);

            let spec = format!("{} {}", field, suffix);
            let desc = SortTranslator::parse(&spec);
            prop_assert_eq!(desc[0].direction, SortDirection::Descending);
            prop_assert_eq!(desc[0].property, field);
        }

        #[test]
        fn property_unregistered_names_are_rejected(name in "[a-z]{3,12}") {
            let table = table();
            prop_assume!(!table.contains(&name));
            let err = SortTranslator::new(&table).translate(&name).unwrap_err();
            prop_assert!(matches!(err, QueryError::UnknownSortKey(n) if n == name));
        }
    }
}
