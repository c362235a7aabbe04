use uuid::Uuid;

use crate::query::{SortValue, Sortable};

/// A book, always owned by one author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

/// Book data supplied by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub description: Option<String>,
}

impl Book {
    pub fn from_new(id: Uuid, author_id: Uuid, new_book: NewBook) -> Self {
        Self {
            id,
            author_id,
            title: new_book.title,
            description: new_book.description,
        }
    }
}

impl Sortable for Book {
    const SORT_PROPERTIES: &'static [&'static str] = &["Id", "Title", "Description"];

    fn sort_value(&self, property: &str) -> Option<SortValue<'_>> {
        match property {
            "Id" => Some(SortValue::Id(self.id)),
            "Title" => Some(SortValue::Text(&self.title)),
            "Description" => self.description.as_deref().map(SortValue::Text),
            _ => None,
        }
    }
}
