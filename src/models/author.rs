use jiff::civil::Date;
use uuid::Uuid;

use crate::query::{SortValue, Sortable};

/// An author as held by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Date,
    pub genre: String,
}

/// Author data supplied by a client; the repository assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Date,
    pub genre: String,
}

impl Author {
    pub fn from_new(id: Uuid, new_author: NewAuthor) -> Self {
        Self {
            id,
            first_name: new_author.first_name,
            last_name: new_author.last_name,
            date_of_birth: new_author.date_of_birth,
            genre: new_author.genre,
        }
    }

    /// `"{first} {last}"`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Completed years of age on `today`.
    pub fn age_on(&self, today: Date) -> i32 {
        let born = self.date_of_birth;
        let mut age = i32::from(today.year()) - i32::from(born.year());
        if (today.month(), today.day()) < (born.month(), born.day()) {
            age -= 1;
        }
        age
    }
}

impl Sortable for Author {
    const SORT_PROPERTIES: &'static [&'static str] =
        &["Id", "FirstName", "LastName", "DateOfBirth", "Genre"];

    fn sort_value(&self, property: &str) -> Option<SortValue<'_>> {
        match property {
            "Id" => Some(SortValue::Id(self.id)),
            "FirstName" => Some(SortValue::Text(&self.first_name)),
            "LastName" => Some(SortValue::Text(&self.last_name)),
            "DateOfBirth" => Some(SortValue::Date(self.date_of_birth)),
            "Genre" => Some(SortValue::Text(&self.genre)),
            _ => None,
        }
    }
}

/// Filters of the author collection endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorFilter {
    /// Exact genre, compared case-insensitively after trimming
    pub genre: Option<String>,
    /// Substring of genre, first name or last name, any case
    pub search_query: Option<String>,
}

impl AuthorFilter {
    pub fn matches(&self, author: &Author) -> bool {
        let genre_ok = self
            .genre
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .is_none_or(|genre| author.genre.trim().eq_ignore_ascii_case(genre));

        let search_ok = self
            .search_query
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty())
            .is_none_or(|query| {
                [&author.genre, &author.first_name, &author.last_name]
                    .iter()
                    .any(|value| value.to_lowercase().contains(&query))
            });

        genre_ok && search_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn author() -> Author {
        Author {
            id: Uuid::nil(),
            first_name: "George".into(),
            last_name: "Martin".into(),
            date_of_birth: date(1948, 9, 20),
            genre: "Fantasy".into(),
        }
    }

    #[test]
    fn test_age_before_and_after_birthday() {
        let author = author();
        assert_eq!(author.age_on(date(2024, 9, 19)), 75);
        assert_eq!(author.age_on(date(2024, 9, 20)), 76);
        assert_eq!(author.age_on(date(2025, 1, 1)), 76);
    }

    #[test]
    fn test_full_name() {
        assert_eq!(author().full_name(), "George Martin");
    }

    #[test]
    fn test_filter_genre() {
        let filter = AuthorFilter {
            genre: Some(" fantasy ".into()),
            search_query: None,
        };
        assert!(filter.matches(&author()));

        let filter = AuthorFilter {
            genre: Some("Horror".into()),
            search_query: None,
        };
        assert!(!filter.matches(&author()));
    }

    #[test]
    fn test_filter_search_query() {
        let hit = |q: &str| {
            AuthorFilter {
                genre: None,
                search_query: Some(q.into()),
            }
            .matches(&author())
        };
        assert!(hit("mart"));
        assert!(hit("GEO"));
        assert!(hit("tasy"));
        assert!(hit("  "));
        assert!(!hit("king"));
    }
}
