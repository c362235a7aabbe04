//! Book DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{Book, NewBook};
use crate::query::Shape;

/// Book as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Shape)]
#[serde(rename_all = "camelCase")]
#[shape(rename_all = "camelCase")]
pub struct BookDto {
    pub id: Uuid,
    pub author_id: Uuid,
    #[schema(example = "The Shining")]
    pub title: String,
    pub description: Option<String>,
}

impl From<&Book> for BookDto {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            author_id: book.author_id,
            title: book.title.clone(),
            description: book.description.clone(),
        }
    }
}

/// Request body for creating a book.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookForCreation {
    #[validate(length(min = 1, max = 100, message = "Title is required and must be at most 100 characters"))]
    pub title: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Request body for replacing a book; also the target of JSON Patch documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookForUpdate {
    #[validate(length(min = 1, max = 100, message = "Title is required and must be at most 100 characters"))]
    pub title: String,

    #[validate(
        required(message = "Description is required"),
        length(max = 500, message = "Description must be at most 500 characters")
    )]
    pub description: Option<String>,
}

/// Title and description of a book input, checked for sameness.
pub trait BookContent {
    fn title(&self) -> &str;
    fn description(&self) -> Option<&str>;

    /// Rejects a description that repeats the title.
    fn ensure_title_differs(&self) -> AppResult<()> {
        if self.description() == Some(self.title()) {
            return Err(AppError::UnprocessableContent {
                message: "The provided description should be different from the title".to_string(),
            });
        }
        Ok(())
    }
}

impl BookContent for BookForCreation {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl BookContent for BookForUpdate {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl From<BookForCreation> for NewBook {
    fn from(dto: BookForCreation) -> Self {
        NewBook {
            title: dto.title,
            description: dto.description,
        }
    }
}

impl From<BookForUpdate> for NewBook {
    fn from(dto: BookForUpdate) -> Self {
        NewBook {
            title: dto.title,
            description: dto.description,
        }
    }
}

impl From<&Book> for BookForUpdate {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            description: book.description.clone(),
        }
    }
}

/// One JSON Patch (RFC 6902) operation on a book.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Replace { path: String, value: Value },
    Remove { path: String },
}

impl BookForUpdate {
    /// Applies patch operations in order. `remove` clears a member.
    ///
    /// Paths other than `/title` and `/description` (any case), and values
    /// that are not strings, are unprocessable.
    pub fn apply_patch(&mut self, operations: &[PatchOperation]) -> AppResult<()> {
        for operation in operations {
            match operation {
                PatchOperation::Add { path, value } | PatchOperation::Replace { path, value } => {
                    let text = value.as_str().map(str::to_string);
                    match (patch_target(path)?, text) {
                        (PatchTarget::Title, Some(text)) => self.title = text,
                        (PatchTarget::Description, text) if text.is_some() || value.is_null() => {
                            self.description = text
                        }
                        _ => {
                            return Err(AppError::UnprocessableContent {
                                message: format!("Value for '{}' must be a string", path),
                            });
                        }
                    }
                }
                PatchOperation::Remove { path } => match patch_target(path)? {
                    PatchTarget::Title => self.title.clear(),
                    PatchTarget::Description => self.description = None,
                },
            }
        }
        Ok(())
    }
}

enum PatchTarget {
    Title,
    Description,
}

fn patch_target(path: &str) -> AppResult<PatchTarget> {
    let member = path.trim_start_matches('/');
    if member.eq_ignore_ascii_case("title") {
        Ok(PatchTarget::Title)
    } else if member.eq_ignore_ascii_case("description") {
        Ok(PatchTarget::Description)
    } else {
        Err(AppError::UnprocessableContent {
            message: format!("The target location '{}' was not found", path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ops(value: Value) -> Vec<PatchOperation> {
        serde_json::from_value(value).unwrap()
    }

    fn current() -> BookForUpdate {
        BookForUpdate {
            title: "It".into(),
            description: Some("Clown".into()),
        }
    }

    #[test]
    fn test_field_table() {
        assert_eq!(BookDto::FIELDS, ["id", "authorId", "title", "description"]);
    }

    #[test]
    fn test_apply_replace_and_remove() {
        let mut book = current();
        book.apply_patch(&ops(json!([
            { "op": "replace", "path": "/Title", "value": "Carrie" },
            { "op": "remove", "path": "/description" }
        ])))
        .unwrap();
        assert_eq!(book.title, "Carrie");
        assert_eq!(book.description, None);
    }

    #[test]
    fn test_apply_add_null_description() {
        let mut book = current();
        book.apply_patch(&ops(json!([{ "op": "add", "path": "/description", "value": null }])))
            .unwrap();
        assert_eq!(book.description, None);
    }

    #[test]
    fn test_unknown_path_and_bad_value() {
        let mut book = current();
        let err = book
            .apply_patch(&ops(json!([{ "op": "replace", "path": "/isbn", "value": "x" }])))
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableContent { .. }));

        let err = book
            .apply_patch(&ops(json!([{ "op": "replace", "path": "/title", "value": 5 }])))
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableContent { .. }));
    }

    #[test]
    fn test_unsupported_op_fails_to_parse() {
        let result: Result<Vec<PatchOperation>, _> =
            serde_json::from_value(json!([{ "op": "move", "from": "/title", "path": "/description" }]));
        assert!(result.is_err());
    }

    #[test]
    fn test_title_must_differ_from_description() {
        let same = BookForUpdate {
            title: "Same".into(),
            description: Some("Same".into()),
        };
        assert!(matches!(
            same.ensure_title_differs(),
            Err(AppError::UnprocessableContent { .. })
        ));
        assert!(current().ensure_title_differs().is_ok());
    }

    #[test]
    fn test_update_requires_description() {
        let dto = BookForUpdate {
            title: "It".into(),
            description: None,
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("description"));
    }
}
