//! Link-carrying response wrappers.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::query::LinkDescriptor;

/// A resource with its links appended as a `links` member.
#[derive(Debug, Clone, Serialize)]
pub struct Linked<T> {
    #[serde(flatten)]
    pub resource: T,
    pub links: Vec<LinkDescriptor>,
}

impl<T> Linked<T> {
    pub fn new(resource: T, links: Vec<LinkDescriptor>) -> Self {
        Self { resource, links }
    }
}

/// A collection body: the items under `value`, the collection's own links under `links`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LinkedCollection {
    #[schema(value_type = Vec<Object>)]
    pub value: Vec<Value>,
    pub links: Vec<LinkDescriptor>,
}
