//! Error types for the resource query pipeline

use thiserror::Error;

/// Errors raised while translating, paging, shaping or linking a query.
///
/// `UnknownSortKey` and `UnknownField` are caller-input errors. The rest
/// point at wiring defects and are never the client's fault.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A sort clause names a logical property the mapping does not register
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    /// A field selection names an attribute the destination shape lacks
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// No mapping is registered for the (source, destination) pair
    #[error("No property mapping registered for <{source_shape}, {destination_shape}>")]
    MappingNotFound {
        source_shape: &'static str,
        destination_shape: &'static str,
    },

    /// A mapping for the (source, destination) pair already exists
    #[error("Property mapping for <{source_shape}, {destination_shape}> is already registered")]
    DuplicateMapping {
        source_shape: &'static str,
        destination_shape: &'static str,
    },

    /// A logical name appears twice within one mapping table
    #[error("Logical property '{0}' is declared more than once")]
    DuplicateLogicalName(String),

    /// The URL resolver knows no route with this name
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    /// A route template placeholder had no matching parameter
    #[error("Missing route parameter '{parameter}' for route {route}")]
    MissingRouteParameter { route: String, parameter: String },

    /// A sort term names a physical property the data source cannot order by
    #[error("Physical property '{0}' cannot be used for ordering")]
    UnsortableProperty(String),

    /// A shaped value failed to serialize
    #[error("Failed to serialize shaped field: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for the query pipeline
pub type QueryResult<T> = Result<T, QueryError>;
