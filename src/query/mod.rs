//! Resource query pipeline.
//!
//! Turns the loosely typed `orderBy`, `fields`, `pageNumber` and `pageSize`
//! parameters of a collection request into a validated sort, a page of
//! results with navigation metadata, and shaped objects carrying links.
//! Everything here is synchronous and CPU-only; the data source is reached
//! through the repository layer.

pub mod error;
pub mod links;
pub mod mapping;
pub mod pagination;
pub mod params;
pub mod shaping;
pub mod sort;

pub use error::{QueryError, QueryResult};
pub use links::{Affordance, LinkBuilder, LinkDescriptor, RouteParams, RouteTable, UrlResolver};
pub use macros::Shape;
pub use mapping::{MappingEntry, MappingRegistry, MappingRegistryBuilder, MappingTable};
pub use pagination::{PageRequest, PagedList, PaginationMetadata, Paginator, PagingPolicy};
pub use params::ResourceQuery;
pub use shaping::{FieldSelection, FieldShaper, Shape, ShapedObject};
pub use sort::{SortClause, SortDirection, SortTranslator, SortValue, Sortable};
