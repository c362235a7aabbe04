//! HTTP request handlers for API endpoints.
//!
//! This module contains all request handlers organized by resource type.

pub mod author_collections;
pub mod authors;
pub mod books;
pub mod health;
