//! Shared utilities, configuration, and error handling for Gamebot
//!
//! This crate provides common functionality used across the Gamebot workspace:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Sort key resolution against registered allow-lists
//! - Signed opaque cursors and keyset pagination

pub mod config;
pub mod cursor;
pub mod db;
pub mod error;
pub mod pagination;
pub mod sort;

pub use cursor::{Boundary, Cursor, CursorCodec, CursorValue, Traversal};
pub use db::RepositoryError;
pub use error::{Error, ErrorKind, Result};
pub use pagination::{Page, Paginated, Pagination, Paginator, Window};
pub use sort::{SortDirection, SortDirective, SortField, SortOrders};
