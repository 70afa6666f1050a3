//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, pagination and ids.

mod auth;
mod pagination;
mod path;
mod query;
mod validated;

pub use auth::{bearer_identity, CurrentUser};
pub use pagination::{Pagination, PaginationParams};
pub use path::{IdPath, PathParam};
pub use query::QueryParams;
pub use validated::ValidatedJson;
