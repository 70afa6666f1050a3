//! Route handlers
//!
//! All HTTP request handlers organized by domain. Role checks have already
//! run in the route guard by the time a handler is called.

pub mod auth;
pub mod comments;
pub mod dashboard;
pub mod exports;
pub mod health;
pub mod messages;
pub mod reports;
pub mod users;
