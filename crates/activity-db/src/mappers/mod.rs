//! Model to entity mappers
//!
//! Rows are converted with `TryFrom` because enum columns are stored as text
//! and an unexpected value must surface as an error, not a panic.

mod comment;
mod message;
mod report;
mod user;

use std::str::FromStr;

use activity_core::{DomainError, IsoWeek};

/// Parse a text column into a domain enum
fn parse_column<T>(value: &str, column: &'static str) -> Result<T, DomainError>
where
    T: FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e| DomainError::DatabaseError(format!("column {column}: {e}")))
}

fn parse_week(value: &str) -> Result<IsoWeek, DomainError> {
    IsoWeek::parse(value)
        .map_err(|e| DomainError::DatabaseError(format!("column week_iso: {e}")))
}

/// Convert a vector of rows, failing on the first bad one
pub fn convert_all<M, E>(rows: Vec<M>) -> Result<Vec<E>, DomainError>
where
    E: TryFrom<M, Error = DomainError>,
{
    rows.into_iter().map(E::try_from).collect()
}
