//! Value objects - immutable types that represent domain concepts

mod capabilities;
mod iso_week;
mod record_id;

pub use capabilities::Capabilities;
pub use iso_week::{IsoWeek, IsoWeekError};
pub use record_id::{IdGenerator, RecordId, RecordIdError};
