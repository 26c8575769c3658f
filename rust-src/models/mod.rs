//! Data models for traffic records and editor permissions.

mod role;
mod traffic_record;
mod validation;

pub use role::{Editor, Role};
pub use traffic_record::{TrafficRecord, UpsertOutcome};
pub use validation::{validate_date, validate_visits, ValidationError};
