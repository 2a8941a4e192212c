use chrono::{DateTime, Utc};

/// Source of the current instant
///
/// Competitions are classified as past or future against this reading, never against a cached
/// value.
#[mockall::automock]
pub trait ClockPort {
    fn now(&self) -> DateTime<Utc>;
}
