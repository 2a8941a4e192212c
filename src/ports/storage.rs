use crate::domain::{Club, Competition};

/// Durable storage for the club and competition collections
///
/// Collections are read once at startup and written back in full after each accepted booking.
/// Writes are synchronous: callers hold their transaction lock while saving so snapshots land in
/// the order they were taken.
#[mockall::automock]
pub trait StoragePort {
    fn load_clubs(&self) -> Result<Vec<Club>, Error>;
    fn load_competitions(&self) -> Result<Vec<Competition>, Error>;
    fn save_clubs(&self, clubs: &[Club]) -> Result<(), Error>;
    fn save_competitions(&self, competitions: &[Competition]) -> Result<(), Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Stored data can't be turned into domain objects
    #[error("invalid {field} for {entity}: {value:?}")]
    InvalidField {
        entity: String,
        field: &'static str,
        value: String,
    },

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as file system or serialization errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
