use crate::domain::{Club, Competition};

#[mockall::automock]
#[async_trait::async_trait]
pub trait RepositoryPort {
    /// Find a club by its login email
    ///
    /// The match is exact and case-sensitive.
    async fn find_club_by_email(&self, email: &str) -> Result<Option<Club>, Error>;
    async fn find_club_by_name(&self, name: &str) -> Result<Option<Club>, Error>;
    async fn find_competition_by_name(&self, name: &str) -> Result<Option<Competition>, Error>;

    /// All clubs, in their original order
    async fn clubs(&self) -> Result<Vec<Club>, Error>;
    /// All competitions, in their original order
    async fn competitions(&self) -> Result<Vec<Competition>, Error>;

    /// Take `places` from both the competition and the club, then persist both collections
    ///
    /// Availability and affordability are checked again before mutating, as the state might
    /// have changed since the caller validated the booking. Once the mutation is applied there
    /// is no rollback, even if persisting fails.
    async fn apply_booking(
        &self,
        club_name: &str,
        competition_name: &str,
        places: u32,
    ) -> Result<(Club, Competition), Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("club {0} does not exist")]
    ClubNotFound(String),
    #[error("competition {0} does not exist")]
    CompetitionNotFound(String),

    /// Not enough places left in the competition
    ///
    /// This would result in a negative number of places, which is not supported.
    #[error("trying to book {requested} places with only {available} left")]
    InsufficientPlaces { available: u32, requested: u32 },
    /// Not enough points left for the club
    ///
    /// This would result in a negative number of points, which is not supported.
    #[error("trying to spend {requested} points from {available}")]
    InsufficientPoints { available: u32, requested: u32 },

    /// Persisting the collections failed
    ///
    /// The in-memory state has already been updated when this happens.
    #[error("storage error: {0}")]
    Storage(#[from] crate::ports::storage::Error),

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, configuration, or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
