use crate::{
    domain::{Club, Competition},
    ports::{
        repository::{Error, RepositoryPort},
        storage::{self, StoragePort},
    },
};
use std::sync::{Arc, Mutex, PoisonError};

/// Authoritative in-memory copy of the clubs and competitions
///
/// Every booking runs under a single lock, from the final availability check to the end of
/// persistence. Clones share the same state.
pub struct MemoryRepository<S> {
    state: Arc<Mutex<State>>,
    storage: Arc<S>,
}

#[derive(Debug, Default)]
struct State {
    clubs: Vec<Club>,
    competitions: Vec<Competition>,
}

impl<S: StoragePort> MemoryRepository<S> {
    pub fn new(storage: S, clubs: Vec<Club>, competitions: Vec<Competition>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                clubs,
                competitions,
            })),
            storage: Arc::new(storage),
        }
    }

    /// Load both collections from `storage`
    ///
    /// This is the only time the repository reads from storage.
    pub fn load(storage: S) -> Result<Self, storage::Error> {
        let clubs = storage.load_clubs()?;
        let competitions = storage.load_competitions()?;
        tracing::info!(
            clubs = clubs.len(),
            competitions = competitions.len(),
            "loaded collections"
        );

        Ok(Self::new(storage, clubs, competitions))
    }
}

impl<S> Clone for MemoryRepository<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            storage: self.storage.clone(),
        }
    }
}

#[async_trait::async_trait]
impl<S> RepositoryPort for MemoryRepository<S>
where
    S: StoragePort + Send + Sync + 'static,
{
    async fn find_club_by_email(&self, email: &str) -> Result<Option<Club>, Error> {
        let club = self
            .state
            .lock()?
            .clubs
            .iter()
            .find(|club| club.email == email)
            .cloned();

        Ok(club)
    }

    async fn find_club_by_name(&self, name: &str) -> Result<Option<Club>, Error> {
        let club = self
            .state
            .lock()?
            .clubs
            .iter()
            .find(|club| club.name == name)
            .cloned();

        Ok(club)
    }

    async fn find_competition_by_name(&self, name: &str) -> Result<Option<Competition>, Error> {
        let competition = self
            .state
            .lock()?
            .competitions
            .iter()
            .find(|competition| competition.name == name)
            .cloned();

        Ok(competition)
    }

    async fn clubs(&self) -> Result<Vec<Club>, Error> {
        Ok(self.state.lock()?.clubs.clone())
    }

    async fn competitions(&self) -> Result<Vec<Competition>, Error> {
        Ok(self.state.lock()?.competitions.clone())
    }

    async fn apply_booking(
        &self,
        club_name: &str,
        competition_name: &str,
        places: u32,
    ) -> Result<(Club, Competition), Error> {
        let mut state = self.state.lock()?;
        let State {
            clubs,
            competitions,
        } = &mut *state;

        let club = clubs
            .iter_mut()
            .find(|club| club.name == club_name)
            .ok_or_else(|| Error::ClubNotFound(club_name.to_string()))?;
        let competition = competitions
            .iter_mut()
            .find(|competition| competition.name == competition_name)
            .ok_or_else(|| Error::CompetitionNotFound(competition_name.to_string()))?;

        // Return an error if this would make either total negative
        if places > competition.number_of_places {
            return Err(Error::InsufficientPlaces {
                available: competition.number_of_places,
                requested: places,
            });
        }
        if places > club.points {
            return Err(Error::InsufficientPoints {
                available: club.points,
                requested: places,
            });
        }

        competition.number_of_places -= places;
        club.points -= places;
        let updated = (club.clone(), competition.clone());

        // Persist while still holding the lock
        self.storage.save_clubs(clubs)?;
        self.storage.save_competitions(competitions)?;

        Ok(updated)
    }
}

/// Erased [`PoisonError`]
///
/// `PoisonError` keeps the `MutexGuard` internally, which is not send. Thus we erase the error
/// and only keep the string representation instead.
#[derive(Debug, thiserror::Error)]
#[error("poison error: {0}")]
pub struct ErasedPoisonError(String);

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}
