use std::sync::Arc;

use crate::{
    domain::{competition_listing, CompetitionListing},
    ports::repository::RepositoryPort,
};

pub mod open_booking;
pub mod purchase_places;
pub mod scoreboard;
pub mod show_summary;

/// Entry point for every request
///
/// Each request type is handled by a [`tower::Service`] implementation in its own module.
pub struct DomainLogic<R, C> {
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> DomainLogic<R, C> {
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }
}

impl<R, C> Clone for DomainLogic<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            clock: self.clock.clone(),
        }
    }
}

/// Failures outside of the booking rules
///
/// Refused requests are part of a successful response. These errors mean the request could not
/// be processed at all.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("repository port error: {0:?}")]
    Repository(#[from] crate::ports::repository::Error),
}

/// Current competitions, annotated with whether they are past at `now`
async fn listing<R: RepositoryPort>(
    repository: &R,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<Vec<CompetitionListing>, Error> {
    let competitions = repository.competitions().await?;
    Ok(competition_listing(&competitions, now))
}
