use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{Club, Competition, CompetitionListing, RejectionReason},
    ports::{clock::ClockPort, repository::RepositoryPort},
};
use tower::Service;

use super::{listing, DomainLogic, Error};

/// A club opening the booking form for a competition
pub struct OpenBookingRequest {
    pub club_name: String,
    pub competition_name: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum OpenBookingResponse {
    /// The club can book places in this competition
    Ready { club: Club, competition: Competition },
    /// The competition is over, back to the summary page
    PastCompetition {
        club: Club,
        competitions: Vec<CompetitionListing>,
    },
    /// The club or the competition does not exist
    NotFound,
}

impl OpenBookingResponse {
    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            OpenBookingResponse::Ready { .. } => None,
            OpenBookingResponse::PastCompetition { .. } => Some(RejectionReason::PastCompetition),
            OpenBookingResponse::NotFound => Some(RejectionReason::NotFound),
        }
    }
}

impl<R, C> Service<OpenBookingRequest> for DomainLogic<R, C>
where
    R: RepositoryPort + 'static,
    C: ClockPort + 'static,
{
    type Response = OpenBookingResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: OpenBookingRequest) -> Self::Future {
        let repository = self.repository.clone();
        let clock = self.clock.clone();
        Box::pin(async move {
            let club = repository.find_club_by_name(&req.club_name).await?;
            let competition = repository
                .find_competition_by_name(&req.competition_name)
                .await?;
            let (Some(club), Some(competition)) = (club, competition) else {
                return Ok(OpenBookingResponse::NotFound);
            };

            let now = clock.now();
            if competition.is_past(now) {
                return Ok(OpenBookingResponse::PastCompetition {
                    club,
                    competitions: listing(repository.as_ref(), now).await?,
                });
            }

            Ok(OpenBookingResponse::Ready { club, competition })
        })
    }
}
