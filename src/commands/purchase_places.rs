use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{
        booking::{validate, Verdict},
        Club, Competition, CompetitionListing, RejectionReason,
    },
    ports::{clock::ClockPort, repository, repository::RepositoryPort},
};
use tower::Service;

use super::{listing, DomainLogic, Error};

/// A club asking for places in a competition
pub struct PurchasePlacesRequest {
    pub club_name: String,
    pub competition_name: String,
    /// Number of places as submitted by the club
    ///
    /// This is not trusted: it might be missing or not be a number at all.
    pub places: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookingOutcome {
    Accepted { places: u32 },
    Rejected { reason: RejectionReason },
}

#[derive(Debug, PartialEq, Eq)]
pub struct PurchasePlacesResponse {
    pub outcome: BookingOutcome,
    /// The club, after the booking if it was accepted
    ///
    /// This is `None` only if the club does not exist.
    pub club: Option<Club>,
    /// The competition, after the booking if it was accepted
    pub competition: Option<Competition>,
    /// All competitions, for rendering the next page
    pub competitions: Vec<CompetitionListing>,
}

impl<R, C> Service<PurchasePlacesRequest> for DomainLogic<R, C>
where
    R: RepositoryPort + 'static,
    C: ClockPort + 'static,
{
    type Response = PurchasePlacesResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: PurchasePlacesRequest) -> Self::Future {
        let repository = self.repository.clone();
        let clock = self.clock.clone();
        Box::pin(async move {
            let now = clock.now();

            // Resolve both sides of the booking
            let club = repository.find_club_by_name(&req.club_name).await?;
            let competition = repository
                .find_competition_by_name(&req.competition_name)
                .await?;
            let (club, competition) = match (club, competition) {
                (Some(club), Some(competition)) => (club, competition),
                (club, competition) => {
                    tracing::warn!(
                        club = %req.club_name,
                        competition = %req.competition_name,
                        "booking for unknown club or competition"
                    );
                    return Ok(PurchasePlacesResponse {
                        outcome: BookingOutcome::Rejected {
                            reason: RejectionReason::NotFound,
                        },
                        club,
                        competition,
                        competitions: listing(repository.as_ref(), now).await?,
                    });
                }
            };

            let verdict = validate(&club, &competition, req.places.as_deref(), now);
            let (outcome, club, competition) = match verdict {
                Verdict::Accepted(places) => {
                    match repository
                        .apply_booking(&club.name, &competition.name, places)
                        .await
                    {
                        Ok((club, competition)) => {
                            tracing::info!(
                                club = %club.name,
                                competition = %competition.name,
                                places,
                                points_left = club.points,
                                places_left = competition.number_of_places,
                                "booking accepted"
                            );
                            (BookingOutcome::Accepted { places }, club, competition)
                        }
                        // Another booking went through since validation
                        Err(err) => {
                            let reason = match err {
                                repository::Error::InsufficientPlaces { .. } => {
                                    RejectionReason::InsufficientPlaces
                                }
                                repository::Error::InsufficientPoints { .. } => {
                                    RejectionReason::InsufficientPoints
                                }
                                repository::Error::ClubNotFound(_)
                                | repository::Error::CompetitionNotFound(_) => {
                                    RejectionReason::NotFound
                                }
                                err => return Err(err.into()),
                            };
                            tracing::info!(
                                club = %club.name,
                                competition = %competition.name,
                                %reason,
                                "booking rejected at commit"
                            );
                            (BookingOutcome::Rejected { reason }, club, competition)
                        }
                    }
                }
                Verdict::Rejected(reason) => {
                    tracing::info!(
                        club = %club.name,
                        competition = %competition.name,
                        %reason,
                        "booking rejected"
                    );
                    (BookingOutcome::Rejected { reason }, club, competition)
                }
            };

            Ok(PurchasePlacesResponse {
                outcome,
                club: Some(club),
                competition: Some(competition),
                competitions: listing(repository.as_ref(), now).await?,
            })
        })
    }
}
