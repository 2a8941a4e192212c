use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{Club, CompetitionListing},
    ports::{clock::ClockPort, repository::RepositoryPort},
};
use tower::Service;

use super::{listing, DomainLogic, Error};

/// A club logging in with its email
pub struct ShowSummaryRequest {
    pub email: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ShowSummaryResponse {
    Welcome {
        club: Club,
        competitions: Vec<CompetitionListing>,
    },
    /// No club uses this email
    UnknownIdentity,
}

impl<R, C> Service<ShowSummaryRequest> for DomainLogic<R, C>
where
    R: RepositoryPort + 'static,
    C: ClockPort + 'static,
{
    type Response = ShowSummaryResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ShowSummaryRequest) -> Self::Future {
        let repository = self.repository.clone();
        let clock = self.clock.clone();
        Box::pin(async move {
            let email = req.email.trim();
            let Some(club) = repository.find_club_by_email(email).await? else {
                tracing::warn!(email, "unknown email");
                return Ok(ShowSummaryResponse::UnknownIdentity);
            };

            tracing::debug!(club = %club.name, "club logged in");
            Ok(ShowSummaryResponse::Welcome {
                club,
                competitions: listing(repository.as_ref(), clock.now()).await?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{clock, read_only_repository};
    use rstest::*;
    use speculoos::prelude::*;
    use std::sync::Arc;
    use tower::{BoxError, ServiceExt};

    #[rstest]
    #[case("john@simplylift.co")]
    #[case("  john@simplylift.co ")]
    #[tokio::test]
    async fn test_call_known_email(#[case] email: &str) -> Result<(), BoxError> {
        let domain = DomainLogic::new(Arc::new(read_only_repository()), Arc::new(clock()));

        let res = domain
            .oneshot(ShowSummaryRequest {
                email: email.to_string(),
            })
            .await?;

        assert_that!(res).matches(|res| match res {
            ShowSummaryResponse::Welcome { club, competitions } => {
                club.name == "Simply Lift"
                    && competitions.len() == 3
                    && competitions[0].is_past
                    && !competitions[1].is_past
            }
            ShowSummaryResponse::UnknownIdentity => false,
        });

        Ok(())
    }

    #[rstest]
    #[case("unknown@example.com")]
    #[case("JOHN@simplylift.co")]
    #[case("")]
    #[tokio::test]
    async fn test_call_unknown_email(#[case] email: &str) -> Result<(), BoxError> {
        let domain = DomainLogic::new(Arc::new(read_only_repository()), Arc::new(clock()));

        let res = domain
            .oneshot(ShowSummaryRequest {
                email: email.to_string(),
            })
            .await?;

        assert_that!(res).is_equal_to(ShowSummaryResponse::UnknownIdentity);

        Ok(())
    }
}
