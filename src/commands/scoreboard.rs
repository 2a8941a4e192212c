use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{scoreboard, Club},
    ports::{clock::ClockPort, repository::RepositoryPort},
};
use tower::Service;

use super::{DomainLogic, Error};

/// Public points table, no login needed
pub struct ScoreboardRequest;

#[derive(Debug, PartialEq, Eq)]
pub struct ScoreboardResponse {
    /// Clubs with the most points first
    pub clubs: Vec<Club>,
}

impl<R, C> Service<ScoreboardRequest> for DomainLogic<R, C>
where
    R: RepositoryPort + 'static,
    C: ClockPort + 'static,
{
    type Response = ScoreboardResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: ScoreboardRequest) -> Self::Future {
        let repository = self.repository.clone();
        Box::pin(async move {
            let clubs = repository.clubs().await?;
            Ok(ScoreboardResponse {
                clubs: scoreboard(&clubs),
            })
        })
    }
}
