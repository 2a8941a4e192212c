use chrono::{DateTime, Utc};

pub mod booking;

/// Maximum number of places a club can book in a single request
///
/// This applies to every competition and is not configurable per competition.
pub const MAX_PLACES_PER_BOOKING: u32 = 12;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Club {
    /// Display name, also used to look up the club from booking requests
    pub name: String,
    /// Login key for the club
    pub email: String,
    /// Spendable balance. One point reserves one place.
    pub points: u32,
}

impl Club {
    pub fn new(name: impl Into<String>, email: impl Into<String>, points: u32) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            points,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Competition {
    pub name: String,
    /// Scheduled start of the competition
    pub date: DateTime<Utc>,
    /// Number of places still available
    pub number_of_places: u32,
}

impl Competition {
    pub fn new(name: impl Into<String>, date: DateTime<Utc>, number_of_places: u32) -> Self {
        Self {
            name: name.into(),
            date,
            number_of_places,
        }
    }

    /// Whether the competition has already started at `now`
    ///
    /// This must be computed for every request: the answer changes as time goes by.
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }
}

/// A competition annotated with its past/future status at a given instant
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompetitionListing {
    pub competition: Competition,
    pub is_past: bool,
}

/// Annotate every competition with `is_past`, keeping the collection order
pub fn competition_listing(
    competitions: &[Competition],
    now: DateTime<Utc>,
) -> Vec<CompetitionListing> {
    competitions
        .iter()
        .map(|competition| CompetitionListing {
            is_past: competition.is_past(now),
            competition: competition.clone(),
        })
        .collect()
}

/// Clubs ordered by points, highest first
///
/// Clubs with the same number of points keep their relative order.
pub fn scoreboard(clubs: &[Club]) -> Vec<Club> {
    let mut sorted = clubs.to_vec();
    // `sort_by` is stable
    sorted.sort_by(|a, b| b.points.cmp(&a.points));
    sorted
}

/// Reason for refusing a request
///
/// The display string is the message shown to the club.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    /// No club is registered with this email
    #[error("Unknown email address. Please try again.")]
    UnknownIdentity,
    /// The club or competition name does not resolve
    #[error("Invalid club or competition.")]
    NotFound,
    #[error("Cannot book places for past competitions")]
    PastCompetition,
    /// The requested number of places is not an integer
    #[error("Invalid number of places.")]
    InvalidPlaceCount,
    #[error("You must request at least 1 place.")]
    MustBookAtLeastOne,
    #[error("You cannot book more than 12 places for a single competition.")]
    ExceedsMaxPerBooking,
    #[error("Not enough places remaining in this competition.")]
    InsufficientPlaces,
    #[error("Your club does not have enough points to complete this booking.")]
    InsufficientPoints,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use speculoos::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_is_past() {
        let past = Competition::new("Spring Festival", now() - Duration::seconds(1), 25);
        let future = Competition::new("Fall Classic", now() + Duration::days(30), 13);
        let starting = Competition::new("Starting Now", now(), 5);

        assert_that!(past.is_past(now())).is_true();
        assert_that!(future.is_past(now())).is_false();
        // A competition starting exactly now is still open
        assert_that!(starting.is_past(now())).is_false();
    }

    #[test]
    fn test_competition_listing_keeps_order() {
        let competitions = vec![
            Competition::new("Fall Classic", now() + Duration::days(30), 13),
            Competition::new("Spring Festival", now() - Duration::days(30), 25),
            Competition::new("Winter Open", now() + Duration::days(1), 0),
        ];

        let listing = competition_listing(&competitions, now());

        let names: Vec<_> = listing
            .iter()
            .map(|entry| entry.competition.name.as_str())
            .collect();
        assert_that!(names).is_equal_to(vec!["Fall Classic", "Spring Festival", "Winter Open"]);
        let flags: Vec<_> = listing.iter().map(|entry| entry.is_past).collect();
        assert_that!(flags).is_equal_to(vec![false, true, false]);

        // Same input, same output
        assert_that!(competition_listing(&competitions, now())).is_equal_to(listing);
    }

    #[test]
    fn test_scoreboard_is_stable() {
        let clubs = vec![
            Club::new("Iron Temple", "admin@irontemple.com", 4),
            Club::new("Simply Lift", "john@simplylift.co", 13),
            Club::new("She Lifts", "kate@shelifts.co.uk", 12),
            Club::new("Lift Club", "contact@liftclub.com", 4),
        ];

        let sorted = scoreboard(&clubs);

        let names: Vec<_> = sorted.iter().map(|club| club.name.as_str()).collect();
        assert_that!(names).is_equal_to(vec![
            "Simply Lift",
            "She Lifts",
            "Iron Temple",
            "Lift Club",
        ]);
        // The input is left untouched
        assert_that!(clubs[0].name.as_str()).is_equal_to("Iron Temple");
    }

    #[test]
    fn test_rejection_messages() {
        assert_that!(RejectionReason::ExceedsMaxPerBooking.to_string()).is_equal_to(
            "You cannot book more than 12 places for a single competition.".to_string(),
        );
        assert_that!(RejectionReason::NotFound.to_string())
            .is_equal_to("Invalid club or competition.".to_string());
    }
}
