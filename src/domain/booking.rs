use std::num::IntErrorKind;

use chrono::{DateTime, Utc};

use super::{Club, Competition, RejectionReason, MAX_PLACES_PER_BOOKING};

/// Decision on a booking request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The booking can go ahead for this number of places
    Accepted(u32),
    Rejected(RejectionReason),
}

/// Decide whether `club` can book `requested_places` in `competition` at `now`
///
/// Checks run in a fixed order and the first failure wins:
///
/// 1. the competition must not have started yet,
/// 2. the requested places must be an integer,
/// 3. at least one place must be requested,
/// 4. no more than [`MAX_PLACES_PER_BOOKING`] places can be requested,
/// 5. the competition must have enough places left,
/// 6. the club must have enough points.
///
/// Resolving the club and competition is up to the caller.
pub fn validate(
    club: &Club,
    competition: &Competition,
    requested_places: Option<&str>,
    now: DateTime<Utc>,
) -> Verdict {
    if competition.is_past(now) {
        return Verdict::Rejected(RejectionReason::PastCompetition);
    }

    let places = match parse_places(requested_places.unwrap_or_default()) {
        Ok(places) => places,
        Err(reason) => return Verdict::Rejected(reason),
    };

    if places < 1 {
        return Verdict::Rejected(RejectionReason::MustBookAtLeastOne);
    }
    if places > i64::from(MAX_PLACES_PER_BOOKING) {
        return Verdict::Rejected(RejectionReason::ExceedsMaxPerBooking);
    }
    // Between 1 and MAX_PLACES_PER_BOOKING from here on
    let places = places as u32;

    if places > competition.number_of_places {
        return Verdict::Rejected(RejectionReason::InsufficientPlaces);
    }
    if places > club.points {
        return Verdict::Rejected(RejectionReason::InsufficientPoints);
    }

    Verdict::Accepted(places)
}

/// Parse the raw number of places
///
/// Integers that don't fit in an `i64` are still integers: they are clamped so that the range
/// checks report them instead of the parser.
fn parse_places(raw: &str) -> Result<i64, RejectionReason> {
    match raw.trim().parse::<i64>() {
        Ok(places) => Ok(places),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(RejectionReason::InvalidPlaceCount),
        },
    }
}
