use std::path::PathBuf;

use crate::adapters::storage::json::JsonFileStorage;

/// Default log filter, overridden by `RUST_LOG`
pub const DEFAULT_LOG_FILTER: &str = "club_booking=info";

/// Where the club and competition collections live
#[derive(clap::Args, Clone, Debug)]
pub struct Config {
    /// JSON file holding the clubs
    #[arg(long, env = "CLUB_BOOKING_CLUBS", default_value = "clubs.json")]
    pub clubs: PathBuf,

    /// JSON file holding the competitions
    #[arg(
        long,
        env = "CLUB_BOOKING_COMPETITIONS",
        default_value = "competitions.json"
    )]
    pub competitions: PathBuf,
}

impl Config {
    pub fn storage(&self) -> JsonFileStorage {
        JsonFileStorage::new(self.clubs.clone(), self.competitions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use speculoos::prelude::*;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        config: Config,
    }

    #[test]
    fn test_paths() {
        let cli = Cli::parse_from([
            "club-booking",
            "--clubs",
            "/data/clubs.json",
            "--competitions",
            "/data/competitions.json",
        ]);

        assert_that!(cli.config.clubs).is_equal_to(PathBuf::from("/data/clubs.json"));
        assert_that!(cli.config.competitions)
            .is_equal_to(PathBuf::from("/data/competitions.json"));
    }
}
