use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use club_booking::{
    adapters::{clock::SystemClock, repository::memory::MemoryRepository},
    commands::{
        open_booking::{OpenBookingRequest, OpenBookingResponse},
        purchase_places::{BookingOutcome, PurchasePlacesRequest},
        scoreboard::ScoreboardRequest,
        show_summary::{ShowSummaryRequest, ShowSummaryResponse},
        DomainLogic,
    },
    config::{Config, DEFAULT_LOG_FILTER},
    domain::{Club, CompetitionListing, RejectionReason},
};
use tower::ServiceExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Book places in club competitions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with a club email and list competitions
    Summary { email: String },
    /// Open the booking form for a competition
    Book { competition: String, club: String },
    /// Spend points on places in a competition
    Purchase {
        competition: String,
        club: String,
        places: Option<String>,
    },
    /// Show the points of every club
    Scoreboard,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let repository = MemoryRepository::load(cli.config.storage()).with_context(|| {
        format!(
            "loading {} and {}",
            cli.config.clubs.display(),
            cli.config.competitions.display()
        )
    })?;
    let domain = DomainLogic::new(Arc::new(repository), Arc::new(SystemClock));

    let accepted = match cli.command {
        Command::Summary { email } => {
            match domain.oneshot(ShowSummaryRequest { email }).await? {
                ShowSummaryResponse::Welcome { club, competitions } => {
                    print_summary(&club, &competitions);
                    true
                }
                ShowSummaryResponse::UnknownIdentity => {
                    println!("{}", RejectionReason::UnknownIdentity);
                    false
                }
            }
        }
        Command::Book { competition, club } => {
            let res = domain
                .oneshot(OpenBookingRequest {
                    club_name: club,
                    competition_name: competition,
                })
                .await?;
            if let Some(reason) = res.rejection() {
                println!("{reason}");
            }
            match res {
                OpenBookingResponse::Ready { club, competition } => {
                    println!("{}", competition.name);
                    println!("Places available: {}", competition.number_of_places);
                    println!("Points available for {}: {}", club.name, club.points);
                    true
                }
                OpenBookingResponse::PastCompetition { club, competitions } => {
                    print_summary(&club, &competitions);
                    false
                }
                OpenBookingResponse::NotFound => false,
            }
        }
        Command::Purchase {
            competition,
            club,
            places,
        } => {
            let res = domain
                .oneshot(PurchasePlacesRequest {
                    club_name: club,
                    competition_name: competition,
                    places,
                })
                .await?;
            match res.outcome {
                BookingOutcome::Accepted { places } => {
                    println!("Great - booking complete! You booked {places} place(s).");
                }
                BookingOutcome::Rejected { reason } => println!("{reason}"),
            }
            if let Some(club) = &res.club {
                print_summary(club, &res.competitions);
            }
            matches!(res.outcome, BookingOutcome::Accepted { .. })
        }
        Command::Scoreboard => {
            let res = domain.oneshot(ScoreboardRequest).await?;
            print_scoreboard(&res.clubs);
            true
        }
    };

    Ok(if accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_summary(club: &Club, competitions: &[CompetitionListing]) {
    println!("Welcome, {}", club.email);
    println!("Points available: {}", club.points);
    println!();
    println!("Competitions:");
    for entry in competitions {
        let competition = &entry.competition;
        let status = if entry.is_past {
            "closed".to_string()
        } else {
            format!("{} places", competition.number_of_places)
        };
        println!(
            "  {} | {} | {}",
            competition.name,
            competition.date.format("%Y-%m-%d %H:%M:%S"),
            status
        );
    }
}

fn print_scoreboard(clubs: &[Club]) {
    println!("Club Points");
    let width = clubs.iter().map(|club| club.name.len()).max().unwrap_or(0);
    for club in clubs {
        println!("  {:<width$}  {:>4}", club.name, club.points);
    }
}
