//! Command-line host for the headless core.
//!
//! Boots [`AppCore`] against the filesystem store, the tokio clock and the
//! Gemini handler so workflows can be exercised by hand. Guarded by the
//! `host` feature.

use std::path::PathBuf;
use std::sync::Arc;

use aidoc_app::workflows::{self, diagnosis::DiagnosisRequest};
use aidoc_app::{AppCore, AppEffects, ProviderSummary, SharedApp};
use aidoc_core::{MediaPart, ProviderKind};
use aidoc_effects::logging::init_tracing;
use aidoc_effects::AidocConfig;
use aidoc_trip::TripPhase;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::RwLock;

#[derive(Debug, Parser)]
#[command(name = "aidoc-host", about = "Run AI Doctor workflows from the command line")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List registered providers
    Providers {
        /// HOSPITAL, PHARMACY or DOCTOR
        #[arg(long)]
        kind: Option<String>,
    },
    /// Simulate a trip to a provider and submit a review
    Trip {
        /// Provider id
        provider: String,
        /// Star rating for the review
        #[arg(long, default_value_t = 5)]
        rating: u8,
        /// Review comment
        #[arg(long)]
        comment: Option<String>,
        /// Skip the ride once the vehicle is on its way
        #[arg(long)]
        skip: bool,
        /// Patient email to sign in with before reviewing
        #[arg(long, requires = "password")]
        email: Option<String>,
        /// Patient password
        #[arg(long)]
        password: Option<String>,
    },
    /// Run a diagnosis
    Diagnose {
        /// Symptom description
        #[arg(long, default_value = "")]
        symptoms: String,
        /// Image or video of the complaint
        #[arg(long)]
        media: Option<PathBuf>,
        /// MIME type of the media file
        #[arg(long, default_value = "image/jpeg")]
        mime: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AidocConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.log_level);

    let effects = AppEffects::production(&config);
    let app: SharedApp = Arc::new(RwLock::new(AppCore::bootstrap(config, effects).await?));

    match cli.command {
        Command::Providers { kind } => list_providers(&app, kind.as_deref()).await,
        Command::Trip {
            provider,
            rating,
            comment,
            skip,
            email,
            password,
        } => {
            if let (Some(email), Some(password)) = (email, password) {
                workflows::auth::login_user(&app, &email, &password).await?;
            }
            run_trip(&app, &provider, rating, comment, skip).await
        }
        Command::Diagnose {
            symptoms,
            media,
            mime,
        } => {
            let mut request = DiagnosisRequest::symptoms(symptoms);
            if let Some(path) = media {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                request = request.with_media(MediaPart::new(mime, bytes));
            }
            let record = workflows::diagnosis::diagnose(&app, request).await?;
            println!("{}", record.ai_analysis);
            Ok(())
        }
    }
}

async fn list_providers(app: &SharedApp, kind: Option<&str>) -> Result<()> {
    let kind = kind
        .map(|k| {
            ProviderKind::parse(&k.to_ascii_uppercase()).ok_or_else(|| anyhow!("unknown kind {k}"))
        })
        .transpose()?;
    let data = app.read().await.data().clone();
    for provider in data.get_providers(kind).await? {
        let card = ProviderSummary::of(&provider);
        println!(
            "{:<16} {:<9} {:<32} {} ({} reviews)",
            card.id,
            card.kind.as_str(),
            card.name,
            card.rating_label,
            card.review_count
        );
    }
    Ok(())
}

async fn run_trip(
    app: &SharedApp,
    provider_id: &str,
    rating: u8,
    comment: Option<String>,
    skip: bool,
) -> Result<()> {
    let trip = workflows::trip::start_trip_to(app, provider_id).await?;
    let mut frames = trip.subscribe();

    let mut last_logged = None;
    loop {
        let frame = frames.borrow_and_update().clone();
        if last_logged != Some((frame.phase, frame.eta_minutes)) {
            tracing::info!(
                phase = %frame.phase,
                eta_minutes = frame.eta_minutes,
                lat = frame.position.lat,
                lng = frame.position.lng,
                "trip frame"
            );
            last_logged = Some((frame.phase, frame.eta_minutes));
        }
        match frame.phase {
            TripPhase::OnTheWay if skip => {
                trip.skip()?;
                break;
            }
            TripPhase::Arrived => {
                trip.complete_and_rate()?;
                break;
            }
            TripPhase::Review => break,
            TripPhase::Searching | TripPhase::OnTheWay => {}
        }
        frames.changed().await?;
    }

    trip.set_rating(rating)?;
    if let Some(comment) = comment {
        trip.set_comment(comment)?;
    }
    let outcome = workflows::trip::submit_review(app).await?;
    println!("{}", outcome.notice());
    Ok(())
}
