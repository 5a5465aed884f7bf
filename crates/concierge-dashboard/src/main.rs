//! Concierge admin console
//!
//! Terminal front end for the dashboard screens: bonded matches, pending dates
//! and the place catalog, backed by the remote admin API.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use concierge_client::HttpAdminApi;
use concierge_core::{Attachment, Config, RecordId, SelectedLocation};
use concierge_dashboard::screens::PreviewJob;
use concierge_dashboard::screens::wizard::Wizard;
use concierge_dashboard::{
    ActionOutcome, BondedScreen, CategoryChoice, DateDetailScreen, DatesScreen, PlacesScreen,
    Render, ScreenContext, StepOneInput, StepTwo,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Command line interface for the concierge admin console
#[derive(Parser)]
#[command(
    name = "concierge-admin",
    version = env!("CARGO_PKG_VERSION"),
    about = "Admin console for bonded matches, dates and places",
    long_about = "Terminal admin console for the concierge platform: notify bonded matches, browse pending dates and manage the place catalog."
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error), overrides config and `RUST_LOG`
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Print view models as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Bonded matches
    Bonded {
        /// Bonded subcommand
        #[command(subcommand)]
        action: BondedCommands,
    },

    /// Pending dates
    Dates {
        /// Dates subcommand
        #[command(subcommand)]
        action: DatesCommands,
    },

    /// Place catalog
    Places {
        /// Places subcommand
        #[command(subcommand)]
        action: PlacesCommands,
    },

    /// Show the resolved configuration
    Config,
}

/// Bonded match commands
#[derive(Subcommand)]
enum BondedCommands {
    /// List bonded matches
    List,

    /// Notify both users of a match
    Notify {
        /// Match ID
        #[arg(value_name = "MATCH_ID")]
        id: String,
    },
}

/// Pending date commands
#[derive(Subcommand)]
enum DatesCommands {
    /// List pending dates
    List,

    /// Show one date
    Show {
        /// Booking ID
        #[arg(value_name = "BOOKING_ID")]
        id: String,
    },
}

/// Place catalog commands
#[derive(Subcommand)]
enum PlacesCommands {
    /// List places
    List,

    /// List categories
    Categories,

    /// Create a place
    Create(PlaceArgs),

    /// Edit a place; omitted values keep the place's current ones
    Edit {
        /// Place ID
        #[arg(value_name = "PLACE_ID")]
        id: String,

        /// Place values
        #[command(flatten)]
        place: PlaceArgs,
    },

    /// Delete a place
    Delete {
        /// Place ID
        #[arg(value_name = "PLACE_ID")]
        id: String,
    },

    /// Create a category
    NewCategory {
        /// Category name
        #[arg(value_name = "NAME")]
        name: String,
    },
}

/// Place form values
#[derive(Args)]
struct PlaceArgs {
    /// Category ID
    #[arg(long)]
    category_id: Option<String>,

    /// Venue name
    #[arg(long)]
    name: Option<String>,

    /// Description
    #[arg(long)]
    about: Option<String>,

    /// Star rating (1-5)
    #[arg(long)]
    rating: Option<u8>,

    /// City of the picked location
    #[arg(long)]
    city: Option<String>,

    /// State of the picked location
    #[arg(long)]
    state: Option<String>,

    /// Country of the picked location
    #[arg(long)]
    country: Option<String>,

    /// Latitude of the picked location
    #[arg(long, allow_hyphen_values = true)]
    latitude: Option<String>,

    /// Longitude of the picked location
    #[arg(long, allow_hyphen_values = true)]
    longitude: Option<String>,

    /// Weekday opening hour
    #[arg(long)]
    opening_hour: Option<String>,

    /// Weekday closing hour
    #[arg(long)]
    closing_hour: Option<String>,

    /// Weekend opening hour
    #[arg(long)]
    weekend_opening_hour: Option<String>,

    /// Weekend closing hour
    #[arg(long)]
    weekend_closing_hour: Option<String>,

    /// Banner image, repeat for slots 1 to 4 (first is the primary banner)
    #[arg(long = "banner", value_name = "FILE")]
    banners: Vec<PathBuf>,

    /// Menu document
    #[arg(long, value_name = "FILE")]
    menu: Option<PathBuf>,
}

impl PlaceArgs {
    fn selected_location(&self) -> Option<SelectedLocation> {
        self.city.as_ref().map(|city| SelectedLocation {
            city: city.clone(),
            state: self.state.clone().unwrap_or_default(),
            country: self.country.clone().unwrap_or_default(),
            latitude: self.latitude.clone().unwrap_or_default(),
            longitude: self.longitude.clone().unwrap_or_default(),
        })
    }

    fn step_two(&self, defaults: StepTwo) -> StepTwo {
        StepTwo {
            opening_hour: self.opening_hour.clone().unwrap_or(defaults.opening_hour),
            closing_hour: self.closing_hour.clone().unwrap_or(defaults.closing_hour),
            weekend_opening_hour: self
                .weekend_opening_hour
                .clone()
                .unwrap_or(defaults.weekend_opening_hour),
            weekend_closing_hour: self
                .weekend_closing_hour
                .clone()
                .unwrap_or(defaults.weekend_closing_hour),
        }
    }
}

/// Main entry point for the admin console
///
/// # Errors
///
/// Returns error if configuration, logging or the requested action fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (for development convenience)
    if let Err(e) = dotenvy::dotenv() {
        // It's okay if .env doesn't exist
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();

    let mut config =
        Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(format) = &cli.log_format {
        config
            .override_log_format(format)
            .context("invalid --log-format")?;
    }
    concierge_core::init_logging(&config.logging, cli.log_level.as_deref())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "concierge admin console starting"
    );

    let json = cli.json;
    match cli.command {
        Commands::Config => show_config(&config),
        Commands::Bonded { action } => handle_bonded(screen_context(&config)?, action, json).await,
        Commands::Dates { action } => handle_dates(screen_context(&config)?, action, json).await,
        Commands::Places { action } => handle_places(screen_context(&config)?, action, json).await,
    }
}

/// Build the screen context backed by the HTTP admin API
fn screen_context(config: &Config) -> anyhow::Result<ScreenContext> {
    let api = HttpAdminApi::new(&config.api).context("failed to create admin API client")?;
    Ok(ScreenContext::new(Arc::new(api), config.dashboard.clone()))
}

/// Print a view as text or JSON
fn emit<V: Render + Serialize>(view: &V, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        println!("{}", view.render());
    }
    Ok(())
}

/// Turn a failed action into a non-zero exit after its view was printed
fn ensure_success(outcome: ActionOutcome, action: &str) -> anyhow::Result<()> {
    if outcome.is_success() {
        Ok(())
    } else {
        bail!("{action} failed")
    }
}

/// Print the resolved configuration; the token is never printed
fn show_config(config: &Config) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(config).context("failed to render configuration")?;
    println!("{rendered}");
    Ok(())
}

/// Handle bonded match commands
///
/// # Errors
///
/// Returns error if the list cannot be loaded or the notify action fails
async fn handle_bonded(
    ctx: ScreenContext,
    action: BondedCommands,
    json: bool,
) -> anyhow::Result<()> {
    let mut screen = BondedScreen::new(ctx);
    screen.mount().await;

    if let Some(error) = screen.phase().blocking_error() {
        emit(&screen.view(), json)?;
        bail!("{}", error.message);
    }

    match action {
        BondedCommands::List => emit(&screen.view(), json),
        BondedCommands::Notify { id } => {
            let outcome = screen.notify(&RecordId::from(id)).await?;
            emit(&screen.view(), json)?;
            ensure_success(outcome, "notify")
        }
    }
}

/// Handle pending date commands
///
/// # Errors
///
/// Returns error if the list or the detail cannot be loaded
async fn handle_dates(ctx: ScreenContext, action: DatesCommands, json: bool) -> anyhow::Result<()> {
    let blocking = match action {
        DatesCommands::List => {
            let mut screen = DatesScreen::new(ctx);
            screen.mount().await;
            emit(&screen.view(), json)?;
            screen.phase().blocking_error().cloned()
        }
        DatesCommands::Show { id } => {
            let mut screen = DateDetailScreen::new(ctx, RecordId::from(id));
            screen.mount().await;
            emit(&screen.view(), json)?;
            screen.phase().blocking_error().cloned()
        }
    };

    match blocking {
        Some(error) => bail!("{}", error.message),
        None => Ok(()),
    }
}

/// Handle place catalog commands
///
/// # Errors
///
/// Returns error if places cannot be loaded, the form is incomplete or a write
/// fails
async fn handle_places(
    ctx: ScreenContext,
    action: PlacesCommands,
    json: bool,
) -> anyhow::Result<()> {
    let mut screen = PlacesScreen::new(ctx);
    screen.mount().await;

    if let Some(error) = screen.phase().blocking_error() {
        emit(&screen.view(), json)?;
        bail!("{}", error.message);
    }

    match action {
        PlacesCommands::List => emit(&screen.view(), json),
        PlacesCommands::Categories => {
            if json {
                println!("{}", serde_json::to_string_pretty(screen.categories())?);
            } else {
                for category in screen.categories() {
                    println!("{:<12} {}", category.id, category.name);
                }
            }
            Ok(())
        }
        PlacesCommands::Create(place) => {
            screen.open_create();
            let step_two = fill_place_form(
                &mut screen,
                StepOneInput::default(),
                &place,
                StepTwo::default(),
            )
            .await?;
            let outcome = screen.submit_details(&step_two).await?;
            emit(&screen.view(), json)?;
            ensure_success(outcome, "create place")
        }
        PlacesCommands::Edit { id, place } => {
            screen.open_actions(&RecordId::from(id))?;
            let input = screen.choose_edit()?;
            let current_hours = screen
                .wizard()
                .and_then(Wizard::edit_target)
                .map(|existing| StepTwo {
                    opening_hour: existing.opening_hour.clone(),
                    closing_hour: existing.closing_hour.clone(),
                    weekend_opening_hour: existing.weekend_opening_hour.clone(),
                    weekend_closing_hour: existing.weekend_closing_hour.clone(),
                })
                .unwrap_or_default();
            let step_two = fill_place_form(&mut screen, input, &place, current_hours).await?;
            let outcome = screen.submit_details(&step_two).await?;
            emit(&screen.view(), json)?;
            ensure_success(outcome, "edit place")
        }
        PlacesCommands::Delete { id } => {
            screen.open_actions(&RecordId::from(id))?;
            let outcome = screen.confirm_delete().await?;
            emit(&screen.view(), json)?;
            ensure_success(outcome, "delete place")
        }
        PlacesCommands::NewCategory { name } => {
            screen.open_category_form();
            let outcome = screen.submit_category(&name).await?;
            emit(&screen.view(), json)?;
            ensure_success(outcome, "create category")
        }
    }
}

/// Walk the place form: step one, banners with previews, menu, step two values
///
/// # Errors
///
/// Returns error if a value is rejected or an attachment cannot be read
async fn fill_place_form(
    screen: &mut PlacesScreen,
    mut input: StepOneInput,
    place: &PlaceArgs,
    defaults: StepTwo,
) -> anyhow::Result<StepTwo> {
    if let Some(category_id) = &place.category_id {
        input.category_id =
            screen.choose_category(CategoryChoice::Existing(RecordId::from(category_id.as_str())))?;
    }
    if let Some(name) = &place.name {
        input.name.clone_from(name);
    }
    if let Some(about) = &place.about {
        input.about.clone_from(about);
    }
    if let Some(rating) = place.rating {
        screen.set_rating(rating)?;
    }
    if let Some(location) = place.selected_location() {
        screen.on_location_selected(location)?;
    }
    screen.submit_step_one(input)?;

    let mut jobs: Vec<PreviewJob> = Vec::with_capacity(place.banners.len());
    for (slot, path) in place.banners.iter().enumerate() {
        let attachment = Attachment::from_path(path).await?;
        jobs.push(screen.attach_banner(slot, attachment)?);
    }
    for ready in futures::future::join_all(jobs.into_iter().map(PreviewJob::run)).await {
        let ready = ready?;
        let slot = ready.slot;
        let applied = screen.complete_preview(ready);
        debug!(slot, applied, "banner preview finished");
    }

    if let Some(path) = &place.menu {
        screen.attach_menu(Attachment::from_path(path).await?)?;
    }

    Ok(place.step_two(defaults))
}
