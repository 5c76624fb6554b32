use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::time::Duration;
use tripit_client::api::{DEFAULT_PAGE_SIZE, ListTripsParams, ObjectType, Traveler};
use tripit_client::{ClientConfig, Credentials, TripItClient};

/// tripit - TripIt API client
///
/// Reads OAuth credentials from TRIPIT_CONSUMER_KEY, TRIPIT_CONSUMER_SECRET,
/// TRIPIT_ACCESS_TOKEN and TRIPIT_ACCESS_TOKEN_SECRET and prints the JSON
/// response of the requested call.
///
/// Examples:
///   tripit trips --past          # List completed trips
///   tripit object air 12345      # Show one flight
#[derive(Parser, Debug)]
#[command(author, version = env!("TRIPIT_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API root (defaults to https://api.tripit.com/v1)
    #[arg(long = "base-url", env = "TRIPIT_BASE_URL", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Total attempts per request
    #[arg(long = "max-retries", env = "TRIPIT_MAX_RETRIES", value_name = "N", global = true)]
    pub max_retries: Option<usize>,

    /// Backoff base delay in milliseconds
    #[arg(long = "base-delay-ms", value_name = "MS", global = true)]
    pub base_delay_ms: Option<u64>,

    /// Minimum spacing between requests in milliseconds
    #[arg(long = "min-interval-ms", value_name = "MS", global = true)]
    pub min_interval_ms: Option<u64>,

    /// Network timeout per attempt in seconds
    #[arg(long = "timeout-secs", value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.as_str());
        }
        if let Some(max_retries) = self.max_retries {
            config = config.with_max_retries(max_retries);
        }
        if let Some(ms) = self.base_delay_ms {
            config = config.with_base_delay(Duration::from_millis(ms));
        }
        if let Some(ms) = self.min_interval_ms {
            config = config.with_min_request_interval(Duration::from_millis(ms));
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List trips
    Trips(TripsArgs),

    /// Show one trip
    Trip(TripArgs),

    /// Search trips by text
    Search(SearchArgs),

    /// List travel objects of one type
    Objects(ObjectsArgs),

    /// Show one travel object
    Object(ObjectArgs),

    /// Live flight status (TripIt Pro)
    FlightStatus(AirArgs),

    /// Rebooking link for a flight (TripIt Pro)
    AlternateFlights(AirArgs),

    /// List loyalty programs (TripIt Pro)
    PointsPrograms,

    /// Show the authenticated user's profile
    Profile,
}

#[derive(clap::Args, Debug)]
pub struct PageArgs {
    /// Page number
    #[arg(long = "page", default_value_t = 1)]
    pub page_num: u32,

    /// Results per page
    #[arg(long = "page-size", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,
}

#[derive(clap::Args, Debug)]
pub struct TripsArgs {
    /// Completed trips instead of upcoming ones
    #[arg(long)]
    pub past: bool,

    /// Only trips modified since this timestamp
    #[arg(long = "modified-since", value_name = "TIMESTAMP")]
    pub modified_since: Option<String>,

    /// Embed travel objects
    #[arg(long = "include-objects")]
    pub include_objects: bool,

    /// Traveler filter: true, false or all
    #[arg(long)]
    pub traveler: Option<Traveler>,

    #[command(flatten)]
    pub page: PageArgs,
}

impl TripsArgs {
    fn params(&self) -> ListTripsParams {
        ListTripsParams {
            past: self.past,
            modified_since: self.modified_since.clone(),
            include_objects: self.include_objects,
            traveler: self.traveler,
            page_num: self.page.page_num,
            page_size: self.page.page_size,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct TripArgs {
    /// Trip ID
    #[arg(value_name = "ID")]
    pub id: String,

    /// Leave out nested travel objects
    #[arg(long = "no-objects")]
    pub no_objects: bool,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Search text
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Include past trips
    #[arg(long)]
    pub past: bool,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(clap::Args, Debug)]
pub struct ObjectsArgs {
    /// Object type (air, lodging, car, ...)
    #[arg(value_name = "TYPE")]
    pub object_type: ObjectType,

    /// Only objects in this trip
    #[arg(long = "trip", value_name = "ID")]
    pub trip_id: Option<String>,

    /// Include objects from past trips
    #[arg(long)]
    pub past: bool,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(clap::Args, Debug)]
pub struct ObjectArgs {
    /// Object type (air, lodging, car, ...)
    #[arg(value_name = "TYPE")]
    pub object_type: ObjectType,

    /// Object ID
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct AirArgs {
    /// Air object ID
    #[arg(value_name = "AIR_ID")]
    pub air_id: String,
}

async fn run(client: &TripItClient, command: Commands) -> Result<Value> {
    let value = match command {
        Commands::Trips(args) => client.list_trips(&args.params()).await?,
        Commands::Trip(args) => client.get_trip(&args.id, !args.no_objects).await?,
        Commands::Search(args) => {
            client
                .search_trips(&args.query, args.past, args.page.page_num, args.page.page_size)
                .await?
        }
        Commands::Objects(args) => {
            client
                .list_objects(
                    args.object_type,
                    args.trip_id.as_deref(),
                    args.past,
                    args.page.page_num,
                    args.page.page_size,
                )
                .await?
        }
        Commands::Object(args) => client.get_object(args.object_type, &args.id).await?,
        Commands::FlightStatus(args) => client.get_flight_status(&args.air_id).await?,
        Commands::AlternateFlights(args) => client
            .get_alternate_flights(&args.air_id)
            .await?
            .map(Value::String)
            .unwrap_or(Value::Null),
        Commands::PointsPrograms => client.list_points_programs().await?,
        Commands::Profile => client.get_profile().await?,
    };
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let credentials = Credentials::from_env().context("Failed to load TripIt credentials")?;
    let client = TripItClient::new(credentials, cli.client_config())
        .context("Failed to create TripIt client")?;

    let result = run(&client, cli.command).await;
    client.shutdown().await;

    let value = result?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
