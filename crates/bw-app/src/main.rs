//! bw-app: Bookwise Main Binary
//!
//! Entry point for the bookwise booking client.
//!
//! Usage:
//!   bw-app serve     - Start the administrative dashboard server
//!   bw-app book      - Walk through the interactive booking wizard
//!   bw-app slots     - Print the grouped slot-rule view
//!   bw-app --help    - Show help

mod cli;

use async_trait::async_trait;
use bw_api::BookingApiClient;
use bw_core::models::{Booking, TimeSlotRule};
use bw_core::Config;
use bw_dashboard::{BookingProvider, DashboardError, DashboardServer, SlotProvider};
use bw_slots::{filter_groups, group_slots, ScopeFilter};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// Dashboard server mode
    Serve,
    /// Interactive booking wizard
    Book,
    /// Print the grouped administrative slot view
    Slots,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = parse_args();

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("bw-app {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting bw-app...");
    tracing::info!("Booking API: {}", config.api.base_url);

    let client = Arc::new(
        BookingApiClient::new(&config.api)
            .map_err(|e| anyhow::anyhow!("Failed to create API client: {}", e))?,
    );

    match mode {
        RunMode::Book => cli::run_wizard(client).await,
        RunMode::Slots => print_slot_groups(&client).await,
        RunMode::Serve => run_dashboard(config, client).await,
        _ => Ok(()),
    }
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().collect();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "serve" => return RunMode::Serve,
            "book" => return RunMode::Book,
            "slots" => return RunMode::Slots,
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Serve
}

/// Print help message
fn print_help() {
    println!("bw-app - Bookwise booking client");
    println!();
    println!("Usage:");
    println!("  bw-app serve     Start the administrative dashboard server");
    println!("  bw-app book      Walk through the interactive booking wizard");
    println!("  bw-app slots     Print the grouped slot-rule view");
    println!("  bw-app --help    Show this help message");
    println!("  bw-app --version Show version");
    println!();
    println!("Environment Variables:");
    println!("  BOOKWISE_API_URL         Booking API base URL (default: http://localhost:8080)");
    println!("  BOOKWISE_API_TOKEN       Bearer token for administrative calls");
    println!("  BOOKWISE_API_TIMEOUT     Request timeout in seconds (default: 30)");
    println!("  BOOKWISE_DASHBOARD_HOST  Dashboard host (default: 127.0.0.1)");
    println!("  BOOKWISE_DASHBOARD_PORT  Dashboard port (default: 3000)");
    println!("  BOOKWISE_CONFIG          Config file path (default: bookwise.toml)");
}

/// Slot snapshots for the dashboard, fetched from the live API per request
struct ApiSlotProvider {
    client: Arc<BookingApiClient>,
}

#[async_trait]
impl SlotProvider for ApiSlotProvider {
    async fn slot_rules(&self) -> bw_dashboard::Result<Vec<TimeSlotRule>> {
        self.client
            .list_slot_rules()
            .await
            .map_err(|e| DashboardError::DataError(e.to_string()))
    }
}

/// Booking list for the dashboard, fetched from the live API per request
struct ApiBookingProvider {
    client: Arc<BookingApiClient>,
}

#[async_trait]
impl BookingProvider for ApiBookingProvider {
    async fn bookings(&self) -> bw_dashboard::Result<Vec<Booking>> {
        self.client
            .list_bookings()
            .await
            .map_err(|e| DashboardError::DataError(e.to_string()))
    }
}

/// Run the dashboard server wired to the live API
async fn run_dashboard(config: Config, client: Arc<BookingApiClient>) -> anyhow::Result<()> {
    let server = DashboardServer::new(
        config.dashboard,
        Arc::new(ApiSlotProvider {
            client: Arc::clone(&client),
        }),
        Arc::new(ApiBookingProvider { client }),
    );

    tracing::info!("Press Ctrl+C to exit");
    tokio::select! {
        result = server.run() => result.map_err(|e| anyhow::anyhow!("Dashboard error: {}", e)),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down...");
            Ok(())
        }
    }
}

/// Fetch the rule list and print the administrator's grouped view
async fn print_slot_groups(client: &BookingApiClient) -> anyhow::Result<()> {
    let rules = client.list_slot_rules().await?;
    let groups = group_slots(&rules)?;

    for filter in [ScopeFilter::Specific, ScopeFilter::Weekend, ScopeFilter::AllDays] {
        let view = filter_groups(&groups, filter);
        if view.is_empty() {
            continue;
        }
        println!("{:?}:", filter);
        for group in view {
            let date = group
                .specific_date
                .map(|d| format!(" on {}", d))
                .unwrap_or_default();
            println!(
                "  {}{} capacity {} {} - {} rule(s)",
                group.intervals().join(", "),
                date,
                group.max_bookings,
                if group.is_active { "active" } else { "inactive" },
                group.rules.len()
            );
        }
    }

    Ok(())
}
