//! Run one trip mutation request against the Triposo provider.
//!
//! The request envelope (`type`, `elementId`, `invokedBy`, `details.trip`)
//! is read as JSON from a file or stdin. The outcome, or a stable error
//! envelope, is written to stdout; logs go to stderr as JSON.
//!
//! Stored trips live in memory for one run. `EDIT`, `UPDATE`, and `DELETE`
//! need `--trips <path>`: the JSON array of trips at that path seeds the
//! store, and the store is written back there after a successful mutation.
//! Without it those actions always report `not_found`.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use trip_backend::config::TripPlannerSettings;
use trip_backend::domain::ports::{FixtureTripScheduler, TripActionCommand, TripActionRequest};
use trip_backend::domain::{ErrorEnvelope, TripActionService, TripActionServicePorts};
use trip_backend::outbound::memory::InMemoryTripRepository;
use trip_backend::outbound::triposo::{TriposoCredentials, TriposoHttpSource};

/// `plan-trip` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "plan-trip",
    about = "Aggregate Triposo events for a trip mutation request",
    version
)]
struct CliArgs {
    /// Path to the request JSON. Reads stdin when omitted or `-`.
    #[arg(value_name = "path")]
    request: Option<PathBuf>,
    /// JSON array of stored trips, loaded before and rewritten after the run.
    #[arg(long = "trips", value_name = "path")]
    trips: Option<PathBuf>,
    /// Pretty-print the JSON written to stdout.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: CliArgs) -> Result<()> {
    let settings = TripPlannerSettings::load_from_iter([OsString::from("plan-trip")])
        .map_err(|error| eyre!("load trip planner settings: {error}"))?;
    let request = read_request(args.request.as_ref()).await?;
    let repository = Arc::new(load_trips(args.trips.as_ref()).await?);
    let service = build_service(&settings, Arc::clone(&repository))?;

    info!(action = %request.action_type, "running trip action");
    match service.invoke(request).await {
        Ok(outcome) => {
            if let Some(path) = args.trips.as_ref() {
                store_trips(&repository, path).await?;
            }
            let body = render(&outcome, args.pretty)?;
            write_stdout(&body).await
        }
        Err(error) => {
            let envelope = ErrorEnvelope::from(&error);
            write_stdout(&render(&envelope, args.pretty)?).await?;
            Err(eyre!(error).wrap_err("trip action failed"))
        }
    }
}

fn build_service(
    settings: &TripPlannerSettings,
    repository: Arc<InMemoryTripRepository>,
) -> Result<TripActionService> {
    let credentials = TriposoCredentials {
        account: settings
            .account
            .clone()
            .ok_or_else(|| eyre!("TRIP_PLANNER_ACCOUNT is not set"))?,
        token: settings
            .token
            .clone()
            .ok_or_else(|| eyre!("TRIP_PLANNER_TOKEN is not set"))?,
    };
    let endpoint = settings
        .base_url()
        .wrap_err("parse recommendation base url")?;
    let source = TriposoHttpSource::new(endpoint, credentials, settings.request_timeout())
        .wrap_err("build Triposo client")?;

    let ports = TripActionServicePorts::new(
        Arc::new(source),
        repository,
        Arc::new(FixtureTripScheduler),
    );
    Ok(TripActionService::new(ports, settings.service_config()))
}

async fn load_trips(path: Option<&PathBuf>) -> Result<InMemoryTripRepository> {
    let Some(path) = path else {
        return Ok(InMemoryTripRepository::new());
    };
    match tokio::fs::read(path).await {
        Ok(raw) => InMemoryTripRepository::from_json(&raw)
            .with_context(|| format!("parse trips file {}", path.display())),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "trips file absent; starting empty");
            Ok(InMemoryTripRepository::new())
        }
        Err(error) => Err(error).with_context(|| format!("read trips file {}", path.display())),
    }
}

async fn store_trips(repository: &InMemoryTripRepository, path: &Path) -> Result<()> {
    let body = repository.to_json().await.wrap_err("serialise trips")?;
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("write trips file {}", path.display()))
}

async fn read_request(path: Option<&PathBuf>) -> Result<TripActionRequest> {
    let raw = match path {
        Some(path) if path.as_os_str() != "-" => tokio::fs::read(path)
            .await
            .with_context(|| format!("read request file {}", path.display()))?,
        _ => {
            let mut buffer = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buffer)
                .await
                .wrap_err("read request from stdin")?;
            buffer
        }
    };
    serde_json::from_slice(&raw).wrap_err("parse trip action request")
}

fn render<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.wrap_err("serialise response")
}

async fn write_stdout(body: &str) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(body.as_bytes())
        .await
        .wrap_err("write response")?;
    stdout.write_all(b"\n").await.wrap_err("write response")?;
    stdout.flush().await.wrap_err("flush response")
}
