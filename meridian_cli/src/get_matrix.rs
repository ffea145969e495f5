use std::{fs::File, io::BufReader, path::PathBuf, time::Duration};

use clap::Args;
use comfy_table::Table;
use indicatif::ProgressBar;
use jiff::Timestamp;
use meridian_matrix::{
    distance_matrix::MatrixResult,
    matrix_client::{DistanceMatrixClient, DistanceMatrixClientParams},
    matrix_request::{DistanceUnit, MatrixRequest, TimeUnit, TravelMode},
    travel_matrix_client::TravelMatrixClient,
    travel_matrix_provider::TravelMatrixProvider,
    waypoint::Waypoint,
};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::parsers;

#[derive(Args)]
pub struct GetMatrixArgs {
    /// JSON file with `origins` and optional `destinations` waypoints
    #[arg(short, long)]
    input: PathBuf,

    #[arg(long, value_parser = parsers::parse_travel_mode, default_value = "driving")]
    travel_mode: TravelMode,

    #[arg(long, value_parser = parsers::parse_distance_unit, default_value = "kilometers")]
    distance_unit: DistanceUnit,

    #[arg(long, value_parser = parsers::parse_time_unit, default_value = "seconds")]
    time_unit: TimeUnit,

    /// Departure time, turns the request into an asynchronous job
    #[arg(long, value_parser = parsers::parse_timestamp)]
    start_time: Option<Timestamp>,

    /// End of the histogram window (requires --start-time)
    #[arg(long, value_parser = parsers::parse_timestamp)]
    end_time: Option<Timestamp>,

    /// Number of intervals between start and end time
    #[arg(long, default_value_t = 1)]
    resolution: u8,

    /// Compute great-circle distances locally instead of calling the service
    #[arg(long)]
    as_the_crow_flies: bool,

    /// Write the matrix as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Deserialize)]
struct WaypointsFile {
    origins: Vec<Waypoint>,

    #[serde(default)]
    destinations: Option<Vec<Waypoint>>,
}

fn build_request(args: &GetMatrixArgs, waypoints: WaypointsFile) -> MatrixRequest {
    let mut request = MatrixRequest::new(waypoints.origins)
        .with_travel_mode(args.travel_mode)
        .with_units(args.distance_unit, args.time_unit)
        .with_resolution(args.resolution);
    request.destinations = waypoints.destinations;
    request.start_time = args.start_time;
    request.end_time = args.end_time;
    request
}

fn format_value(value: Option<f64>) -> String {
    value
        .map(|value| format!("{:.2}", value))
        .unwrap_or_else(|| String::from("-"))
}

fn print_matrix(result: &MatrixResult, distance_unit: DistanceUnit, time_unit: TimeUnit) {
    let mut table = Table::new();
    table.set_header(vec![
        String::from("Origin"),
        String::from("Destination"),
        format!("Distance ({})", distance_unit),
        format!("Duration ({})", time_unit),
    ]);

    for cell in &result.cells {
        let origin = result
            .origins
            .get(cell.origin_index)
            .map(ToString::to_string)
            .unwrap_or_default();
        let destination = result
            .destinations
            .get(cell.destination_index)
            .map(ToString::to_string)
            .unwrap_or_default();

        table.add_row(vec![
            origin,
            destination,
            format_value(cell.travel_distance),
            format_value(cell.travel_duration),
        ]);
    }

    println!("{table}");
}

pub async fn run(args: GetMatrixArgs) -> anyhow::Result<()> {
    let file = File::open(&args.input)?;
    let waypoints: WaypointsFile = serde_json::from_reader(BufReader::new(file))?;
    let request = build_request(&args, waypoints);

    let provider = if args.as_the_crow_flies {
        TravelMatrixProvider::AsTheCrowFlies
    } else {
        TravelMatrixProvider::Remote
    };

    info!(
        "Computing {}x{} matrix with {:?}",
        request.origins.len(),
        request.effective_destinations().len(),
        provider
    );

    let params = match DistanceMatrixClientParams::from_env() {
        Ok(params) => params,
        Err(error) if args.as_the_crow_flies => {
            debug!("No service configuration, computing locally: {}", error);
            DistanceMatrixClientParams::new("")
        }
        Err(error) => return Err(error.into()),
    };
    let client = TravelMatrixClient::new(DistanceMatrixClient::new(params)?);

    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message("Computing matrix");
    let progress = |hint: Duration| {
        spinner.set_message(format!("Job running, next status check in {}s", hint.as_secs()))
    };

    let cancellation = CancellationToken::new();
    let ctrl_c = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let result = client
        .fetch_matrix(&request, provider, Some(&progress), &cancellation)
        .await;
    spinner.finish_and_clear();
    let result = result?;

    if let Some(error_message) = &result.error_message {
        warn!("Matrix computed with an error: {}", error_message);
    }

    print_matrix(&result, request.distance_unit, request.time_unit);

    if let Some(output) = args.output {
        let file = File::create(&output)?;
        serde_json::to_writer_pretty(file, &result)?;
        info!("Matrix written to {:?}", output);
    }

    Ok(())
}
