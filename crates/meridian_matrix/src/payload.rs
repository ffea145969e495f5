use jiff::Timestamp;
use serde::Serialize;

use crate::{matrix_request::MatrixRequest, waypoint::Waypoint};

const COORDINATE_PRECISION: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WirePoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Body posted to the matrix endpoints. Field order is the wire order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRequestBody {
    pub origins: Vec<WirePoint>,

    /// Omitted when the origins double as destinations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destinations: Option<Vec<WirePoint>>,

    pub travel_mode: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<u8>,

    pub time_unit: String,
    pub distance_unit: String,
}

fn round_coordinate(value: f64) -> f64 {
    (value * COORDINATE_PRECISION).round() / COORDINATE_PRECISION
}

fn wire_points(waypoints: &[Waypoint]) -> Vec<WirePoint> {
    waypoints
        .iter()
        .filter_map(|waypoint| waypoint.coordinate.as_ref())
        .map(|coordinate| WirePoint {
            latitude: round_coordinate(coordinate.latitude),
            longitude: round_coordinate(coordinate.longitude),
        })
        .collect()
}

fn format_time(timestamp: Timestamp) -> String {
    timestamp.to_string()
}

impl MatrixRequestBody {
    /// Builds the body of an already validated request.
    pub fn from_request(request: &MatrixRequest) -> Self {
        let end_time = request.start_time.and(request.end_time);

        Self {
            origins: wire_points(&request.origins),
            destinations: request.explicit_destinations().map(wire_points),
            travel_mode: request.travel_mode.to_string(),
            start_time: request.start_time.map(format_time),
            end_time: end_time.map(format_time),
            resolution: end_time.map(|_| request.resolution),
            time_unit: request.time_unit.to_string(),
            distance_unit: request.distance_unit.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
