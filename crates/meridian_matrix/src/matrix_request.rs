use std::fmt::Display;

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::waypoint::Waypoint;

#[derive(Deserialize, Serialize, JsonSchema, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Transit,
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TravelMode::Driving => "driving",
                TravelMode::Walking => "walking",
                TravelMode::Transit => "transit",
            }
        )
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Miles,
}

impl DistanceUnit {
    pub const METERS_IN_KILOMETER: f64 = 1_000.0;
    pub const METERS_IN_MILE: f64 = 1_609.344;

    pub fn convert_meters(&self, meters: f64) -> f64 {
        match self {
            DistanceUnit::Kilometers => meters / Self::METERS_IN_KILOMETER,
            DistanceUnit::Miles => meters / Self::METERS_IN_MILE,
        }
    }
}

impl Display for DistanceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DistanceUnit::Kilometers => "kilometer",
                DistanceUnit::Miles => "mile",
            }
        )
    }
}

#[derive(Deserialize, Serialize, JsonSchema, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    #[default]
    Seconds,
    Minutes,
}

impl Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TimeUnit::Seconds => "seconds",
                TimeUnit::Minutes => "minutes",
            }
        )
    }
}

/// A distance matrix request.
///
/// When `destinations` is absent (or empty) the origins are used as
/// destinations, which yields a square matrix.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MatrixRequest {
    pub origins: Vec<Waypoint>,

    #[serde(default)]
    pub destinations: Option<Vec<Waypoint>>,

    #[serde(default)]
    pub travel_mode: TravelMode,

    /// Setting a start time turns the request into an asynchronous one.
    #[serde(default)]
    pub start_time: Option<Timestamp>,

    /// Only valid together with `start_time`, requests a histogram.
    #[serde(default)]
    pub end_time: Option<Timestamp>,

    /// Number of intervals between start and end time.
    #[serde(default = "default_resolution")]
    pub resolution: u8,

    #[serde(default)]
    pub distance_unit: DistanceUnit,

    #[serde(default)]
    pub time_unit: TimeUnit,
}

fn default_resolution() -> u8 {
    1
}

impl MatrixRequest {
    pub fn new(origins: Vec<Waypoint>) -> Self {
        Self {
            origins,
            destinations: None,
            travel_mode: TravelMode::default(),
            start_time: None,
            end_time: None,
            resolution: default_resolution(),
            distance_unit: DistanceUnit::default(),
            time_unit: TimeUnit::default(),
        }
    }

    pub fn with_destinations(mut self, destinations: Vec<Waypoint>) -> Self {
        self.destinations = Some(destinations);
        self
    }

    pub fn with_travel_mode(mut self, travel_mode: TravelMode) -> Self {
        self.travel_mode = travel_mode;
        self
    }

    pub fn with_time_window(mut self, start_time: Timestamp, end_time: Option<Timestamp>) -> Self {
        self.start_time = Some(start_time);
        self.end_time = end_time;
        self
    }

    pub fn with_resolution(mut self, resolution: u8) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_units(mut self, distance_unit: DistanceUnit, time_unit: TimeUnit) -> Self {
        self.distance_unit = distance_unit;
        self.time_unit = time_unit;
        self
    }

    /// Destinations as explicitly provided, `None` when they default to the origins.
    pub fn explicit_destinations(&self) -> Option<&[Waypoint]> {
        self.destinations
            .as_deref()
            .filter(|destinations| !destinations.is_empty())
    }

    pub fn effective_destinations(&self) -> &[Waypoint] {
        self.explicit_destinations().unwrap_or(&self.origins)
    }

    /// Number of origin/destination pairs in the resulting matrix.
    pub fn pair_count(&self) -> usize {
        self.origins.len() * self.effective_destinations().len()
    }

    pub fn is_async(&self) -> bool {
        self.start_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destinations_default_to_origins() {
        let origins = vec![
            Waypoint::from_coordinate(0.0, 0.0),
            Waypoint::from_coordinate(1.0, 1.0),
        ];
        let request = MatrixRequest::new(origins.clone()).with_destinations(vec![]);

        assert!(request.explicit_destinations().is_none());
        assert_eq!(request.effective_destinations(), origins.as_slice());
        assert_eq!(request.pair_count(), 4);
    }

    #[test]
    fn pair_count_with_destinations() {
        let request = MatrixRequest::new(vec![Waypoint::from_coordinate(0.0, 0.0); 2])
            .with_destinations(vec![Waypoint::from_coordinate(1.0, 1.0); 3]);

        assert_eq!(request.pair_count(), 6);
    }

    #[test]
    fn should_deserialize_with_defaults() {
        let request: MatrixRequest = serde_json::from_str(
            r#"{"origins":[{"coordinate":{"latitude":47.6,"longitude":-122.3}}]}"#,
        )
        .unwrap();

        assert_eq!(request.travel_mode, TravelMode::Driving);
        assert_eq!(request.resolution, 1);
        assert_eq!(request.distance_unit, DistanceUnit::Kilometers);
        assert_eq!(request.time_unit, TimeUnit::Seconds);
        assert!(!request.is_async());
    }

    #[test]
    fn should_convert_meters() {
        assert_eq!(DistanceUnit::Kilometers.convert_meters(1500.0), 1.5);
        assert!((DistanceUnit::Miles.convert_meters(1609.344) - 1.0).abs() < 1e-12);
    }
}
