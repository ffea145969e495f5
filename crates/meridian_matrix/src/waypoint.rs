use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<&Coordinate> for geo_types::Point {
    fn from(coordinate: &Coordinate) -> Self {
        geo_types::Point::new(coordinate.longitude, coordinate.latitude)
    }
}

impl From<geo_types::Point> for Coordinate {
    fn from(point: geo_types::Point) -> Self {
        Coordinate::new(point.y(), point.x())
    }
}

/// A location given as an address, a coordinate, or both.
///
/// Address-only waypoints must be geocoded before they can take part in a
/// matrix computation, see [`crate::geocoder::resolve_waypoints`].
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Waypoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
}

impl Waypoint {
    pub fn from_coordinate(latitude: f64, longitude: f64) -> Self {
        Self {
            address: None,
            coordinate: Some(Coordinate::new(latitude, longitude)),
        }
    }

    pub fn from_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            coordinate: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.coordinate.is_some()
    }

    pub fn needs_geocoding(&self) -> bool {
        self.coordinate.is_none() && self.address.as_deref().is_some_and(|a| !a.trim().is_empty())
    }
}

impl std::fmt::Display for Waypoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.address, &self.coordinate) {
            (Some(address), _) => write!(f, "{}", address),
            (None, Some(coordinate)) => {
                write!(f, "{:.5},{:.5}", coordinate.latitude, coordinate.longitude)
            }
            (None, None) => write!(f, "<empty waypoint>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_coordinate_to_point() {
        let point: geo_types::Point = (&Coordinate::new(47.6, -122.3)).into();
        assert_eq!(point.x(), -122.3);
        assert_eq!(point.y(), 47.6);
    }

    #[test]
    fn needs_geocoding() {
        assert!(Waypoint::from_address("Seattle, WA").needs_geocoding());
        assert!(!Waypoint::from_coordinate(47.6, -122.3).needs_geocoding());
        assert!(!Waypoint::from_address("  ").needs_geocoding());
        assert!(!Waypoint::default().needs_geocoding());
    }

    #[test]
    fn should_deserialize_partial_waypoints() {
        let waypoints: Vec<Waypoint> = serde_json::from_str(
            r#"[{"address":"Brussels"},{"coordinate":{"latitude":50.8,"longitude":4.35}}]"#,
        )
        .unwrap();

        assert_eq!(waypoints[0], Waypoint::from_address("Brussels"));
        assert_eq!(waypoints[1], Waypoint::from_coordinate(50.8, 4.35));
    }
}
