use std::future::Future;

use tracing::debug;

use crate::{
    error::MatrixError,
    waypoint::{Coordinate, Waypoint},
};

/// Resolves an address to a coordinate.
pub trait Geocoder: Send + Sync {
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Coordinate, MatrixError>> + Send;
}

/// Geocoder for inputs that already carry coordinates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGeocoder;

impl Geocoder for NoGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinate, MatrixError> {
        Err(MatrixError::Geocoding {
            address: address.to_owned(),
            message: String::from("no geocoder configured"),
        })
    }
}

/// Returns resolved copies of `waypoints`. Waypoints that already have a
/// coordinate, or have no address to look up, are copied unchanged.
pub async fn resolve_waypoints<G: Geocoder>(
    geocoder: &G,
    waypoints: &[Waypoint],
) -> Result<Vec<Waypoint>, MatrixError> {
    let mut resolved = Vec::with_capacity(waypoints.len());

    for waypoint in waypoints {
        let mut waypoint = waypoint.clone();
        if waypoint.needs_geocoding() {
            if let Some(address) = waypoint.address.as_deref() {
                let coordinate = geocoder.geocode(address).await?;
                debug!(
                    "Geocoded '{}' to {},{}",
                    address, coordinate.latitude, coordinate.longitude
                );
                waypoint.coordinate = Some(coordinate);
            }
        }
        resolved.push(waypoint);
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct FixedGeocoder {
        calls: AtomicUsize,
    }

    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, _address: &str) -> Result<Coordinate, MatrixError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Coordinate::new(50.85, 4.35))
        }
    }

    #[tokio::test]
    async fn should_only_geocode_unresolved_waypoints() {
        let geocoder = FixedGeocoder {
            calls: AtomicUsize::new(0),
        };
        let waypoints = vec![
            Waypoint::from_address("Brussels"),
            Waypoint::from_coordinate(48.85, 2.35),
            Waypoint::default(),
        ];

        let resolved = resolve_waypoints(&geocoder, &waypoints).await.unwrap();

        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolved[0].coordinate, Some(Coordinate::new(50.85, 4.35)));
        assert_eq!(resolved[0].address.as_deref(), Some("Brussels"));
        assert_eq!(resolved[1], waypoints[1]);
        assert_eq!(resolved[2], Waypoint::default());
        // The input is left untouched
        assert_eq!(waypoints[0].coordinate, None);
    }

    #[tokio::test]
    async fn no_geocoder_fails_for_addresses() {
        let result = resolve_waypoints(&NoGeocoder, &[Waypoint::from_address("Brussels")]).await;

        assert!(matches!(result, Err(MatrixError::Geocoding { .. })));
    }
}
