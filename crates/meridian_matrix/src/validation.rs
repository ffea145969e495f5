use jiff::SignedDuration;

use crate::{
    error::MatrixError,
    matrix_request::{MatrixRequest, TravelMode},
    waypoint::Waypoint,
};

/// Maximum number of cells for a standard matrix request.
pub const MAX_MATRIX_PAIRS: usize = 625;

/// Maximum number of cells when a start time is set (histogram requests).
pub const MAX_HISTOGRAM_PAIRS: usize = 100;

pub const MAX_TIME_SPAN: SignedDuration = SignedDuration::from_hours(24);

pub const MIN_RESOLUTION: u8 = 1;
pub const MAX_RESOLUTION: u8 = 4;

fn ensure_resolved(waypoints: &[Waypoint], role: &str) -> Result<(), MatrixError> {
    for (index, waypoint) in waypoints.iter().enumerate() {
        if !waypoint.is_resolved() {
            return Err(MatrixError::UnresolvedLocation(format!(
                "{} {} ({}) has no coordinate",
                role, index, waypoint
            )));
        }
    }

    Ok(())
}

/// Checks a request against the limits of the remote matrix service.
///
/// Waypoints must already be geocoded. When a start time is set the travel
/// mode and histogram checks replace the standard cell limit: a non-driving
/// request reports `IncompatibleTravelMode` whatever its size, and a driving
/// request above 100 cells always reports `HistogramMatrixTooLarge`.
pub fn validate(request: &MatrixRequest) -> Result<(), MatrixError> {
    if request.origins.is_empty() {
        return Err(MatrixError::UnresolvedLocation(String::from(
            "at least one origin is required",
        )));
    }

    ensure_resolved(&request.origins, "origin")?;

    if let Some(destinations) = request.explicit_destinations() {
        ensure_resolved(destinations, "destination")?;
    }

    let pairs = request.pair_count();

    match request.start_time {
        Some(_) => {
            if request.travel_mode != TravelMode::Driving {
                return Err(MatrixError::IncompatibleTravelMode(request.travel_mode));
            }

            if pairs > MAX_HISTOGRAM_PAIRS {
                return Err(MatrixError::HistogramMatrixTooLarge {
                    pairs,
                    max: MAX_HISTOGRAM_PAIRS,
                });
            }
        }
        None => {
            if pairs > MAX_MATRIX_PAIRS {
                return Err(MatrixError::MatrixTooLarge {
                    pairs,
                    max: MAX_MATRIX_PAIRS,
                });
            }
        }
    }

    if let Some(end_time) = request.end_time {
        let Some(start_time) = request.start_time else {
            return Err(MatrixError::MissingStartTime);
        };

        if end_time < start_time {
            return Err(MatrixError::EndBeforeStart {
                start: start_time,
                end: end_time,
            });
        }

        let span = end_time.duration_since(start_time);
        if span > MAX_TIME_SPAN {
            return Err(MatrixError::TimeSpanTooLarge {
                hours: span.as_secs_f64() / 3600.0,
            });
        }

        if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&request.resolution) {
            return Err(MatrixError::InvalidResolution(request.resolution));
        }
    }

    Ok(())
}
