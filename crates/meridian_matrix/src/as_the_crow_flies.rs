use geo::{Distance, Haversine};

use crate::{
    distance_matrix::{Cell, MatrixResult},
    error::MatrixError,
    matrix_request::{DistanceUnit, MatrixRequest},
    waypoint::Waypoint,
};

fn point(waypoint: &Waypoint, role: &str, index: usize) -> Result<geo_types::Point, MatrixError> {
    waypoint
        .coordinate
        .as_ref()
        .map(geo_types::Point::from)
        .ok_or_else(|| {
            MatrixError::UnresolvedLocation(format!(
                "{} {} ({}) has no coordinate",
                role, index, waypoint
            ))
        })
}

/// Great-circle distance matrix between origins and destinations.
///
/// Destinations default to the origins when absent or empty. Durations are
/// left unset. The service limits don't apply here, any size is accepted.
pub fn as_the_crow_flies_matrix(
    origins: &[Waypoint],
    destinations: Option<&[Waypoint]>,
    distance_unit: DistanceUnit,
) -> Result<MatrixResult, MatrixError> {
    let destinations = destinations
        .filter(|destinations| !destinations.is_empty())
        .unwrap_or(origins);

    let from_points = origins
        .iter()
        .enumerate()
        .map(|(i, waypoint)| point(waypoint, "origin", i))
        .collect::<Result<Vec<_>, _>>()?;
    let to_points = destinations
        .iter()
        .enumerate()
        .map(|(j, waypoint)| point(waypoint, "destination", j))
        .collect::<Result<Vec<_>, _>>()?;

    let haversine = Haversine;
    let mut cells = Vec::with_capacity(from_points.len() * to_points.len());

    for (i, from) in from_points.iter().enumerate() {
        for (j, to) in to_points.iter().enumerate() {
            let meters = haversine.distance(*from, *to);
            cells.push(Cell {
                origin_index: i,
                destination_index: j,
                travel_distance: Some(distance_unit.convert_meters(meters)),
                travel_duration: None,
            });
        }
    }

    Ok(MatrixResult {
        origins: origins.to_vec(),
        destinations: destinations.to_vec(),
        cells,
        error_message: None,
    })
}

pub fn as_the_crow_flies_request(request: &MatrixRequest) -> Result<MatrixResult, MatrixError> {
    as_the_crow_flies_matrix(
        &request.origins,
        request.destinations.as_deref(),
        request.distance_unit,
    )
}
