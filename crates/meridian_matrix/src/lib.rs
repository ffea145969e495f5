//! Travel distance and duration matrices between origins and destinations.
//!
//! Matrices are computed by a remote distance matrix service, either
//! synchronously or as an asynchronous job that is polled until completion,
//! or approximated locally with great-circle distances.

pub mod as_the_crow_flies;
pub mod distance_matrix;
pub mod error;
pub mod geocoder;
pub mod matrix_client;
pub mod matrix_request;
pub mod payload;
pub mod response;
pub mod status_monitor;
pub mod transport;
pub mod travel_matrix_client;
pub mod travel_matrix_provider;
pub mod validation;
pub mod waypoint;

#[cfg(test)]
pub(crate) mod test_utils;
