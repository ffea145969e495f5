use serde::{Deserialize, Serialize};

use crate::waypoint::Waypoint;

/// One origin/destination pair of a matrix.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub origin_index: usize,
    pub destination_index: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_distance: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_duration: Option<f64>,
}

/// MatrixResult holds the cells computed for every origin/destination pair.
/// Cells are stored origin-major: the cell for `(origin, destination)` lives
/// at `origin * destinations.len() + destination`.
///
/// A result can carry an `error_message` instead of cells when an
/// asynchronous job was rejected or failed. Callers must check it even when
/// the request itself returned `Ok`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatrixResult {
    pub origins: Vec<Waypoint>,
    pub destinations: Vec<Waypoint>,
    pub cells: Vec<Cell>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl MatrixResult {
    pub fn with_error(error_message: impl Into<String>) -> Self {
        Self {
            error_message: Some(error_message.into()),
            ..Default::default()
        }
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline(always)]
    fn index(&self, origin: usize, destination: usize) -> usize {
        origin * self.destinations.len() + destination
    }

    /// Returns the cell for the pair, falling back to a scan when the cells
    /// are not laid out as a complete origin-major grid.
    pub fn cell(&self, origin: usize, destination: usize) -> Option<&Cell> {
        if origin >= self.origins.len() || destination >= self.destinations.len() {
            return None;
        }

        let index = self.index(origin, destination);
        match self.cells.get(index) {
            Some(cell)
                if cell.origin_index == origin && cell.destination_index == destination =>
            {
                Some(cell)
            }
            _ => self
                .cells
                .iter()
                .find(|cell| cell.origin_index == origin && cell.destination_index == destination),
        }
    }

    pub fn distances(&self) -> Vec<Option<f64>> {
        self.flatten(|cell| cell.travel_distance)
    }

    pub fn durations(&self) -> Vec<Option<f64>> {
        self.flatten(|cell| cell.travel_duration)
    }

    fn flatten(&self, value: impl Fn(&Cell) -> Option<f64>) -> Vec<Option<f64>> {
        let mut values = vec![None; self.origins.len() * self.destinations.len()];
        for cell in &self.cells {
            if cell.origin_index < self.origins.len()
                && cell.destination_index < self.destinations.len()
            {
                let index = self.index(cell.origin_index, cell.destination_index);
                values[index] = value(cell);
            }
        }
        values
    }

    /// Sorts cells origin-major, service responses don't guarantee an order.
    pub(crate) fn sort_cells(&mut self) {
        self.cells
            .sort_by_key(|cell| (cell.origin_index, cell.destination_index));
    }
}

/// Status of an asynchronous matrix job.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    #[serde(default)]
    pub request_id: String,

    #[serde(default)]
    pub callback_url: String,

    #[serde(default)]
    pub result_url: Option<String>,

    /// Hint from the service on how long to wait before polling again.
    #[serde(default)]
    pub callback_in_seconds: i64,

    #[serde(default)]
    pub is_completed: bool,

    #[serde(default)]
    pub is_accepted: bool,

    #[serde(default)]
    pub error_message: Option<String>,
}

impl JobStatus {
    /// Synthesized status ending a job whose status could not be retrieved.
    /// `callback_in_seconds` is `-1` so nothing polls it again.
    pub fn failed(request_id: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            callback_in_seconds: -1,
            error_message: Some(error_message.into()),
            ..Default::default()
        }
    }

    pub fn completed_result_url(&self) -> Option<&str> {
        if self.is_completed {
            self.result_url.as_deref().filter(|url| !url.is_empty())
        } else {
            None
        }
    }

    pub fn should_wait(&self) -> bool {
        self.callback_in_seconds > 0
    }
}
