use serde::Deserialize;
use serde_json::Value;

use crate::{
    distance_matrix::{Cell, JobStatus, MatrixResult},
    error::MatrixError,
};

const JOB_STATUS_TYPE: &str = "DistanceMatrixAsyncStatus";
const MATRIX_TYPE: &str = "DistanceMatrix";

/// The single resource carried by a response document.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    ErrorList(Vec<String>),
    JobStatus(JobStatus),
    Matrix(MatrixResult),
    Empty,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseDocument {
    #[serde(default)]
    error_details: Option<Vec<String>>,

    #[serde(default)]
    resource_sets: Option<Vec<ResourceSet>>,
}

#[derive(Deserialize)]
struct ResourceSet {
    #[serde(default)]
    resources: Option<Vec<Value>>,
}

/// The service echoes origins and destinations as bare coordinates, they are
/// dropped here and re-attached from the request.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMatrix {
    #[serde(default)]
    results: Option<Vec<Cell>>,

    #[serde(default)]
    error_message: Option<String>,
}

enum ResourceKind {
    JobStatus,
    Matrix,
    Unknown,
}

fn resource_kind(resource: &Value) -> ResourceKind {
    match resource.get("__type").and_then(Value::as_str) {
        Some(kind) if kind.starts_with(JOB_STATUS_TYPE) => ResourceKind::JobStatus,
        Some(kind) if kind.starts_with(MATRIX_TYPE) => ResourceKind::Matrix,
        _ if resource.get("requestId").is_some() => ResourceKind::JobStatus,
        _ if resource.get("results").is_some() || resource.get("errorMessage").is_some() => {
            ResourceKind::Matrix
        }
        _ => ResourceKind::Unknown,
    }
}

fn decode_resource(resource: Value) -> Result<Option<Resource>, MatrixError> {
    match resource_kind(&resource) {
        ResourceKind::JobStatus => Ok(Some(Resource::JobStatus(serde_json::from_value(
            resource,
        )?))),
        ResourceKind::Matrix => {
            let matrix: WireMatrix = serde_json::from_value(resource)?;
            Ok(Some(Resource::Matrix(MatrixResult {
                cells: matrix.results.unwrap_or_default(),
                error_message: matrix.error_message,
                ..Default::default()
            })))
        }
        ResourceKind::Unknown => Ok(None),
    }
}

/// Decodes a response document into the resource it carries.
pub fn decode_response(bytes: &[u8]) -> Result<Resource, MatrixError> {
    let document: ResponseDocument = serde_json::from_slice(bytes)?;

    if let Some(errors) = document.error_details.filter(|errors| !errors.is_empty()) {
        return Ok(Resource::ErrorList(errors));
    }

    let resources = document
        .resource_sets
        .unwrap_or_default()
        .into_iter()
        .flat_map(|set| set.resources.unwrap_or_default());

    for resource in resources {
        if let Some(resource) = decode_resource(resource)? {
            return Ok(resource);
        }
    }

    Ok(Resource::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_decode_error_list() {
        let resource = decode_response(
            br#"{"statusCode":400,"errorDetails":["Invalid key","Try again"],"resourceSets":[]}"#,
        )
        .unwrap();

        assert_eq!(
            resource,
            Resource::ErrorList(vec![String::from("Invalid key"), String::from("Try again")])
        );
    }

    #[test]
    fn should_decode_job_status() {
        let resource = decode_response(
            br#"{"resourceSets":[{"resources":[{
                "__type":"DistanceMatrixAsyncStatus:http://schemas.microsoft.com/search/local/ws/rest/v1",
                "requestId":"abc",
                "callbackUrl":"https://service/status?requestId=abc",
                "callbackInSeconds":15,
                "isAccepted":true,
                "isCompleted":false
            }]}]}"#,
        )
        .unwrap();

        let Resource::JobStatus(status) = resource else {
            panic!("expected job status, got {:?}", resource);
        };
        assert_eq!(status.request_id, "abc");
        assert_eq!(status.callback_in_seconds, 15);
        assert!(status.is_accepted);
        assert!(!status.is_completed);
        assert_eq!(status.result_url, None);
        assert_eq!(status.error_message, None);
    }

    #[test]
    fn should_decode_matrix() {
        let resource = decode_response(
            br#"{"resourceSets":[{"resources":[{
                "__type":"DistanceMatrix:http://schemas.microsoft.com/search/local/ws/rest/v1",
                "origins":[{"latitude":47.6,"longitude":-122.3}],
                "results":[
                    {"originIndex":0,"destinationIndex":0,"travelDistance":0.0,"travelDuration":0.0},
                    {"originIndex":0,"destinationIndex":1,"travelDistance":12.5,"travelDuration":900.0}
                ]
            }]}]}"#,
        )
        .unwrap();

        let Resource::Matrix(matrix) = resource else {
            panic!("expected matrix, got {:?}", resource);
        };
        assert_eq!(matrix.cells.len(), 2);
        assert_eq!(matrix.cells[1].travel_distance, Some(12.5));
        assert_eq!(matrix.cells[1].travel_duration, Some(900.0));
        assert!(matrix.origins.is_empty());
    }

    #[test]
    fn should_discriminate_by_shape_without_type() {
        let status = decode_response(br#"{"resourceSets":[{"resources":[{"requestId":"x"}]}]}"#)
            .unwrap();
        assert!(matches!(status, Resource::JobStatus(_)));

        let matrix =
            decode_response(br#"{"resourceSets":[{"resources":[{"errorMessage":"nope"}]}]}"#)
                .unwrap();
        assert!(
            matches!(matrix, Resource::Matrix(m) if m.error_message.as_deref() == Some("nope"))
        );
    }

    #[test]
    fn should_decode_empty_responses() {
        let bodies: [&[u8]; 4] = [
            br#"{}"#,
            br#"{"resourceSets":[]}"#,
            br#"{"resourceSets":[{"resources":[]}]}"#,
            br#"{"errorDetails":[],"resourceSets":[{"resources":[{"name":"other"}]}]}"#,
        ];

        for body in bodies {
            assert_eq!(decode_response(body).unwrap(), Resource::Empty);
        }
    }

    #[test]
    fn should_fail_on_malformed_json() {
        assert!(matches!(
            decode_response(b"<html>"),
            Err(MatrixError::Decode(_))
        ));
    }
}
