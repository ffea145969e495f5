use std::{collections::VecDeque, sync::Mutex};

use crate::{error::TransportError, transport::MatrixTransport};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Get(String),
    Post(String, String),
}

/// Transport replaying queued responses in order, whatever the URL.
/// Running out of responses is reported as a 404.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(body.as_bytes().to_vec()));
        self
    }

    pub fn fail(self, status: u16) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError::Api {
                status,
                message: String::from("scripted failure"),
            }));
        self
    }

    pub fn fail_times(self, status: u16, times: usize) -> Self {
        (0..times).fold(self, |transport, _| transport.fail(status))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn get_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::Get(url) => Some(url),
                RecordedCall::Post(..) => None,
            })
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    fn next(&self) -> Result<Vec<u8>, TransportError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Api {
                    status: 404,
                    message: String::from("no scripted response left"),
                })
            })
    }
}

impl MatrixTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::Get(url.to_owned()));
        self.next()
    }

    async fn post_json(&self, url: &str, json_body: &str) -> Result<Vec<u8>, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::Post(url.to_owned(), json_body.to_owned()));
        self.next()
    }
}

pub fn status_json(
    request_id: &str,
    callback_in_seconds: i64,
    is_completed: bool,
    result_url: Option<&str>,
) -> String {
    serde_json::json!({
        "resourceSets": [{
            "resources": [{
                "__type": "DistanceMatrixAsyncStatus:http://schemas.microsoft.com/search/local/ws/rest/v1",
                "requestId": request_id,
                "callbackUrl": format!("https://service/status?requestId={}", request_id),
                "callbackInSeconds": callback_in_seconds,
                "isAccepted": true,
                "isCompleted": is_completed,
                "resultUrl": result_url,
            }]
        }]
    })
    .to_string()
}

/// Matrix document with one cell per `(origin, destination, distance, duration)`.
pub fn matrix_json(cells: &[(usize, usize, f64, f64)]) -> String {
    let results: Vec<serde_json::Value> = cells
        .iter()
        .map(|(origin, destination, distance, duration)| {
            serde_json::json!({
                "originIndex": origin,
                "destinationIndex": destination,
                "travelDistance": distance,
                "travelDuration": duration,
            })
        })
        .collect();

    serde_json::json!({
        "resourceSets": [{
            "resources": [{
                "__type": "DistanceMatrix:http://schemas.microsoft.com/search/local/ws/rest/v1",
                "results": results,
            }]
        }]
    })
    .to_string()
}

pub fn error_json(errors: &[&str]) -> String {
    serde_json::json!({ "statusCode": 400, "errorDetails": errors }).to_string()
}
