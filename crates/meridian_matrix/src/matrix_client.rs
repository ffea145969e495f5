use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    distance_matrix::{JobStatus, MatrixResult},
    error::MatrixError,
    geocoder::{Geocoder, NoGeocoder, resolve_waypoints},
    matrix_request::MatrixRequest,
    payload::MatrixRequestBody,
    response::{Resource, decode_response},
    status_monitor::{
        DEFAULT_MAX_POLL_RETRIES, DEFAULT_RETRY_BACKOFF, ProgressCallback, StatusMonitor,
        StatusMonitorParams, cancellable, hinted_wait, wait,
    },
    transport::{MatrixTransport, ReqwestTransport, with_key},
    validation::validate,
};

pub const DEFAULT_BASE_URL: &str = "https://dev.virtualearth.net/REST/v1";
pub const SYNC_MATRIX_PATH: &str = "/Routes/DistanceMatrix";
pub const ASYNC_MATRIX_PATH: &str = "/Routes/DistanceMatrixAsync";

pub const API_KEY_ENV_VAR: &str = "MERIDIAN_API_KEY";
pub const BASE_URL_ENV_VAR: &str = "MERIDIAN_BASE_URL";

#[derive(Debug, Clone)]
pub struct DistanceMatrixClientParams {
    pub api_key: String,
    pub base_url: String,
    pub max_poll_retries: u32,
    pub retry_backoff: Duration,
}

impl DistanceMatrixClientParams {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: String::from(DEFAULT_BASE_URL),
            max_poll_retries: DEFAULT_MAX_POLL_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    pub fn from_env() -> Result<Self, MatrixError> {
        let api_key = std::env::var(API_KEY_ENV_VAR).map_err(|error| {
            MatrixError::Configuration(format!("{} is not set: {}", API_KEY_ENV_VAR, error))
        })?;

        let mut params = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV_VAR) {
            params.base_url = base_url;
        }

        Ok(params)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn monitor_params(&self) -> StatusMonitorParams {
        StatusMonitorParams {
            max_retries: self.max_poll_retries,
            retry_backoff: self.retry_backoff,
        }
    }
}

/// How a job status should be interpreted once polling stopped.
enum JobOutcome<'a> {
    Completed(&'a str),
    Failed(&'a str),
    Rejected,
    Pending,
}

impl<'a> JobOutcome<'a> {
    fn of(status: &'a JobStatus) -> Self {
        if let Some(result_url) = status.completed_result_url() {
            JobOutcome::Completed(result_url)
        } else if let Some(message) = status
            .error_message
            .as_deref()
            .filter(|message| !message.is_empty())
        {
            JobOutcome::Failed(message)
        } else if !status.is_accepted {
            JobOutcome::Rejected
        } else {
            JobOutcome::Pending
        }
    }
}

/// Client of the remote distance matrix service.
///
/// Requests without a start time go to the synchronous endpoint. Requests
/// with a start time are submitted as asynchronous jobs which are polled
/// until they complete.
pub struct DistanceMatrixClient<T = ReqwestTransport, G = NoGeocoder> {
    params: DistanceMatrixClientParams,
    transport: T,
    geocoder: G,
}

impl DistanceMatrixClient {
    pub fn new(params: DistanceMatrixClientParams) -> Result<Self, MatrixError> {
        Ok(Self::with_transport(
            params,
            ReqwestTransport::new()?,
            NoGeocoder,
        ))
    }
}

impl<T, G> DistanceMatrixClient<T, G>
where
    T: MatrixTransport,
    G: Geocoder,
{
    pub fn with_transport(params: DistanceMatrixClientParams, transport: T, geocoder: G) -> Self {
        Self {
            params,
            transport,
            geocoder,
        }
    }

    pub fn params(&self) -> &DistanceMatrixClientParams {
        &self.params
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a copy of the request with all waypoints geocoded.
    pub async fn resolve(&self, request: &MatrixRequest) -> Result<MatrixRequest, MatrixError> {
        let mut resolved = request.clone();
        resolved.origins = resolve_waypoints(&self.geocoder, &request.origins).await?;
        if let Some(destinations) = &request.destinations {
            resolved.destinations = Some(resolve_waypoints(&self.geocoder, destinations).await?);
        }
        Ok(resolved)
    }

    pub async fn execute(
        &self,
        request: &MatrixRequest,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<MatrixResult, MatrixError> {
        self.execute_with_cancellation(request, progress, &CancellationToken::new())
            .await
    }

    /// Executes the request, aborting with [`MatrixError::Cancelled`] as soon
    /// as `cancellation` fires at a network call or a wait.
    ///
    /// An `Ok` result may still carry an `error_message` when an asynchronous
    /// job was rejected, failed, or its result could not be downloaded.
    pub async fn execute_with_cancellation(
        &self,
        request: &MatrixRequest,
        progress: Option<ProgressCallback<'_>>,
        cancellation: &CancellationToken,
    ) -> Result<MatrixResult, MatrixError> {
        let request = cancellable(cancellation, self.resolve(request)).await??;
        validate(&request)?;

        let body = MatrixRequestBody::from_request(&request).to_json()?;
        let path = if request.is_async() {
            ASYNC_MATRIX_PATH
        } else {
            SYNC_MATRIX_PATH
        };
        let url = with_key(&self.params.endpoint(path), &self.params.api_key)?;

        debug!(
            "Posting {} matrix request with {} cells",
            if request.is_async() { "async" } else { "sync" },
            request.pair_count()
        );

        let bytes = cancellable(cancellation, self.transport.post_json(&url, &body)).await??;

        match decode_response(&bytes)? {
            Resource::ErrorList(errors) => Err(MatrixError::ServiceReported(errors.join(" "))),
            Resource::Matrix(matrix) => match matrix.error_message {
                Some(message) => Err(MatrixError::ServiceReported(message)),
                None => Ok(attach_waypoints(matrix, &request)),
            },
            Resource::JobStatus(status) => match status.error_message {
                Some(message) if !message.is_empty() => {
                    Err(MatrixError::ServiceReported(message))
                }
                _ => {
                    self.run_job(status, &request, progress, cancellation)
                        .await
                }
            },
            Resource::Empty => {
                debug!("Matrix request returned no resources");
                Ok(MatrixResult::default())
            }
        }
    }

    async fn run_job(
        &self,
        status: JobStatus,
        request: &MatrixRequest,
        progress: Option<ProgressCallback<'_>>,
        cancellation: &CancellationToken,
    ) -> Result<MatrixResult, MatrixError> {
        info!(
            "Matrix job {} submitted (accepted: {})",
            status.request_id, status.is_accepted
        );

        let status = if matches!(JobOutcome::of(&status), JobOutcome::Pending) {
            if let Some(delay) = hinted_wait(&status) {
                wait(cancellation, delay, progress).await?;
            }

            let params = self.params.monitor_params();
            StatusMonitor::new(&self.transport, &self.params.api_key, &params, cancellation)
                .run(&status, progress)
                .await?
        } else {
            status
        };

        match JobOutcome::of(&status) {
            JobOutcome::Completed(result_url) => {
                info!("Matrix job {} completed", status.request_id);
                self.download_result(result_url, request, cancellation)
                    .await
            }
            JobOutcome::Failed(message) => Ok(failed_result(request, message)),
            JobOutcome::Rejected => Ok(failed_result(
                request,
                "The distance matrix job was not accepted by the service",
            )),
            JobOutcome::Pending => Ok(failed_result(
                request,
                "The distance matrix job stopped without completing",
            )),
        }
    }

    async fn download_result(
        &self,
        result_url: &str,
        request: &MatrixRequest,
        cancellation: &CancellationToken,
    ) -> Result<MatrixResult, MatrixError> {
        debug!("Downloading matrix result");

        let resource = match cancellable(cancellation, self.transport.get(result_url)).await? {
            Ok(bytes) => decode_response(&bytes),
            Err(error) => Err(MatrixError::Transport(error)),
        };

        match resource {
            Ok(Resource::Matrix(matrix)) => match matrix.error_message {
                Some(message) => Ok(failed_result(request, &message)),
                None => Ok(attach_waypoints(matrix, request)),
            },
            Ok(Resource::ErrorList(errors)) => {
                Err(MatrixError::ServiceReported(errors.join(" ")))
            }
            Ok(Resource::JobStatus(_) | Resource::Empty) => Ok(failed_result(
                request,
                "The distance matrix result document did not contain a matrix",
            )),
            Err(error) => {
                warn!("Unable to download matrix result: {}", error);
                Ok(failed_result(
                    request,
                    &format!("Unable to download the distance matrix result: {}", error),
                ))
            }
        }
    }
}

/// The service does not echo caller-side waypoint data, so the request's own
/// waypoints are attached to the result.
fn attach_waypoints(mut matrix: MatrixResult, request: &MatrixRequest) -> MatrixResult {
    matrix.origins = request.origins.clone();
    matrix.destinations = request.effective_destinations().to_vec();
    matrix.sort_cells();
    matrix
}

fn failed_result(request: &MatrixRequest, message: &str) -> MatrixResult {
    MatrixResult {
        origins: request.origins.clone(),
        destinations: request.effective_destinations().to_vec(),
        cells: vec![],
        error_message: Some(message.to_owned()),
    }
}
