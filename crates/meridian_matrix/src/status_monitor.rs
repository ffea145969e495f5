use std::{future::Future, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    distance_matrix::JobStatus,
    error::MatrixError,
    response::{Resource, decode_response},
    transport::{MatrixTransport, with_key},
};

/// Observer invoked with the service's wait hint before every wait.
pub type ProgressCallback<'a> = &'a (dyn Fn(Duration) + Send + Sync);

pub const DEFAULT_MAX_POLL_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct StatusMonitorParams {
    /// Consecutive failed polls tolerated after the first one.
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl Default for StatusMonitorParams {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_POLL_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

pub(crate) async fn cancellable<F>(
    cancellation: &CancellationToken,
    future: F,
) -> Result<F::Output, MatrixError>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = cancellation.cancelled() => Err(MatrixError::Cancelled),
        output = future => Ok(output),
    }
}

pub(crate) async fn wait(
    cancellation: &CancellationToken,
    duration: Duration,
    progress: Option<ProgressCallback<'_>>,
) -> Result<(), MatrixError> {
    if let Some(progress) = progress {
        progress(duration);
    }

    cancellable(cancellation, tokio::time::sleep(duration)).await
}

pub(crate) fn hinted_wait(status: &JobStatus) -> Option<Duration> {
    u64::try_from(status.callback_in_seconds)
        .ok()
        .filter(|seconds| *seconds > 0)
        .map(Duration::from_secs)
}

/// Polls the status of an asynchronous job until the service stops asking
/// to wait.
///
/// Polls are strictly sequential. Transient failures are retried with a fixed
/// backoff; once the retry budget is spent the monitor returns a synthesized
/// failed status instead of an error. Only service-reported errors and
/// cancellation end the loop with `Err`.
pub struct StatusMonitor<'a, T> {
    transport: &'a T,
    api_key: &'a str,
    params: &'a StatusMonitorParams,
    cancellation: &'a CancellationToken,
}

impl<'a, T> StatusMonitor<'a, T>
where
    T: MatrixTransport,
{
    pub fn new(
        transport: &'a T,
        api_key: &'a str,
        params: &'a StatusMonitorParams,
        cancellation: &'a CancellationToken,
    ) -> Self {
        Self {
            transport,
            api_key,
            params,
            cancellation,
        }
    }

    async fn poll(&self, status_url: &str) -> Result<JobStatus, MatrixError> {
        let url = with_key(status_url, self.api_key)?;
        let bytes = cancellable(self.cancellation, self.transport.get(&url)).await??;

        match decode_response(&bytes)? {
            Resource::ErrorList(errors) => Err(MatrixError::ServiceReported(errors.join(" "))),
            Resource::JobStatus(status) => Ok(status),
            Resource::Matrix(_) | Resource::Empty => Err(MatrixError::UnexpectedResponse(
                String::from("status document did not contain a job status"),
            )),
        }
    }

    /// Runs the polling loop for a job accepted with `status` and returns the
    /// last status seen, with `callback_in_seconds <= 0`.
    pub async fn run(
        &self,
        status: &JobStatus,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<JobStatus, MatrixError> {
        let request_id = status.request_id.clone();
        let mut status_url = status.callback_url.clone();
        let mut failed_polls: u32 = 0;
        let mut attempt: u32 = 0;

        if status_url.is_empty() {
            return Ok(JobStatus::failed(
                request_id,
                "The service did not provide a status URL for the job",
            ));
        }

        loop {
            attempt += 1;
            debug!("Polling status of matrix job {} (poll {})", request_id, attempt);

            match self.poll(&status_url).await {
                Ok(next) => {
                    failed_polls = 0;

                    let Some(delay) = hinted_wait(&next) else {
                        return Ok(next);
                    };

                    debug!(
                        "Matrix job {} still running, next poll in {}s",
                        request_id,
                        delay.as_secs()
                    );

                    if !next.callback_url.is_empty() {
                        status_url.clone_from(&next.callback_url);
                    }

                    wait(self.cancellation, delay, progress).await?;
                }
                Err(error @ (MatrixError::Cancelled | MatrixError::ServiceReported(_))) => {
                    return Err(error);
                }
                Err(error) if failed_polls < self.params.max_retries => {
                    failed_polls += 1;
                    warn!(
                        "Failed to poll matrix job {} ({}), retry {}/{} in {}s",
                        request_id,
                        error,
                        failed_polls,
                        self.params.max_retries,
                        self.params.retry_backoff.as_secs()
                    );

                    wait(self.cancellation, self.params.retry_backoff, None).await?;
                }
                Err(error) => {
                    warn!(
                        "Giving up on matrix job {} after {} failed polls: {}",
                        request_id,
                        failed_polls + 1,
                        error
                    );

                    return Ok(JobStatus::failed(
                        request_id,
                        format!(
                            "Unable to retrieve the status of the distance matrix job: {}",
                            error
                        ),
                    ));
                }
            }
        }
    }
}
