use tokio_util::sync::CancellationToken;

use crate::{
    as_the_crow_flies::as_the_crow_flies_request,
    distance_matrix::MatrixResult,
    error::MatrixError,
    geocoder::{Geocoder, NoGeocoder},
    matrix_client::DistanceMatrixClient,
    matrix_request::MatrixRequest,
    status_monitor::{ProgressCallback, cancellable},
    transport::{MatrixTransport, ReqwestTransport},
    travel_matrix_provider::TravelMatrixProvider,
};

pub struct TravelMatrixClient<T = ReqwestTransport, G = NoGeocoder> {
    matrix_client: DistanceMatrixClient<T, G>,
}

impl<T, G> TravelMatrixClient<T, G>
where
    T: MatrixTransport,
    G: Geocoder,
{
    pub fn new(matrix_client: DistanceMatrixClient<T, G>) -> Self {
        Self { matrix_client }
    }

    pub fn matrix_client(&self) -> &DistanceMatrixClient<T, G> {
        &self.matrix_client
    }

    /// Computes the matrix with `provider`. Firing `cancellation` aborts any
    /// pending geocoding, network call or wait with [`MatrixError::Cancelled`].
    pub async fn fetch_matrix(
        &self,
        request: &MatrixRequest,
        provider: TravelMatrixProvider,
        progress: Option<ProgressCallback<'_>>,
        cancellation: &CancellationToken,
    ) -> Result<MatrixResult, MatrixError> {
        match provider {
            TravelMatrixProvider::Remote => {
                self.matrix_client
                    .execute_with_cancellation(request, progress, cancellation)
                    .await
            }
            TravelMatrixProvider::AsTheCrowFlies => {
                let request = cancellable(cancellation, self.matrix_client.resolve(request)).await??;
                as_the_crow_flies_request(&request)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        matrix_client::DistanceMatrixClientParams,
        test_utils::{ScriptedTransport, matrix_json},
        waypoint::Waypoint,
    };

    use super::*;

    fn client(transport: ScriptedTransport) -> TravelMatrixClient<ScriptedTransport> {
        TravelMatrixClient::new(DistanceMatrixClient::with_transport(
            DistanceMatrixClientParams::new("secret"),
            transport,
            NoGeocoder,
        ))
    }

    #[tokio::test]
    async fn as_the_crow_flies_stays_local() {
        let client = client(ScriptedTransport::new());
        let request = MatrixRequest::new(vec![
            Waypoint::from_coordinate(0.0, 0.0),
            Waypoint::from_coordinate(0.0, 1.0),
        ]);

        let result = client
            .fetch_matrix(
                &request,
                TravelMatrixProvider::AsTheCrowFlies,
                None,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(result.cells.len(), 4);
        assert!((result.cell(0, 1).unwrap().travel_distance.unwrap() - 111.19).abs() < 0.1);
        assert!(client.matrix_client().params().api_key == "secret");
    }

    #[tokio::test]
    async fn remote_uses_the_service() {
        let client = client(ScriptedTransport::new().respond(&matrix_json(&[(0, 0, 0.0, 0.0)])));
        let request = MatrixRequest::new(vec![Waypoint::from_coordinate(0.0, 0.0)]);

        let result = client
            .fetch_matrix(
                &request,
                TravelMatrixProvider::Remote,
                None,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(result.cells.len(), 1);
    }

    #[tokio::test]
    async fn cancelled_fetch_skips_the_service() {
        let client = client(ScriptedTransport::new().respond(&matrix_json(&[(0, 0, 0.0, 0.0)])));
        let request = MatrixRequest::new(vec![Waypoint::from_coordinate(0.0, 0.0)]);
        let cancellation = CancellationToken::new();
        cancellation.cancel();

        for provider in [TravelMatrixProvider::Remote, TravelMatrixProvider::AsTheCrowFlies] {
            let result = client
                .fetch_matrix(&request, provider, None, &cancellation)
                .await;

            assert!(matches!(result, Err(MatrixError::Cancelled)));
        }
        assert!(client.matrix_client().transport().calls().is_empty());
    }
}
