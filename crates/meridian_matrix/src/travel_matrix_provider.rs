use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, JsonSchema, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TravelMatrixProvider {
    /// Remote distance matrix service, synchronous or asynchronous depending
    /// on the request.
    #[default]
    Remote,

    /// Great-circle distances computed locally, no travel durations.
    AsTheCrowFlies,
}
