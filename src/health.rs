//! Liveness and readiness probes.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Can the data store be reached? |

use tracing::warn;

use crate::error::Error;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::state::AppState;
use crate::status::Status;

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request, _state: AppState) -> Result<Response, Error> {
    Ok(Response::text("ok"))
}

/// `200 OK` with body `"ready"` once the data store answers a ping,
/// `503 Service Unavailable` otherwise.
pub async fn readiness(_req: Request, state: AppState) -> Result<Response, Error> {
    match state.db.ping().await {
        Ok(()) => Ok(Response::text("ready")),
        Err(e) => {
            warn!("readiness check failed: {e}");
            Ok((Status::ServiceUnavailable, "unavailable").into_response())
        }
    }
}
