use std::fmt::Display;

use axum::http::StatusCode;

/// Liveness probe for `GET /healthz`.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Turn the outcome of a dependency probe into a readiness status.
///
/// Services call this from their own `GET /readyz` handler after pinging
/// whatever they cannot serve without (database, cache).
pub fn readiness<E: Display>(dependency: &'static str, probe: Result<(), E>) -> StatusCode {
    match probe {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            ::tracing::warn!(dependency, error = %e, "readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
