//! Mapping dispatch failures to HTTP responses.
//!
//! - `NotFound` → 404 with the resolver message
//! - activation failure → 500; details stay in the logs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::app::DispatchError;

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        match self {
            DispatchError::NotFound(_) => {
                tracing::debug!(error = %self, "Rejecting request for hidden app");
                (StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            DispatchError::Activation(ref e) => {
                tracing::error!(app = %e.app, step = %e.step, error = %e, "App activation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Application failed to load").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let response = DispatchError::NotFound("store".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
