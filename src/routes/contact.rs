use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::{metadata, parser, pipeline};

pub async fn submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let client = metadata::client_identifier(&headers);

    let result = async {
        let body = body.map_err(body_error)?;
        let submission = parser::parse_body(&body)?;
        pipeline::run(&state, &client, &submission).await
    }
    .await;

    match result {
        Ok(done) => {
            tracing::debug!(client = %client, reference = %done.reference, "Contact form accepted");
            Ok((
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Thank you for contacting us. We will be in touch shortly.",
                })),
            )
                .into_response())
        }
        Err(err) => {
            if err.status().is_client_error() {
                tracing::info!(client = %client, code = err.code(), "Contact form rejected");
            }
            Err(err)
        }
    }
}

fn body_error(rejection: BytesRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::RequestMalformed(rejection.body_text())
    }
}

/// CORS preflight. The headers come from the layers in `build_router`.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
