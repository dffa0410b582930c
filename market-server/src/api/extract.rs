//! JSON body extractor
//!
//! [`AppJson`] wraps `axum::Json` so a body that fails to parse answers with
//! the usual [`AppError`] envelope instead of axum's plain-text rejection.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use shared::error::AppError;

/// `Json<T>` whose rejection is an [`AppError`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection_to_app_error(rejection)),
        }
    }
}

fn rejection_to_app_error(rejection: JsonRejection) -> AppError {
    let detail = rejection.body_text();
    tracing::debug!(error = %detail, "Rejected request body");
    match rejection {
        // Well-formed JSON that does not fit the payload type
        JsonRejection::JsonDataError(_) => AppError::validation(detail),
        _ => AppError::invalid_request(detail),
    }
}
