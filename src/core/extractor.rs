use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::shared::types::ActionResult;

/// JSON body extractor for form-style actions.
///
/// A body that fails to parse is answered with the action envelope
/// (`{"success": false, "error": ...}`) so the submitting form can show the
/// message, instead of axum's plain-text rejection.
pub struct ActionJson<T>(pub T);

impl<T, S> FromRequest<S> for ActionJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ActionJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(ActionJsonRejection(rejection)),
        }
    }
}

pub struct ActionJsonRejection(JsonRejection);

impl IntoResponse for ActionJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid form data: {}", err.body_text()),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with `Content-Type: application/json`".to_string()
            }
            _ => "Failed to parse request body".to_string(),
        };

        tracing::debug!("Rejected action body: {}", message);

        (
            StatusCode::BAD_REQUEST,
            Json(ActionResult::<()>::failure(message)),
        )
            .into_response()
    }
}
