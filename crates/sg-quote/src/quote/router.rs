use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::mailer::Mailer;
use super::service::{QuoteError, QuoteService, RequestOrigin};

pub const QUOTE_PATH: &str = "/api/quote";

/// Router exposing the quote endpoint. Only `POST` is accepted.
pub fn quote_router<M>(service: Arc<QuoteService<M>>) -> Router
where
    M: Mailer + 'static,
{
    Router::new()
        .route(
            QUOTE_PATH,
            post(submit_handler::<M>).fallback(method_not_allowed),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<M>(
    State(service): State<Arc<QuoteService<M>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    M: Mailer + 'static,
{
    let origin = origin_from_headers(&headers);
    match service.submit(&body, &origin).await {
        Ok(receipt) => {
            let payload = json!({ "ok": true, "codigo": receipt.code });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn method_not_allowed() -> Response {
    QuoteError::MethodNotAllowed.into_response()
}

fn origin_from_headers(headers: &HeaderMap) -> RequestOrigin {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    RequestOrigin {
        forwarded_proto: read("x-forwarded-proto"),
        host: read(header::HOST.as_str()),
    }
}

impl IntoResponse for QuoteError {
    fn into_response(self) -> Response {
        let status = match &self {
            QuoteError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            QuoteError::InvalidSubmission | QuoteError::MalformedBody => StatusCode::BAD_REQUEST,
            QuoteError::MissingConfiguration { .. } | QuoteError::Dispatch(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        if status == StatusCode::METHOD_NOT_ALLOWED {
            return (status, [(header::ALLOW, "POST")], body).into_response();
        }
        (status, body).into_response()
    }
}
