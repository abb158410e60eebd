use std::future::Future;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ra_common::{config::ConfigError, repository::RepositoryError, search::SearchError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::handlers::pagination::MAX_PAGE;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// リクエスト ID をタスクローカルに載せて `fut` を実行する
pub async fn with_request_id<T>(request_id: Option<String>, fut: impl Future<Output = T>) -> T {
    match request_id {
        Some(id) => REQUEST_ID.scope(id, fut).await,
        None => fut.await,
    }
}

pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(String::clone).ok()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("page {0} is out of range")]
    PageOutOfRange(usize),
    #[error("record source failed: {0}")]
    Repository(#[from] RepositoryError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("shutting down")]
    ShuttingDown,
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    request_id: Option<String>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::PageOutOfRange(_) => StatusCode::BAD_REQUEST,
            ApiError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Repository(_) | ApiError::Config(_) | ApiError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::PageOutOfRange(_) => "page_out_of_range",
            ApiError::Repository(_) => "upstream_error",
            ApiError::Config(_) => "config_error",
            ApiError::ShuttingDown => "service_unavailable",
            ApiError::Server(_) => "internal_error",
        }
    }

    /// クライアントに見せる文言。内部エラーの詳細は含めない。
    fn public_message(&self) -> String {
        match self {
            ApiError::PageOutOfRange(_) => format!("page must be between 1 and {MAX_PAGE}"),
            ApiError::ShuttingDown => "service unavailable".to_string(),
            _ => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let request_id = current_request_id();

        if status.is_server_error() {
            error!(code = self.code(), request_id = ?request_id, error = %self, "request failed");
        } else {
            warn!(code = self.code(), request_id = ?request_id, error = %self, "request rejected");
        }

        let body = ErrorBody {
            code: self.code(),
            message: self.public_message(),
            request_id,
        };
        (status, Json(body)).into_response()
    }
}

impl From<SearchError> for ApiError {
    fn from(value: SearchError) -> Self {
        match value {
            SearchError::Repository(err) => ApiError::Repository(err),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(value: ConfigError) -> Self {
        ApiError::Config(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::*;

    async fn render(err: ApiError, request_id: Option<&str>) -> (StatusCode, Value) {
        let response = with_request_id(request_id.map(String::from), async move {
            err.into_response()
        })
        .await;

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn carries_request_id_from_task_local() {
        let (status, json) = render(ApiError::ShuttingDown, Some("req-123")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["request_id"], "req-123");
    }

    #[tokio::test]
    async fn repository_failures_do_not_leak_details() {
        let err = ApiError::from(SearchError::Repository(RepositoryError::Unavailable(
            "postgres://user:secret@db/ra".into(),
        )));
        let (status, json) = render(err, None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "upstream_error");
        assert_eq!(json["message"], "internal server error");
        assert!(json["request_id"].is_null());
    }

    #[tokio::test]
    async fn page_errors_are_client_errors() {
        let (status, json) = render(ApiError::PageOutOfRange(20_000), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "page_out_of_range");
        assert_eq!(json["message"], "page must be between 1 and 10000");
    }
}
