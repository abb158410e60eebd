use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, Request, header::CONTENT_TYPE},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::{
    SharedState, error,
    handlers::{health, search},
};

const REQUEST_ID: &str = "x-request-id";
const MAX_BODY_BYTES: usize = 64 * 1024;

fn request_id_of<B>(request: &Request<B>) -> Option<&str> {
    request
        .headers()
        .get(REQUEST_ID)
        .and_then(|value| value.to_str().ok())
}

/// `SetRequestIdLayer` が振った ID をハンドラ内の `ApiError` から参照できるようにする
async fn scope_request_id(request: Request<Body>, next: Next) -> Response {
    let request_id = request_id_of(&request).map(String::from);
    error::with_request_id(request_id, next.run(request)).await
}

fn search_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http",
        method = %request.method(),
        path = request.uri().path(),
        request_id = request_id_of(request).unwrap_or_default(),
    )
}

fn cors(origins: &[HeaderValue]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins.to_vec())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(REQUEST_ID)])
}

fn agent_routes() -> Router<SharedState> {
    Router::new()
        .route("/:agent_id/candidates/search", post(search::search_candidates))
        .route("/:agent_id/listings/search", post(search::search_listings))
}

pub fn create_router(state: SharedState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID);

    Router::new()
        .route("/livez", get(health::livez))
        .route("/readyz", get(health::readyz))
        .route("/health", get(health::readyz))
        .nest("/api/agents", agent_routes())
        .layer(middleware::from_fn(scope_request_id))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http().make_span_with(search_span))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(cors(&state.config.cors_origins))
        .with_state(state)
}
