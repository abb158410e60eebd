use std::sync::atomic::Ordering;

use axum::{Json, extract::State};
use serde_json::json;

use crate::SharedState;
use crate::error::ApiError;

pub async fn livez() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn readyz(State(state): State<SharedState>) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.readiness.load(Ordering::SeqCst) {
        return Err(ApiError::ShuttingDown);
    }

    Ok(Json(json!({
        "status": "ok",
        "qualification_pairs": state.service.engine().table().pair_count(),
        "application": env!("CARGO_PKG_NAME"),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn readyz_rejects_when_readiness_disabled() {
        let state = crate::test_state();
        state.readiness.store(false, Ordering::SeqCst);

        assert!(matches!(
            readyz(State(state)).await,
            Err(ApiError::ShuttingDown)
        ));
    }
}
