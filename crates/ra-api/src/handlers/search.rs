use axum::{
    Json,
    extract::{Path, Query, State},
};
use ra_common::{
    Candidate, Listing,
    api::{SearchRequest, SearchResponse},
    matching::SearchCriteria,
    repository::RecordKind,
};
use ra_metrics::{record_search, record_search_failure};
use serde::Deserialize;

use super::pagination::validate_page;
use crate::{SharedState, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

pub async fn search_candidates(
    State(state): State<SharedState>,
    Path(agent_id): Path<i64>,
    Query(query): Query<PageQuery>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse<Candidate>>, ApiError> {
    let page = validate_page(query.page.as_deref())?;
    let criteria = SearchCriteria::from(&request);
    let label: &'static str = RecordKind::Candidate.into();

    let outcome = state
        .service
        .search_candidates(agent_id, &criteria, page)
        .await
        .inspect_err(|_| record_search_failure(label))?;

    record_search(label, outcome.total);
    Ok(Json(SearchResponse::from_outcome(outcome, agent_id)))
}

pub async fn search_listings(
    State(state): State<SharedState>,
    Path(agent_id): Path<i64>,
    Query(query): Query<PageQuery>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse<Listing>>, ApiError> {
    let page = validate_page(query.page.as_deref())?;
    let criteria = SearchCriteria::from(&request);
    let label: &'static str = RecordKind::Listing.into();

    let outcome = state
        .service
        .search_listings(agent_id, &criteria, page)
        .await
        .inspect_err(|_| record_search_failure(label))?;

    record_search(label, outcome.total);
    Ok(Json(SearchResponse::from_outcome(outcome, agent_id)))
}
