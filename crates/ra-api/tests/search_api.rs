use std::{
    collections::{BTreeSet, HashSet},
    sync::{Arc, atomic::AtomicBool},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use ra_api::{AppConfig, AppState};
use ra_common::{
    Candidate, Listing,
    matching::{EquivalenceTable, TenantGate},
    repository::{RecordKind, RecordRepository, RepositoryError, Snapshot},
    search::{SearchEngine, SearchService},
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn tanaka(id: i64, agent_id: i64) -> Candidate {
    Candidate {
        id,
        agent_id,
        last_name: Some("田中".into()),
        last_name_kana: Some("タナカ".into()),
        first_name_kana: Some("タロウ".into()),
        phone_number: Some("080-0000-0000".into()),
        gender: Some("男性".into()),
        qualifications: vec!["日商簿記検定1級".into()],
        ..Candidate::default()
    }
}

fn snapshot() -> Snapshot {
    let mut candidates: Vec<Candidate> = (1..=45)
        .map(|id| Candidate {
            id,
            agent_id: 10,
            gender: Some(if id <= 30 { "男性" } else { "女性" }.into()),
            ..Candidate::default()
        })
        .collect();
    candidates.push(tanaka(100, 20));
    candidates.push(tanaka(101, 30));

    serde_json::from_value(json!({
        "candidates": candidates,
        "listings": [
            {"id": 1, "agent_id": 10, "income_lower": 400, "income_upper": 600, "work_locations": ["東京都"]},
            {"id": 2, "agent_id": 10, "work_locations": ["大阪府"]}
        ],
        "alliances": [
            {"agent_id": 10, "allied_agent_id": 20},
            {"agent_id": 10, "allied_agent_id": 30}
        ],
        "visibility_exceptions": [
            {"kind": "candidate", "record_id": 45, "agent_id": 10}
        ]
    }))
    .unwrap()
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn empty_criteria_pages_every_visible_candidate() {
    let app = ra_api::create_router(ra_api::test_state_with(snapshot()));

    let (status, body) = post_json(app, "/api/agents/10/candidates/search?page=3", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    // 45 own (1 hidden) + 2 allied duplicates
    assert_eq!(body["total"], 46);
    assert_eq!(body["max_page"], 3);
    assert_eq!(body["page"], 3);
    assert_eq!(body["hits"].as_array().unwrap().len(), 6);
    assert_eq!(body["own_ids"].as_array().unwrap().len(), 44);
    assert_eq!(body["allied_ids"], json!([100, 101]));
}

#[tokio::test]
async fn duplicates_are_flagged_and_other_tenants_scrubbed() {
    let app = ra_api::create_router(ra_api::test_state_with(snapshot()));

    let (status, body) = post_json(
        app,
        "/api/agents/10/candidates/search",
        json!({ "qualifications": ["日商簿記検定2級"] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let hits = body["hits"].as_array().unwrap();
    assert_eq!(hits.len(), 2);
    for hit in hits {
        assert_eq!(hit["duplicate"], true);
        assert_eq!(hit["own"], false);
        assert!(hit["phone_number"].is_null());
        assert!(hit["last_name"].is_null());
    }
}

#[tokio::test]
async fn facets_and_bounds_narrow_listings() {
    let app = ra_api::create_router(ra_api::test_state_with(snapshot()));

    let (status, body) = post_json(
        app,
        "/api/agents/10/listings/search?page=abc",
        json!({ "work_locations": ["関東"], "income_lower": "500" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["all_ids"], json!([1]));
    assert_eq!(body["page"], 1);
}

#[tokio::test]
async fn gender_filter_applies_before_pagination() {
    let app = ra_api::create_router(ra_api::test_state_with(snapshot()));

    let (_, body) = post_json(
        app,
        "/api/agents/10/candidates/search?page=2",
        json!({ "genders": ["女"] }),
    )
    .await;

    // 31..=44 are female and visible
    assert_eq!(body["total"], 14);
    assert_eq!(body["max_page"], 1);
    assert_eq!(body["hits"].as_array().unwrap().len(), 14);
}

struct UnavailableRepository;

#[async_trait]
impl RecordRepository for UnavailableRepository {
    async fn fetch_candidates(&self, _agent_id: i64) -> Result<Vec<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("postgres://ra@db:5432 refused".into()))
    }

    async fn fetch_listings(&self, _agent_id: i64) -> Result<Vec<Listing>, RepositoryError> {
        Err(RepositoryError::Unavailable("postgres://ra@db:5432 refused".into()))
    }

    async fn hidden_record_ids(
        &self,
        _kind: RecordKind,
        _agent_id: i64,
    ) -> Result<HashSet<i64>, RepositoryError> {
        Ok(HashSet::new())
    }

    async fn allied_agent_ids(&self, _agent_id: i64) -> Result<BTreeSet<i64>, RepositoryError> {
        Ok(BTreeSet::new())
    }
}

#[tokio::test]
async fn upstream_failure_is_a_sanitized_500() {
    let state = Arc::new(AppState {
        service: SearchService::new(
            Arc::new(UnavailableRepository),
            SearchEngine::new(EquivalenceTable::builtin(), TenantGate::default()),
        ),
        config: AppConfig::for_tests(),
        readiness: Arc::new(AtomicBool::new(true)),
    });
    let app = ra_api::create_router(state);

    let (status, body) = post_json(app, "/api/agents/10/listings/search", json!({})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "upstream_error");
    assert_eq!(body["message"], "internal server error");
    assert!(body["request_id"].is_string());
}
