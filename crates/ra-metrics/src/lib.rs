use std::sync::OnceLock;

use metrics::{Unit, counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

pub const SEARCH_REQUESTS_TOTAL: &str = "ra_search_requests_total";
pub const SEARCH_RESULTS: &str = "ra_search_results";
pub const SEARCH_FAILURES_TOTAL: &str = "ra_search_failures_total";

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// `0.0.0.0:<port>` で Prometheus exporter を起動する
///
/// 2 回目以降の呼び出しは起動済みのハンドルを返す。起動に失敗したら None。
pub fn init_metrics(port: u16) -> Option<&'static PrometheusHandle> {
    if let Some(existing) = PROMETHEUS_HANDLE.get() {
        return Some(existing);
    }

    match PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install_recorder()
    {
        Ok(handle) => {
            let _ = PROMETHEUS_HANDLE.set(handle);
            describe_search_metrics();
            info!(metrics_port = port, "started prometheus exporter");
            PROMETHEUS_HANDLE.get()
        }
        Err(err) => {
            warn!(error = %err, metrics_port = port, "failed to start prometheus exporter");
            PROMETHEUS_HANDLE.get()
        }
    }
}

fn describe_search_metrics() {
    describe_counter!(SEARCH_REQUESTS_TOTAL, "Search requests by record kind");
    describe_counter!(SEARCH_FAILURES_TOTAL, "Search requests that failed upstream");
    describe_histogram!(SEARCH_RESULTS, Unit::Count, "Records left after filtering");
}

/// 検索 1 回分を記録する。exporter 未起動なら何もしない。
pub fn record_search(kind: &'static str, total: usize) {
    counter!(SEARCH_REQUESTS_TOTAL, "kind" => kind).increment(1);
    histogram!(SEARCH_RESULTS, "kind" => kind).record(total as f64);
}

pub fn record_search_failure(kind: &'static str) {
    counter!(SEARCH_FAILURES_TOTAL, "kind" => kind).increment(1);
}
