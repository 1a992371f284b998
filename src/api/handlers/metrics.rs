use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use metrics::counter;

use crate::AppState;

/// Prometheus scrape endpoint for the journal counters registered in
/// `crate::metrics`. Scrapes are themselves counted under
/// `metrics_scrapes_total`.
pub async fn render(State(state): State<AppState>) -> impl IntoResponse {
    counter!("metrics_scrapes_total").increment(1);

    let payload = state.metrics_handle.render();
    ([(CONTENT_TYPE, "text/plain; version=0.0.4")], payload)
}
