use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Pre-register counters so they appear even before the first increment.
    counter!("balance_reads_total").absolute(0);
    counter!("balance_writes_total").absolute(0);
    counter!("trades_logged_total").absolute(0);
    counter!("trades_closed_total").absolute(0);
    counter!("subscription_grants_total").absolute(0);
    counter!("auth_failures_total").absolute(0);
    counter!("metrics_scrapes_total").absolute(0);

    handle
}
