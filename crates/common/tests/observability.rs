use metrics_exporter_prometheus::PrometheusBuilder;

// Integration test: goes through the public `common::observability` surface only.

#[test]
fn tracing_error_events_counter_increments_on_error_event() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    metrics::with_local_recorder(&recorder, || {
        let (dispatch, _otel_guard) = common::observability::build_dispatch("test-service", "info");

        tracing::dispatcher::with_default(&dispatch, || {
            tracing::warn!(wallet = "Binance14", "not counted");
            tracing::error!(wallet = "Whale_0x7f3a", "boom");
        });
    });

    let rendered = handle.render();
    assert!(
        rendered.contains("tracing_error_events 1"),
        "expected exactly one tracing_error_events, got:\n{rendered}"
    );
}
