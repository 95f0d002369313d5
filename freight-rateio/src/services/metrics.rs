//! Prometheus metrics for freight-rateio.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_histogram, Counter, CounterVec, Histogram,
    TextEncoder,
};

/// Counter for computation passes by outcome.
pub static COMPUTATIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "rateio_computations_total",
        "Total number of trip computation passes",
        &["status"] // ok, rejected, failed
    )
    .expect("Failed to register COMPUTATIONS")
});

/// Histogram for computation pass duration.
pub static COMPUTATION_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "rateio_computation_duration_seconds",
        "Trip computation duration in seconds",
        vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]
    )
    .expect("Failed to register COMPUTATION_DURATION")
});

/// Counter for rejected inputs by offending field.
pub static VALIDATION_FAILURES: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "rateio_validation_failures_total",
        "Total number of validation failures by field",
        &["field"]
    )
    .expect("Failed to register VALIDATION_FAILURES")
});

/// Counter for trips computed while not yet billable.
pub static DEGENERATE_TRIPS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "rateio_degenerate_trips_total",
        "Total number of computations flagged as not billable",
        &["reason"]
    )
    .expect("Failed to register DEGENERATE_TRIPS")
});

/// Counter for finalized trips.
pub static TRIPS_FINALIZED: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "rateio_trips_finalized_total",
        "Total number of trips finalized"
    )
    .expect("Failed to register TRIPS_FINALIZED")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&COMPUTATIONS);
    Lazy::force(&COMPUTATION_DURATION);
    Lazy::force(&VALIDATION_FAILURES);
    Lazy::force(&DEGENERATE_TRIPS);
    Lazy::force(&TRIPS_FINALIZED);
}

/// Get all metrics as Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}

/// Record a computation pass.
pub fn record_computation(status: &str, duration_secs: f64) {
    COMPUTATIONS.with_label_values(&[status]).inc();
    COMPUTATION_DURATION.observe(duration_secs);
}

/// Record a validation failure for a field.
pub fn record_validation_failure(field: &str) {
    VALIDATION_FAILURES.with_label_values(&[field]).inc();
}

/// Record a not-yet-billable computation.
pub fn record_degenerate_trip(reason: &str) {
    DEGENERATE_TRIPS.with_label_values(&[reason]).inc();
}

/// Record a trip finalization.
pub fn record_trip_finalized() {
    TRIPS_FINALIZED.inc();
}
