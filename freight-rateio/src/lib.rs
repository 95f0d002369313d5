//! Freight cost allocation engine.
//!
//! Consolidates the invoices riding on one truck trip, prices the trip from
//! its contractual parameters and splits the total back across the invoices
//! by weight share.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::FreightConfig;
pub use error::FreightError;
pub use services::{compute_trip, RateioEngine};

use logistics_core::observability::init_tracing;

/// Install logging and metrics from `config` and build the engine it describes.
///
/// Safe to call more than once; the first tracing subscriber stays installed.
pub fn init(config: &FreightConfig) -> RateioEngine {
    init_tracing(
        &config.service_name,
        &config.common.log_level,
        config.common.log_format,
    );
    services::init_metrics();

    tracing::info!(
        service_name = %config.service_name,
        cubic_weight_factor = %config.cubic_weight_factor,
        allocation_scale = config.allocation_scale,
        allocation_basis = config.allocation_basis.as_str(),
        "Rateio engine initialized"
    );

    RateioEngine::new(config)
}
