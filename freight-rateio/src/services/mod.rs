//! Services module for freight-rateio.

pub mod invoice_aggregator;
pub mod metrics;
pub mod rateio;
pub mod trip_aggregator;
pub mod volume;

pub use invoice_aggregator::InvoiceAggregator;
pub use metrics::{get_metrics, init_metrics};
pub use rateio::{compute_trip, RateioEngine};
pub use volume::{cubic_weight, volume_of};
