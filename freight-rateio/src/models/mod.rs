//! Domain models for freight-rateio.

mod invoice;
mod packed_item;
mod trip;
mod validation;

pub use invoice::{Invoice, InvoiceTotals};
pub use packed_item::PackedItem;
pub use trip::{
    Allocation, AllocationBasis, Trip, TripComputation, TripConfiguration, TripStatus,
    TripSummary, TripTotals, TripWarning,
};
