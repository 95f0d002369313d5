//! Folds invoice totals into trip-level sums.

use crate::error::FreightError;
use crate::models::{InvoiceTotals, TripSummary};
use rust_decimal::Decimal;

fn add(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, FreightError> {
    a.checked_add(b).ok_or(FreightError::ArithmeticOverflow(what))
}

/// Zero invoices give a zeroed summary, not an error.
pub fn aggregate(invoices: &[InvoiceTotals]) -> Result<TripSummary, FreightError> {
    invoices
        .iter()
        .try_fold(TripSummary::default(), |acc, invoice| {
            Ok(TripSummary {
                invoice_count: acc.invoice_count + 1,
                total_weight_kg: add(acc.total_weight_kg, invoice.actual_weight_kg, "trip weight")?,
                total_volume_m3: add(acc.total_volume_m3, invoice.volume_m3, "trip volume")?,
                total_cubic_weight_kg: add(
                    acc.total_cubic_weight_kg,
                    invoice.cubic_weight_kg,
                    "trip cubic weight",
                )?,
                total_value: add(acc.total_value, invoice.declared_value, "trip value")?,
            })
        })
}
