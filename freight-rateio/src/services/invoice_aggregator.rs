//! Folds an invoice's packing list into per-invoice totals.

use crate::error::FreightError;
use crate::models::{Invoice, InvoiceTotals};
use crate::services::volume::{cubic_weight, volume_of};
use rust_decimal::Decimal;
use validator::Validate;

#[derive(Debug, Clone)]
pub struct InvoiceAggregator {
    cubic_weight_factor: Decimal,
}

impl InvoiceAggregator {
    pub fn new(cubic_weight_factor: Decimal) -> Self {
        Self {
            cubic_weight_factor,
        }
    }

    /// An empty packing list yields zero totals; the override weight, if
    /// any, still applies.
    #[tracing::instrument(
        skip(self, invoice),
        fields(invoice_id = %invoice.invoice_id, items = invoice.items.len())
    )]
    pub fn aggregate(&self, invoice: &Invoice) -> Result<InvoiceTotals, FreightError> {
        if invoice.declared_value.is_sign_negative() && !invoice.declared_value.is_zero() {
            return Err(FreightError::NegativeDeclaredValue {
                invoice_id: invoice.invoice_id,
                value: invoice.declared_value,
            });
        }

        let mut volume_count: u64 = 0;
        let mut volume_m3 = Decimal::ZERO;
        let mut itemised_weight_kg = Decimal::ZERO;

        for item in &invoice.items {
            item.validate()?;
            volume_count += u64::from(item.quantity);
            volume_m3 = volume_m3
                .checked_add(volume_of(item)?)
                .ok_or(FreightError::ArithmeticOverflow("invoice volume"))?;
            let line_weight = item
                .unit_weight_kg
                .checked_mul(Decimal::from(item.quantity))
                .ok_or(FreightError::ArithmeticOverflow("invoice weight"))?;
            itemised_weight_kg = itemised_weight_kg
                .checked_add(line_weight)
                .ok_or(FreightError::ArithmeticOverflow("invoice weight"))?;
        }

        let actual_weight_kg = invoice.weight_override_kg.unwrap_or(itemised_weight_kg);
        if actual_weight_kg.is_sign_negative() && !actual_weight_kg.is_zero() {
            return Err(FreightError::NegativeWeight {
                invoice_id: invoice.invoice_id,
                value: actual_weight_kg,
            });
        }

        let totals = InvoiceTotals {
            invoice_id: invoice.invoice_id,
            volume_count,
            volume_m3,
            actual_weight_kg,
            cubic_weight_kg: cubic_weight(volume_m3, self.cubic_weight_factor)?,
            declared_value: invoice.declared_value,
        };

        tracing::debug!(
            volume_count = totals.volume_count,
            volume = %totals.volume_m3,
            actual_weight_kg = %totals.actual_weight_kg,
            overridden = invoice.weight_override_kg.is_some(),
            "Invoice aggregated"
        );

        Ok(totals)
    }
}
