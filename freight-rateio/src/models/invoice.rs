//! Invoice (nota fiscal) model.

use super::PackedItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// A shipment record riding on a trip, with its own packing list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: Uuid,
    pub invoice_number: String,
    pub declared_value: Decimal,
    /// Operator-entered weight; replaces the itemised weight when present.
    pub weight_override_kg: Option<Decimal>,
    pub items: Vec<PackedItem>,
}

impl Invoice {
    pub fn new(invoice_number: impl Into<String>, declared_value: Decimal) -> Self {
        Self {
            invoice_id: Uuid::new_v4(),
            invoice_number: invoice_number.into(),
            declared_value,
            weight_override_kg: None,
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<PackedItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_weight_override(mut self, weight_kg: Decimal) -> Self {
        self.weight_override_kg = Some(weight_kg);
        self
    }

    /// Stable key over the inputs that drive aggregation (items and override).
    ///
    /// Equal keys mean the cached [`InvoiceTotals`] can be reused.
    pub fn content_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.items.hash(&mut hasher);
        self.weight_override_kg.hash(&mut hasher);
        self.declared_value.hash(&mut hasher);
        hasher.finish()
    }
}

/// Per-invoice totals folded from its packed items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub invoice_id: Uuid,
    pub volume_count: u64,
    /// Volume score in cm³ (no m³ conversion).
    pub volume_m3: Decimal,
    pub actual_weight_kg: Decimal,
    pub cubic_weight_kg: Decimal,
    pub declared_value: Decimal,
}

impl InvoiceTotals {
    /// Totals for an invoice known only by its weight.
    pub fn from_weight(invoice_id: Uuid, actual_weight_kg: Decimal) -> Self {
        Self {
            invoice_id,
            volume_count: 0,
            volume_m3: Decimal::ZERO,
            actual_weight_kg,
            cubic_weight_kg: Decimal::ZERO,
            declared_value: Decimal::ZERO,
        }
    }

    /// Greater of actual and cubic weight.
    pub fn chargeable_weight_kg(&self) -> Decimal {
        self.actual_weight_kg.max(self.cubic_weight_kg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: u32) -> PackedItem {
        PackedItem::new(dec!(10), dec!(10), dec!(10), quantity, dec!(2))
    }

    #[test]
    fn content_key_tracks_items_and_override() {
        let invoice = Invoice::new("NF-1", dec!(100)).with_items(vec![item(1)]);
        let same = invoice.clone();
        assert_eq!(invoice.content_key(), same.content_key());

        let more = invoice.clone().with_items(vec![item(2)]);
        assert_ne!(invoice.content_key(), more.content_key());

        let overridden = invoice.clone().with_weight_override(dec!(50));
        assert_ne!(invoice.content_key(), overridden.content_key());
    }

    #[test]
    fn content_key_ignores_trailing_zeros() {
        let a = Invoice::new("NF-1", dec!(100)).with_weight_override(dec!(50));
        let mut b = a.clone();
        b.weight_override_kg = Some(dec!(50.00));
        assert_eq!(a.content_key(), b.content_key());
    }

    #[test]
    fn chargeable_weight_is_max_of_actual_and_cubic() {
        let mut totals = InvoiceTotals::from_weight(Uuid::new_v4(), dec!(120));
        totals.cubic_weight_kg = dec!(90);
        assert_eq!(totals.chargeable_weight_kg(), dec!(120));

        totals.cubic_weight_kg = dec!(150);
        assert_eq!(totals.chargeable_weight_kg(), dec!(150));
    }
}
