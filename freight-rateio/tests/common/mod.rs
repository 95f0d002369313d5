//! Test helper module for freight-rateio integration tests.
//!
//! Provides shared fixtures for trips, invoices and configurations.

#![allow(dead_code)]

use freight_rateio::models::{Invoice, InvoiceTotals, PackedItem, TripConfiguration};
use freight_rateio::FreightConfig;
use logistics_core::config::{Config, LogFormat};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Once;
use uuid::Uuid;

static INIT: Once = Once::new();

/// Install logging and metrics once per test binary.
pub fn setup() {
    INIT.call_once(|| {
        freight_rateio::init(&FreightConfig {
            common: Config {
                log_level: "warn".to_string(),
                log_format: LogFormat::Pretty,
            },
            service_name: "freight-rateio-test".to_string(),
            ..FreightConfig::default()
        });
    });
}

/// Contract used by the worked examples: 50/ton, 1000 kg minimum, 20 toll,
/// 10% ICMS, 20% express.
pub fn contract() -> TripConfiguration {
    TripConfiguration {
        freight_rate_per_ton: dec!(50),
        minimum_billable_weight_kg: dec!(1000),
        toll_amount: dec!(20),
        icms_rate_percent: dec!(10),
        express_rate_percent: dec!(20),
    }
}

/// Invoice totals carrying only a weight.
pub fn weighed(kg: Decimal) -> InvoiceTotals {
    InvoiceTotals::from_weight(Uuid::new_v4(), kg)
}

pub fn weighed_all(kgs: &[Decimal]) -> Vec<InvoiceTotals> {
    kgs.iter().copied().map(weighed).collect()
}

/// A box of `quantity` units, each `unit_weight_kg`.
pub fn boxed(
    height_cm: Decimal,
    width_cm: Decimal,
    length_cm: Decimal,
    quantity: u32,
    unit_weight_kg: Decimal,
) -> PackedItem {
    PackedItem::new(height_cm, width_cm, length_cm, quantity, unit_weight_kg)
}

/// Invoice with one packing line totalling `kg`.
pub fn invoice_weighing(number: &str, kg: Decimal) -> Invoice {
    Invoice::new(number, dec!(1000)).with_items(vec![boxed(dec!(50), dec!(40), dec!(30), 1, kg)])
}

/// Sum-invariant bound: 0.01 per invoice.
pub fn tolerance(invoice_count: usize) -> Decimal {
    dec!(0.01) * Decimal::from(invoice_count.max(1))
}
