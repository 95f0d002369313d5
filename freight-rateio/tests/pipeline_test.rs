//! Integration tests for the packed item → invoice → trip pipeline.

mod common;

use common::{boxed, contract, setup};
use freight_rateio::config::FreightConfig;
use freight_rateio::models::{Invoice, InvoiceTotals};
use freight_rateio::services::trip_aggregator;
use freight_rateio::{FreightError, RateioEngine};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn packing_lists_flow_into_allocations() {
    setup();
    let engine = RateioEngine::default();

    let pallets = Invoice::new("NF-2001", dec!(12500)).with_items(vec![
        boxed(dec!(120), dec!(100), dec!(80), 2, dec!(150)),
        boxed(dec!(40), dec!(30), dec!(30), 10, dec!(6)),
    ]);
    let manual = Invoice::new("NF-2002", dec!(800)).with_weight_override(dec!(240));

    let totals: Vec<InvoiceTotals> = [&pallets, &manual]
        .iter()
        .map(|invoice| engine.aggregate_invoice(invoice))
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(totals[0].volume_count, 12);
    assert_eq!(totals[0].volume_m3, dec!(2280000));
    assert_eq!(totals[0].actual_weight_kg, dec!(360));
    assert_eq!(totals[1].volume_count, 0);
    assert_eq!(totals[1].actual_weight_kg, dec!(240));

    let summary = trip_aggregator::aggregate(&totals).unwrap();
    assert_eq!(summary.invoice_count, 2);
    assert_eq!(summary.total_weight_kg, dec!(600));
    assert_eq!(summary.total_value, dec!(13300));

    let result = engine.compute_trip(&totals, &contract(), false).unwrap();
    assert_eq!(result.totals.grand_total, dec!(77));
    assert_eq!(result.totals.total_volume_m3, dec!(2280000));

    let first = result.allocation_for(pallets.invoice_id).unwrap();
    let second = result.allocation_for(manual.invoice_id).unwrap();
    assert_eq!(first.weight_share, dec!(0.6));
    assert_eq!(first.allocated_amount, dec!(46.20));
    assert_eq!(second.allocated_amount, dec!(30.80));
}

#[test]
fn cubic_weight_uses_configured_factor() {
    setup();
    let engine = RateioEngine::new(&FreightConfig {
        cubic_weight_factor: dec!(0.0003),
        ..FreightConfig::default()
    });
    let invoice =
        Invoice::new("NF-2003", dec!(0)).with_items(vec![boxed(dec!(100), dec!(100), dec!(100), 1, dec!(50))]);

    let totals = engine.aggregate_invoice(&invoice).unwrap();
    assert_eq!(totals.volume_m3, dec!(1000000));
    assert_eq!(totals.cubic_weight_kg, dec!(300));
    assert_eq!(totals.chargeable_weight_kg(), dec!(300));
}

#[test]
fn bad_packing_line_stops_the_pipeline() {
    setup();
    let engine = RateioEngine::default();
    let invoice = Invoice::new("NF-2004", dec!(10))
        .with_items(vec![boxed(dec!(10), dec!(10), dec!(10), 0, dec!(1))]);

    let err = engine.aggregate_invoice(&invoice).unwrap_err();
    assert!(matches!(err, FreightError::Validation(_)));
    assert_eq!(err.fields(), vec!["quantity"]);
}

#[test]
fn memo_key_lets_callers_skip_reaggregation() {
    setup();
    let engine = RateioEngine::default();
    let invoice = Invoice::new("NF-2005", dec!(10))
        .with_items(vec![boxed(dec!(10), dec!(10), dec!(10), 3, dec!(2))]);

    let key = invoice.content_key();
    let cached = engine.aggregate_invoice(&invoice).unwrap();

    let untouched = invoice.clone();
    assert_eq!(untouched.content_key(), key);
    assert_eq!(engine.aggregate_invoice(&untouched).unwrap(), cached);

    let mut edited = invoice;
    edited.items[0].quantity = 4;
    assert_ne!(edited.content_key(), key);
    assert_eq!(
        engine.aggregate_invoice(&edited).unwrap().actual_weight_kg,
        dec!(8)
    );
    assert_eq!(cached.actual_weight_kg, Decimal::from(6));
}
