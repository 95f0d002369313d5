//! Trip charge computation and proportional cost allocation (rateio).
//!
//! A pass is a pure function of its inputs: trip totals are layered as
//! freight → express (on freight only) → toll → ICMS (on everything), then the
//! grand total is split across invoices by weight share.

use crate::config::FreightConfig;
use crate::error::FreightError;
use crate::models::{
    Allocation, AllocationBasis, Invoice, InvoiceTotals, Trip, TripComputation,
    TripConfiguration, TripStatus, TripSummary, TripTotals, TripWarning,
};
use crate::services::invoice_aggregator::InvoiceAggregator;
use crate::services::metrics::{
    record_computation, record_degenerate_trip, record_trip_finalized, record_validation_failure,
};
use crate::services::trip_aggregator;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::time::Instant;
use validator::Validate;

const KG_PER_TON: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

fn mul(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, FreightError> {
    a.checked_mul(b).ok_or(FreightError::ArithmeticOverflow(what))
}

fn add(a: Decimal, b: Decimal, what: &'static str) -> Result<Decimal, FreightError> {
    a.checked_add(b).ok_or(FreightError::ArithmeticOverflow(what))
}

fn percent_of(
    base: Decimal,
    rate_percent: Decimal,
    what: &'static str,
) -> Result<Decimal, FreightError> {
    mul(base, rate_percent / Decimal::ONE_HUNDRED, what)
}

#[derive(Debug, Clone)]
pub struct RateioEngine {
    invoice_aggregator: InvoiceAggregator,
    allocation_scale: u32,
    allocation_basis: AllocationBasis,
}

impl Default for RateioEngine {
    fn default() -> Self {
        Self::new(&FreightConfig::default())
    }
}

impl RateioEngine {
    pub fn new(config: &FreightConfig) -> Self {
        Self {
            invoice_aggregator: InvoiceAggregator::new(config.cubic_weight_factor),
            allocation_scale: config.allocation_scale,
            allocation_basis: config.allocation_basis,
        }
    }

    pub fn aggregate_invoice(&self, invoice: &Invoice) -> Result<InvoiceTotals, FreightError> {
        self.invoice_aggregator.aggregate(invoice)
    }

    /// Run one full pass over a snapshot of the trip's invoices.
    ///
    /// Input is validated up front; on success every invoice gets exactly one
    /// allocation, in input order.
    #[tracing::instrument(skip(self, invoices, config), fields(invoices = invoices.len()))]
    pub fn compute_trip(
        &self,
        invoices: &[InvoiceTotals],
        config: &TripConfiguration,
        is_express: bool,
    ) -> Result<TripComputation, FreightError> {
        let start = Instant::now();
        let result = self.run_pass(invoices, config, is_express);
        let elapsed = start.elapsed().as_secs_f64();

        match &result {
            Ok(computation) => {
                record_computation("ok", elapsed);
                for warning in &computation.warnings {
                    record_degenerate_trip(warning.as_str());
                    tracing::warn!(
                        reason = warning.as_str(),
                        grand_total = %computation.totals.grand_total,
                        "Trip is not billable yet"
                    );
                }
            }
            Err(e) => {
                let status = if e.is_validation() { "rejected" } else { "failed" };
                record_computation(status, elapsed);
                for field in e.fields() {
                    record_validation_failure(&field);
                }
                tracing::debug!(error = %e, status, "Trip computation did not complete");
            }
        }

        result
    }

    /// Aggregate every invoice on the trip and compute it.
    pub fn recompute(&self, trip: &Trip) -> Result<TripComputation, FreightError> {
        let totals = trip
            .invoices()
            .iter()
            .map(|invoice| self.aggregate_invoice(invoice))
            .collect::<Result<Vec<_>, _>>()?;
        self.compute_trip(&totals, trip.configuration(), trip.is_express())
    }

    /// Run a final pass and freeze it as the trip's billing record.
    pub fn finalize<'a>(&self, trip: &'a mut Trip) -> Result<&'a TripComputation, FreightError> {
        if trip.status() == TripStatus::Finalized {
            return Err(FreightError::TripFinalized(trip.trip_id));
        }
        let record = self.recompute(trip)?;
        trip.freeze(record)?;
        record_trip_finalized();

        tracing::info!(trip_id = %trip.trip_id, "Trip finalized");

        trip.billing_record()
            .ok_or(FreightError::TripFinalized(trip.trip_id))
    }

    fn validate(invoices: &[InvoiceTotals], config: &TripConfiguration) -> Result<(), FreightError> {
        config.validate()?;
        for invoice in invoices {
            if invoice.actual_weight_kg.is_sign_negative() && !invoice.actual_weight_kg.is_zero() {
                return Err(FreightError::NegativeWeight {
                    invoice_id: invoice.invoice_id,
                    value: invoice.actual_weight_kg,
                });
            }
            if invoice.declared_value.is_sign_negative() && !invoice.declared_value.is_zero() {
                return Err(FreightError::NegativeDeclaredValue {
                    invoice_id: invoice.invoice_id,
                    value: invoice.declared_value,
                });
            }
        }
        Ok(())
    }

    fn run_pass(
        &self,
        invoices: &[InvoiceTotals],
        config: &TripConfiguration,
        is_express: bool,
    ) -> Result<TripComputation, FreightError> {
        Self::validate(invoices, config)?;

        let summary = trip_aggregator::aggregate(invoices)?;

        if summary.invoice_count == 0 {
            return Ok(TripComputation {
                totals: TripTotals::default(),
                allocations: Vec::new(),
                warnings: vec![TripWarning::NoInvoices],
            });
        }

        let totals = Self::charges(&summary, config, is_express)?;
        let basis_total = self.basis_total(invoices)?;
        let allocations = self.allocate(invoices, basis_total, totals.grand_total)?;

        let mut warnings = Vec::new();
        // Same condition that triggers the equal split.
        if basis_total.is_zero() {
            warnings.push(TripWarning::ZeroTotalWeight);
        }

        Ok(TripComputation {
            totals,
            allocations,
            warnings,
        })
    }

    fn charges(
        summary: &TripSummary,
        config: &TripConfiguration,
        is_express: bool,
    ) -> Result<TripTotals, FreightError> {
        let considered_weight_kg = summary
            .total_weight_kg
            .max(config.minimum_billable_weight_kg);

        let freight_charge = mul(
            considered_weight_kg / KG_PER_TON,
            config.freight_rate_per_ton,
            "freight_charge",
        )?;

        // Surcharge base is the freight charge alone.
        let express_charge = if is_express {
            percent_of(freight_charge, config.express_rate_percent, "express_charge")?
        } else {
            Decimal::ZERO
        };

        let toll_charge = config.toll_amount;

        let subtotal = add(
            add(freight_charge, express_charge, "subtotal")?,
            toll_charge,
            "subtotal",
        )?;

        let icms_charge = percent_of(subtotal, config.icms_rate_percent, "icms_charge")?;
        let grand_total = add(subtotal, icms_charge, "grand_total")?;

        tracing::debug!(
            considered_weight_kg = %considered_weight_kg,
            freight_charge = %freight_charge,
            express_charge = %express_charge,
            toll_charge = %toll_charge,
            icms_charge = %icms_charge,
            grand_total = %grand_total,
            "Trip charges computed"
        );

        Ok(TripTotals {
            invoice_count: summary.invoice_count,
            total_weight_kg: summary.total_weight_kg,
            total_volume_m3: summary.total_volume_m3,
            total_cubic_weight_kg: summary.total_cubic_weight_kg,
            total_value: summary.total_value,
            considered_weight_kg,
            freight_charge,
            express_charge,
            toll_charge,
            subtotal,
            icms_charge,
            grand_total,
        })
    }

    fn basis_weight(&self, invoice: &InvoiceTotals) -> Decimal {
        match self.allocation_basis {
            AllocationBasis::Actual => invoice.actual_weight_kg,
            AllocationBasis::Chargeable => invoice.chargeable_weight_kg(),
        }
    }

    fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.allocation_scale, RoundingStrategy::MidpointAwayFromZero)
    }

    fn truncate(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.allocation_scale, RoundingStrategy::ToZero)
    }

    fn basis_total(&self, invoices: &[InvoiceTotals]) -> Result<Decimal, FreightError> {
        invoices.iter().try_fold(Decimal::ZERO, |acc, invoice| {
            add(acc, self.basis_weight(invoice), "allocation basis")
        })
    }

    /// Split `grand_total` by weight share, falling back to an equal split
    /// when `basis_total` is zero.
    ///
    /// Rounded amounts sum to the rounded grand total (largest remainder):
    /// every amount starts truncated to the allocation scale and the missing
    /// units go one each to the largest truncation remainders, earliest on
    /// ties. No amount moves more than one unit from its exact value.
    fn allocate(
        &self,
        invoices: &[InvoiceTotals],
        basis_total: Decimal,
        grand_total: Decimal,
    ) -> Result<Vec<Allocation>, FreightError> {
        if invoices.is_empty() {
            return Ok(Vec::new());
        }

        let equal_share = Decimal::ONE / Decimal::from(invoices.len());

        let mut allocations = invoices
            .iter()
            .map(|invoice| {
                let weight_share = if basis_total.is_zero() {
                    equal_share
                } else {
                    self.basis_weight(invoice) / basis_total
                };
                let exact_amount = mul(weight_share, grand_total, "allocation")?;
                Ok(Allocation {
                    invoice_id: invoice.invoice_id,
                    weight_share,
                    exact_amount,
                    allocated_amount: self.truncate(exact_amount),
                })
            })
            .collect::<Result<Vec<_>, FreightError>>()?;

        let unit = Decimal::new(1, self.allocation_scale);
        let truncated_sum = allocations.iter().try_fold(Decimal::ZERO, |acc, a| {
            add(acc, a.allocated_amount, "allocation residual")
        })?;
        let residual = self.round(grand_total) - truncated_sum;
        let units = (residual / unit).trunc().to_usize().unwrap_or(0);

        if units > 0 {
            let mut order: Vec<usize> = (0..allocations.len()).collect();
            // Stable sort keeps input order among equal remainders.
            order.sort_by(|&a, &b| {
                let rem_a = allocations[a].exact_amount - allocations[a].allocated_amount;
                let rem_b = allocations[b].exact_amount - allocations[b].allocated_amount;
                rem_b.cmp(&rem_a)
            });
            for &index in order.iter().take(units) {
                allocations[index].allocated_amount += unit;
            }
            tracing::debug!(residual = %residual, units, "Rounding residual reconciled");
        }

        Ok(allocations)
    }
}

/// One pass with the default engine settings.
pub fn compute_trip(
    invoices: &[InvoiceTotals],
    config: &TripConfiguration,
    is_express: bool,
) -> Result<TripComputation, FreightError> {
    RateioEngine::default().compute_trip(invoices, config, is_express)
}
