//! Trip model: configuration, computed totals, allocations and lifecycle.

use super::validation::{non_negative, percentage};
use super::Invoice;
use crate::error::FreightError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;
use validator::Validate;

/// Operator-entered contractual parameters for one trip.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
pub struct TripConfiguration {
    #[validate(custom(function = "non_negative"))]
    pub freight_rate_per_ton: Decimal,
    #[validate(custom(function = "non_negative"))]
    pub minimum_billable_weight_kg: Decimal,
    #[validate(custom(function = "non_negative"))]
    pub toll_amount: Decimal,
    #[validate(custom(function = "percentage"))]
    pub icms_rate_percent: Decimal,
    /// Only applied when the trip is flagged express.
    #[validate(custom(function = "percentage"))]
    pub express_rate_percent: Decimal,
}

/// Which per-invoice weight drives the allocation share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationBasis {
    #[default]
    Actual,
    /// max(actual, cubic) per invoice.
    Chargeable,
}

impl AllocationBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationBasis::Actual => "actual",
            AllocationBasis::Chargeable => "chargeable",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "actual" => Some(AllocationBasis::Actual),
            "chargeable" => Some(AllocationBasis::Chargeable),
            _ => None,
        }
    }
}

/// Sums over the invoices assigned to a trip.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TripSummary {
    pub invoice_count: usize,
    pub total_weight_kg: Decimal,
    pub total_volume_m3: Decimal,
    pub total_cubic_weight_kg: Decimal,
    pub total_value: Decimal,
}

/// Trip-level monetary totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TripTotals {
    pub invoice_count: usize,
    pub total_weight_kg: Decimal,
    pub total_volume_m3: Decimal,
    pub total_cubic_weight_kg: Decimal,
    pub total_value: Decimal,
    pub considered_weight_kg: Decimal,
    pub freight_charge: Decimal,
    pub express_charge: Decimal,
    pub toll_charge: Decimal,
    pub subtotal: Decimal,
    pub icms_charge: Decimal,
    pub grand_total: Decimal,
}

/// Share of the trip total billed to one invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub invoice_id: Uuid,
    pub weight_share: Decimal,
    /// weight_share × grand_total at full precision.
    pub exact_amount: Decimal,
    /// exact_amount rounded to the allocation scale, residual reconciled.
    pub allocated_amount: Decimal,
}

/// Reasons a computed trip is not yet billable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripWarning {
    NoInvoices,
    ZeroTotalWeight,
}

impl TripWarning {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripWarning::NoInvoices => "no_invoices",
            TripWarning::ZeroTotalWeight => "zero_total_weight",
        }
    }
}

/// Output of one computation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripComputation {
    pub totals: TripTotals,
    pub allocations: Vec<Allocation>,
    pub warnings: Vec<TripWarning>,
}

impl TripComputation {
    pub fn is_billable(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn allocation_for(&self, invoice_id: Uuid) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.invoice_id == invoice_id)
    }

    pub fn allocated_sum(&self) -> Decimal {
        self.allocations.iter().map(|a| a.allocated_amount).sum()
    }
}

/// Trip lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Draft,
    Finalized,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Draft => "draft",
            TripStatus::Finalized => "finalized",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "finalized" => TripStatus::Finalized,
            _ => TripStatus::Draft,
        }
    }
}

/// One truck dispatch and the invoices riding on it.
///
/// Mutations are only accepted while the trip is in [`TripStatus::Draft`].
/// Deserialized snapshots go through the same checks as the mutators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TripSnapshot")]
pub struct Trip {
    pub trip_id: Uuid,
    status: TripStatus,
    configuration: TripConfiguration,
    is_express: bool,
    invoices: Vec<Invoice>,
    billing_record: Option<TripComputation>,
    pub created_utc: DateTime<Utc>,
    finalized_utc: Option<DateTime<Utc>>,
}

/// Wire shape of [`Trip`], checked before it becomes one.
#[derive(Deserialize)]
struct TripSnapshot {
    trip_id: Uuid,
    status: TripStatus,
    configuration: TripConfiguration,
    is_express: bool,
    invoices: Vec<Invoice>,
    billing_record: Option<TripComputation>,
    created_utc: DateTime<Utc>,
    finalized_utc: Option<DateTime<Utc>>,
}

impl TryFrom<TripSnapshot> for Trip {
    type Error = FreightError;

    fn try_from(snapshot: TripSnapshot) -> Result<Self, Self::Error> {
        let trip_id = snapshot.trip_id;
        let inconsistent =
            move |reason: &'static str| FreightError::InconsistentTrip { trip_id, reason };

        snapshot.configuration.validate()?;

        let mut seen = HashSet::new();
        if let Some(dup) = snapshot.invoices.iter().find(|i| !seen.insert(i.invoice_id)) {
            return Err(FreightError::DuplicateInvoice(dup.invoice_id));
        }

        let frozen = snapshot.billing_record.is_some() && snapshot.finalized_utc.is_some();
        let unfrozen = snapshot.billing_record.is_none() && snapshot.finalized_utc.is_none();
        match snapshot.status {
            TripStatus::Finalized if !frozen => {
                return Err(inconsistent("finalized without a billing record"));
            }
            TripStatus::Draft if !unfrozen => {
                return Err(inconsistent("draft carries a billing record"));
            }
            _ => {}
        }

        Ok(Self {
            trip_id: snapshot.trip_id,
            status: snapshot.status,
            configuration: snapshot.configuration,
            is_express: snapshot.is_express,
            invoices: snapshot.invoices,
            billing_record: snapshot.billing_record,
            created_utc: snapshot.created_utc,
            finalized_utc: snapshot.finalized_utc,
        })
    }
}

impl Trip {
    pub fn new(configuration: TripConfiguration) -> Result<Self, FreightError> {
        configuration.validate()?;
        Ok(Self {
            trip_id: Uuid::new_v4(),
            status: TripStatus::Draft,
            configuration,
            is_express: false,
            invoices: Vec::new(),
            billing_record: None,
            created_utc: Utc::now(),
            finalized_utc: None,
        })
    }

    pub fn status(&self) -> TripStatus {
        self.status
    }

    pub fn configuration(&self) -> &TripConfiguration {
        &self.configuration
    }

    pub fn is_express(&self) -> bool {
        self.is_express
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    /// Frozen computation, present once the trip is finalized.
    pub fn billing_record(&self) -> Option<&TripComputation> {
        self.billing_record.as_ref()
    }

    pub fn finalized_utc(&self) -> Option<DateTime<Utc>> {
        self.finalized_utc
    }

    fn ensure_draft(&self) -> Result<(), FreightError> {
        match self.status {
            TripStatus::Draft => Ok(()),
            TripStatus::Finalized => Err(FreightError::TripFinalized(self.trip_id)),
        }
    }

    /// Overwrite the configuration in place. Invalid values leave it untouched.
    pub fn set_configuration(&mut self, configuration: TripConfiguration) -> Result<(), FreightError> {
        self.ensure_draft()?;
        configuration.validate()?;
        self.configuration = configuration;
        Ok(())
    }

    pub fn set_express(&mut self, is_express: bool) -> Result<(), FreightError> {
        self.ensure_draft()?;
        self.is_express = is_express;
        Ok(())
    }

    pub fn add_invoice(&mut self, invoice: Invoice) -> Result<(), FreightError> {
        self.ensure_draft()?;
        if self.invoices.iter().any(|i| i.invoice_id == invoice.invoice_id) {
            return Err(FreightError::DuplicateInvoice(invoice.invoice_id));
        }
        self.invoices.push(invoice);
        Ok(())
    }

    /// Replace an assigned invoice, keeping its position on the trip.
    pub fn update_invoice(&mut self, invoice: Invoice) -> Result<(), FreightError> {
        self.ensure_draft()?;
        let slot = self
            .invoices
            .iter_mut()
            .find(|i| i.invoice_id == invoice.invoice_id)
            .ok_or(FreightError::InvoiceNotFound(invoice.invoice_id))?;
        *slot = invoice;
        Ok(())
    }

    pub fn remove_invoice(&mut self, invoice_id: Uuid) -> Result<Invoice, FreightError> {
        self.ensure_draft()?;
        let index = self
            .invoices
            .iter()
            .position(|i| i.invoice_id == invoice_id)
            .ok_or(FreightError::InvoiceNotFound(invoice_id))?;
        Ok(self.invoices.remove(index))
    }

    pub(crate) fn freeze(&mut self, record: TripComputation) -> Result<(), FreightError> {
        self.ensure_draft()?;
        self.billing_record = Some(record);
        self.status = TripStatus::Finalized;
        self.finalized_utc = Some(Utc::now());
        Ok(())
    }
}
