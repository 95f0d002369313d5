//! Domain errors for freight-rateio.

use logistics_core::error::AppError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

/// Input rejected before a computation pass runs.
///
/// Zero invoices or a zero-weight trip are not errors; those surface as
/// [`crate::models::TripWarning`]s on the computation.
#[derive(Debug, Error)]
pub enum FreightError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{field} must be greater than zero (got {value})")]
    NonPositiveDimension { field: &'static str, value: Decimal },

    #[error("quantity must be at least 1 (got {0})")]
    NonPositiveQuantity(u32),

    #[error("invoice {invoice_id} has negative weight {value}")]
    NegativeWeight { invoice_id: Uuid, value: Decimal },

    #[error("invoice {invoice_id} has negative declared value {value}")]
    NegativeDeclaredValue { invoice_id: Uuid, value: Decimal },

    #[error("invoice {0} is already assigned to this trip")]
    DuplicateInvoice(Uuid),

    #[error("invoice {0} is not assigned to this trip")]
    InvoiceNotFound(Uuid),

    #[error("trip {0} is finalized")]
    TripFinalized(Uuid),

    #[error("arithmetic overflow computing {0}")]
    ArithmeticOverflow(&'static str),

    #[error("trip {trip_id} snapshot is inconsistent: {reason}")]
    InconsistentTrip { trip_id: Uuid, reason: &'static str },
}

impl FreightError {
    /// Input fields blamed by this error, used for metrics labels.
    pub fn fields(&self) -> Vec<String> {
        match self {
            FreightError::Validation(errs) => {
                let mut fields: Vec<String> =
                    errs.field_errors().keys().map(|k| k.to_string()).collect();
                fields.sort();
                fields
            }
            FreightError::NonPositiveDimension { field, .. } => vec![field.to_string()],
            FreightError::NonPositiveQuantity(_) => vec!["quantity".to_string()],
            FreightError::NegativeWeight { .. } => vec!["actual_weight_kg".to_string()],
            FreightError::NegativeDeclaredValue { .. } => vec!["declared_value".to_string()],
            _ => Vec::new(),
        }
    }

    /// True when the caller's input was at fault rather than trip state or
    /// arithmetic limits.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            FreightError::TripFinalized(_)
                | FreightError::DuplicateInvoice(_)
                | FreightError::InvoiceNotFound(_)
                | FreightError::ArithmeticOverflow(_)
                | FreightError::InconsistentTrip { .. }
        )
    }
}

impl From<FreightError> for AppError {
    fn from(err: FreightError) -> Self {
        match err {
            FreightError::Validation(errs) => AppError::ValidationError(errs),
            FreightError::ArithmeticOverflow(_) | FreightError::InconsistentTrip { .. } => {
                AppError::InternalError(anyhow::Error::new(err))
            }
            other => AppError::BadRequest(anyhow::Error::new(other)),
        }
    }
}
