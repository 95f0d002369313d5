//! Packing list line model.

use super::validation::{non_negative, positive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One line of an invoice packing list. Dimensions are in centimeters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
pub struct PackedItem {
    #[validate(custom(function = "positive"))]
    pub height_cm: Decimal,
    #[validate(custom(function = "positive"))]
    pub width_cm: Decimal,
    #[validate(custom(function = "positive"))]
    pub length_cm: Decimal,
    #[validate(range(min = 1))]
    pub quantity: u32,
    #[validate(custom(function = "non_negative"))]
    pub unit_weight_kg: Decimal,
}

impl PackedItem {
    pub fn new(
        height_cm: Decimal,
        width_cm: Decimal,
        length_cm: Decimal,
        quantity: u32,
        unit_weight_kg: Decimal,
    ) -> Self {
        Self {
            height_cm,
            width_cm,
            length_cm,
            quantity,
            unit_weight_kg,
        }
    }
}
