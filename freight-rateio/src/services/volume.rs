//! Physical volume and cubic weight of packed items.
//!
//! Volumes stay in the cm³ basis of the dimensions; nothing here converts to
//! m³. The cubic weight factor is calibrated against that basis.

use crate::error::FreightError;
use crate::models::PackedItem;
use rust_decimal::Decimal;

/// height × width × length × quantity.
///
/// Rejects non-positive dimensions or quantity; does not clamp.
pub fn volume_of(item: &PackedItem) -> Result<Decimal, FreightError> {
    for (field, value) in [
        ("height_cm", item.height_cm),
        ("width_cm", item.width_cm),
        ("length_cm", item.length_cm),
    ] {
        if value <= Decimal::ZERO {
            return Err(FreightError::NonPositiveDimension { field, value });
        }
    }
    if item.quantity == 0 {
        return Err(FreightError::NonPositiveQuantity(item.quantity));
    }

    item.height_cm
        .checked_mul(item.width_cm)
        .and_then(|v| v.checked_mul(item.length_cm))
        .and_then(|v| v.checked_mul(Decimal::from(item.quantity)))
        .ok_or(FreightError::ArithmeticOverflow("volume"))
}

/// Cubic (dimensional) weight for a volume score.
pub fn cubic_weight(volume: Decimal, factor: Decimal) -> Result<Decimal, FreightError> {
    volume
        .checked_mul(factor)
        .ok_or(FreightError::ArithmeticOverflow("cubic_weight"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn volume_multiplies_dimensions_and_quantity() {
        let item = PackedItem::new(dec!(10), dec!(20), dec!(30), 3, dec!(5));
        assert_eq!(volume_of(&item).unwrap(), dec!(18000));
    }

    #[test]
    fn volume_keeps_fractional_centimeters() {
        let item = PackedItem::new(dec!(0.5), dec!(0.5), dec!(2), 1, dec!(0));
        assert_eq!(volume_of(&item).unwrap(), dec!(0.5));
    }

    #[test]
    fn volume_rejects_zero_dimension() {
        let item = PackedItem::new(dec!(10), dec!(0), dec!(30), 1, dec!(5));
        assert!(matches!(
            volume_of(&item),
            Err(FreightError::NonPositiveDimension { field: "width_cm", .. })
        ));
    }

    #[test]
    fn volume_rejects_negative_length_and_zero_quantity() {
        let item = PackedItem::new(dec!(10), dec!(10), dec!(-1), 1, dec!(5));
        assert!(matches!(
            volume_of(&item),
            Err(FreightError::NonPositiveDimension { field: "length_cm", .. })
        ));

        let item = PackedItem::new(dec!(10), dec!(10), dec!(10), 0, dec!(5));
        assert!(matches!(
            volume_of(&item),
            Err(FreightError::NonPositiveQuantity(0))
        ));
    }

    #[test]
    fn volume_overflow_is_an_error() {
        let huge = Decimal::MAX;
        let item = PackedItem::new(huge, huge, dec!(1), 1, dec!(0));
        assert!(matches!(
            volume_of(&item),
            Err(FreightError::ArithmeticOverflow("volume"))
        ));
    }

    #[test]
    fn cubic_weight_applies_factor_without_unit_conversion() {
        assert_eq!(cubic_weight(dec!(18000), dec!(300)).unwrap(), dec!(5400000));
        assert_eq!(cubic_weight(dec!(0), dec!(300)).unwrap(), dec!(0));
    }
}
