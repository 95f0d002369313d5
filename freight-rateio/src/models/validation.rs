//! Field validators shared by the `#[derive(Validate)]` models.

use rust_decimal::Decimal;
use std::borrow::Cow;
use validator::ValidationError;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub(crate) fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(error("positive", "must be greater than zero"))
    }
}

pub(crate) fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(error("non_negative", "must not be negative"))
    } else {
        Ok(())
    }
}

pub(crate) fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO && *value <= Decimal::ONE_HUNDRED {
        Ok(())
    } else {
        Err(error("percentage", "must be between 0 and 100"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn non_negative_accepts_negative_zero() {
        assert!(non_negative(&dec!(-0)).is_ok());
        assert!(non_negative(&dec!(0.01)).is_ok());
        assert!(non_negative(&dec!(-0.01)).is_err());
    }

    #[test]
    fn percentage_bounds_are_inclusive() {
        assert!(percentage(&dec!(0)).is_ok());
        assert!(percentage(&dec!(100)).is_ok());
        assert!(percentage(&dec!(100.01)).is_err());
        assert!(percentage(&dec!(-1)).is_err());
    }

    #[test]
    fn positive_rejects_zero() {
        assert!(positive(&dec!(0)).is_err());
        assert!(positive(&dec!(0.1)).is_ok());
    }
}
