//! Configuration module for freight-rateio.

use crate::models::AllocationBasis;
use logistics_core::config as core_config;
use logistics_core::error::AppError;
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

/// Cubic weight factor applied to the volume score of an invoice.
pub const DEFAULT_CUBIC_WEIGHT_FACTOR: Decimal = Decimal::from_parts(300, 0, 0, false, 0);

/// Decimal places kept on allocated amounts.
pub const DEFAULT_ALLOCATION_SCALE: u32 = 2;

/// Upper bound accepted for `FREIGHT_ALLOCATION_SCALE`.
pub const MAX_ALLOCATION_SCALE: u32 = 10;

#[derive(Debug, Clone)]
pub struct FreightConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub cubic_weight_factor: Decimal,
    pub allocation_scale: u32,
    pub allocation_basis: AllocationBasis,
}

impl Default for FreightConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            service_name: "freight-rateio".to_string(),
            cubic_weight_factor: DEFAULT_CUBIC_WEIGHT_FACTOR,
            allocation_scale: DEFAULT_ALLOCATION_SCALE,
            allocation_basis: AllocationBasis::Actual,
        }
    }
}

impl FreightConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let cubic_weight_factor = match env::var("FREIGHT_CUBIC_WEIGHT_FACTOR") {
            Ok(raw) => {
                let factor = Decimal::from_str(raw.trim()).map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "FREIGHT_CUBIC_WEIGHT_FACTOR is not a decimal ({raw}): {e}"
                    ))
                })?;
                if factor.is_sign_negative() {
                    return Err(AppError::ConfigError(anyhow::anyhow!(
                        "FREIGHT_CUBIC_WEIGHT_FACTOR must not be negative"
                    )));
                }
                factor
            }
            Err(_) => DEFAULT_CUBIC_WEIGHT_FACTOR,
        };

        let allocation_scale = match env::var("FREIGHT_ALLOCATION_SCALE") {
            Ok(raw) => {
                let scale: u32 = raw.trim().parse().map_err(|_| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "FREIGHT_ALLOCATION_SCALE is not an integer ({raw})"
                    ))
                })?;
                if scale > MAX_ALLOCATION_SCALE {
                    return Err(AppError::ConfigError(anyhow::anyhow!(
                        "FREIGHT_ALLOCATION_SCALE must be at most {MAX_ALLOCATION_SCALE}"
                    )));
                }
                scale
            }
            Err(_) => DEFAULT_ALLOCATION_SCALE,
        };

        let allocation_basis = match env::var("FREIGHT_ALLOCATION_BASIS") {
            Ok(raw) => AllocationBasis::parse(raw.trim()).ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "FREIGHT_ALLOCATION_BASIS must be 'actual' or 'chargeable' (got {raw})"
                ))
            })?,
            Err(_) => AllocationBasis::Actual,
        };

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "freight-rateio".to_string()),
            cubic_weight_factor,
            allocation_scale,
            allocation_basis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "SERVICE_NAME",
        "FREIGHT_CUBIC_WEIGHT_FACTOR",
        "FREIGHT_ALLOCATION_SCALE",
        "FREIGHT_ALLOCATION_BASIS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn from_env_defaults() {
        clear_env();

        let config = FreightConfig::from_env().unwrap();
        assert_eq!(config.service_name, "freight-rateio");
        assert_eq!(config.cubic_weight_factor, dec!(300));
        assert_eq!(config.allocation_scale, 2);
        assert_eq!(config.allocation_basis, AllocationBasis::Actual);
    }

    #[test]
    #[serial]
    fn from_env_reads_overrides() {
        clear_env();
        env::set_var("FREIGHT_CUBIC_WEIGHT_FACTOR", "166.7");
        env::set_var("FREIGHT_ALLOCATION_SCALE", "4");
        env::set_var("FREIGHT_ALLOCATION_BASIS", "chargeable");

        let config = FreightConfig::from_env();
        clear_env();

        let config = config.unwrap();
        assert_eq!(config.cubic_weight_factor, dec!(166.7));
        assert_eq!(config.allocation_scale, 4);
        assert_eq!(config.allocation_basis, AllocationBasis::Chargeable);
    }

    #[test]
    #[serial]
    fn from_env_rejects_bad_values() {
        clear_env();
        env::set_var("FREIGHT_ALLOCATION_SCALE", "twelve");
        let result = FreightConfig::from_env();
        clear_env();
        assert!(matches!(result, Err(AppError::ConfigError(_))));

        env::set_var("FREIGHT_CUBIC_WEIGHT_FACTOR", "-1");
        let result = FreightConfig::from_env();
        clear_env();
        assert!(matches!(result, Err(AppError::ConfigError(_))));

        env::set_var("FREIGHT_ALLOCATION_BASIS", "volume");
        let result = FreightConfig::from_env();
        clear_env();
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
