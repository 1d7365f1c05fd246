//! Net debit cap calculation
//!
//! The cap is derived from the participant's NDC definition and the live
//! settlement-account balance. Whatever the definition says, the usable
//! ceiling never exceeds the observed balance and is never negative.

use hubadmin_core::Amount;
use hubadmin_participant::NdcType;
use rust_decimal::Decimal;

use crate::error::NdcComputeError;

/// Compute the usable debit ceiling for one currency.
///
/// - ABSOLUTE: `raw = max(fixed_value, 0)`
/// - PERCENTAGE: `raw = max(floor(percentage / 100 * liquidity_balance), 0)`
///
/// The result is always clamped to `[0, liquidity_balance]`.
pub fn compute_net_debit_cap(
    fixed_value: Option<Decimal>,
    percentage: Option<Decimal>,
    liquidity_balance: Decimal,
    ndc_type: NdcType,
) -> Result<Amount, NdcComputeError> {
    let raw = match ndc_type {
        NdcType::Absolute => fixed_value.ok_or(NdcComputeError::MissingFixedValue)?,
        NdcType::Percentage => {
            let percentage = percentage.ok_or(NdcComputeError::MissingPercentage)?;
            (percentage / Decimal::ONE_HUNDRED * liquidity_balance).floor()
        }
    };

    let raw = raw.max(Decimal::ZERO);
    let capped = raw.min(liquidity_balance).max(Decimal::ZERO);

    // Clamped above, so the unchecked constructor is sound.
    Ok(Amount::new_unchecked(capped))
}
