//! Monetary amount conversion.

use dispute_desk_common::{AppError, AppResult};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Convert an integer minor-unit amount (cents) into major units.
///
/// Always divides by 100; the result carries exactly two decimal places.
#[must_use]
pub fn minor_units_to_major(amount: i64) -> Decimal {
    Decimal::new(amount, 2)
}

/// Largest number of decimal places a stored amount can hold.
pub const MAX_SCALE: u32 = 2;

/// Parse a major-unit decimal string such as `"12.34"`.
///
/// Trailing zeros are ignored; anything finer than [`MAX_SCALE`] places is
/// rejected rather than rounded.
pub fn parse_major_units(value: &str) -> AppResult<Decimal> {
    let amount = Decimal::from_str(value.trim())
        .map_err(|e| AppError::ExternalService(format!("Invalid amount {value:?}: {e}")))?;

    if amount.normalize().scale() > MAX_SCALE {
        return Err(AppError::ExternalService(format!(
            "Amount {value:?} has more than {MAX_SCALE} decimal places"
        )));
    }
    Ok(amount)
}

/// Reject negative amounts reported by a processor.
pub fn ensure_non_negative(amount: Decimal, external_id: &str) -> AppResult<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::ExternalService(format!(
            "Dispute {external_id} reported a negative amount: {amount}"
        )));
    }
    Ok(amount)
}
