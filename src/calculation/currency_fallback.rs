//! Currency fallback for USD-denominated amounts.
//!
//! Upstream exports populate the "local" column for every employee and the
//! "USD" column only for employees paid in another currency. Domestic local
//! values are already USD, so the USD column wins whenever it holds a value.

use rust_decimal::Decimal;

/// Picks the USD figure for an amount.
///
/// Returns `usd_value` if present and non-zero, else `local_value`, else zero.
/// No conversion arithmetic happens here.
///
/// # Examples
///
/// ```
/// use bonus_engine::calculation::resolve_usd;
/// use rust_decimal::Decimal;
///
/// // Domestic: only the local column is populated.
/// assert_eq!(resolve_usd(Some(Decimal::from(4500)), None), Decimal::from(4500));
///
/// // International: the USD conversion wins.
/// assert_eq!(
///     resolve_usd(Some(Decimal::from(3250)), Some(Decimal::from(2425))),
///     Decimal::from(2425)
/// );
/// ```
pub fn resolve_usd(local_value: Option<Decimal>, usd_value: Option<Decimal>) -> Decimal {
    usd_value
        .filter(|v| !v.is_zero())
        .or(local_value)
        .unwrap_or(Decimal::ZERO)
}
