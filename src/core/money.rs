use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Integer count of the smallest currency unit (pence for GBP)
pub type MoneyAmount = i64;

/// Minor units per major unit (100 pence in a pound)
pub const MINOR_UNITS: i64 = 100;

/// A total that no longer fits in a [`MoneyAmount`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0} exceeds the largest representable amount")]
pub struct AmountOverflow(pub &'static str);

/// Round half up to the nearest whole minor unit.
///
/// Halves round towards positive infinity for both signs, so `-100.5` becomes
/// `-100` and `100.5` becomes `101`. Returns `None` when the result does not
/// fit in a [`MoneyAmount`].
pub fn checked_hmrc_round(value: Decimal) -> Option<MoneyAmount> {
    value.checked_add(Decimal::new(5, 1))?.floor().to_i64()
}

/// [`checked_hmrc_round`] for callers that want a plain number; values that
/// don't fit yield 0.
pub fn hmrc_round(value: Decimal) -> MoneyAmount {
    checked_hmrc_round(value).unwrap_or_default()
}

/// [`hmrc_round`] for raw text input; anything that isn't a number rounds to 0.
pub fn hmrc_round_str(raw: &str) -> MoneyAmount {
    Decimal::from_str(raw.trim())
        .map(hmrc_round)
        .unwrap_or_default()
}

/// Sum amounts, failing instead of wrapping when the total leaves the `i64` range
pub fn checked_sum(
    amounts: impl IntoIterator<Item = MoneyAmount>,
    what: &'static str,
) -> Result<MoneyAmount, AmountOverflow> {
    amounts
        .into_iter()
        .try_fold(0 as MoneyAmount, |total, amount| total.checked_add(amount))
        .ok_or(AmountOverflow(what))
}

/// Round to the nearest whole major unit (multiple of 100 minor units), halves up.
///
/// `i64::MAX` and `i64::MIN` both sit below the halfway mark of their hundred,
/// so every input has a representable result.
pub fn round_to_pounds(amount: MoneyAmount) -> MoneyAmount {
    let rem = amount.rem_euclid(MINOR_UNITS);
    if rem >= MINOR_UNITS / 2 {
        amount + (MINOR_UNITS - rem)
    } else {
        amount - rem
    }
}

/// Express a minor unit amount in major units (pence to pounds)
pub fn to_major(amount: MoneyAmount) -> Decimal {
    Decimal::new(amount, 2)
}

/// Format minor units as pounds, with the sign ahead of the currency symbol
pub fn format_gbp(amount: MoneyAmount) -> String {
    let major = to_major(amount);
    if major < Decimal::ZERO {
        format!("-£{:.2}", major.abs())
    } else {
        format!("£{:.2}", major)
    }
}
