use rust_decimal::Decimal;

use crate::constants::QUANTITY_THRESHOLD;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

pub fn is_quantity_significant(quantity: &Decimal) -> bool {
    let threshold =
        Decimal::from_str_radix(QUANTITY_THRESHOLD, 10).unwrap_or_else(|_| Decimal::new(1, 8));
    quantity.abs() >= threshold
}

/// `numerator / denominator × 100`, or zero when the denominator is not positive.
pub fn percent_of(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator > Decimal::ZERO {
        numerator / denominator * ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Rounds a money amount to whole cents, half away from zero.
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}
