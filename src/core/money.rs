use rust_decimal::{Decimal, RoundingStrategy};

/// Render an amount as a fixed two-place string ("1200.00").
///
/// Reports carry money as strings so JSON consumers never see float noise.
pub fn format_money(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Round an amount to cents
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Mean of `total` over `count` items, zero when there are none
pub fn average(total: Decimal, count: i64) -> Decimal {
    if count <= 0 {
        return Decimal::ZERO;
    }
    total / Decimal::from(count)
}

/// Share of `count` in `total` as a percentage with one decimal place.
/// A zero total yields 0.0 rather than NaN.
pub fn percentage(count: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let pct = count as f64 / total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}
