//! Integer money helpers centralizing the floor/percent arithmetic.
//!
//! Every percentage in the pipeline floors toward negative infinity, so a
//! percentage of a negative balance rounds away from zero.

/// `floor(value * pct / 100)`, saturating on overflow.
#[must_use]
pub const fn percent_floor(value: i64, pct: i64) -> i64 {
    value.saturating_mul(pct).div_euclid(100)
}

/// `floor(value * tenths / 10)`, used for fractional multipliers like 1.4 and 0.9.
#[must_use]
pub const fn tenths_floor(value: i64, tenths: i64) -> i64 {
    value.saturating_mul(tenths).div_euclid(10)
}

/// Floor division for the luck bonuses (`floor(luck / divisor)`).
#[must_use]
pub const fn floor_div(value: i32, divisor: i32) -> i32 {
    value.div_euclid(divisor)
}

/// Render an amount with comma thousands separators, e.g. `-1,250,000`.
#[must_use]
pub fn format_money(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
