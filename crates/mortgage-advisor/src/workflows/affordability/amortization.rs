//! Equal-installment (annuity) loan arithmetic.

pub const MONTHS_PER_YEAR: u32 = 12;

/// Monthly payment that fully amortizes `principal` over `tenure_years`.
///
/// With a positive rate the standard annuity formula is used and the result is
/// rounded to cents. A zero rate degrades to a straight-line split that is
/// returned unrounded. Returns `None` when there are no payment periods.
pub fn monthly_installment(principal: f64, annual_rate: f64, tenure_years: u32) -> Option<f64> {
    let periods = tenure_years.checked_mul(MONTHS_PER_YEAR)?;
    if periods == 0 {
        return None;
    }

    let rate = annual_rate / f64::from(MONTHS_PER_YEAR);
    let periods = f64::from(periods);

    if rate == 0.0 {
        return Some(principal / periods);
    }

    let growth = (1.0 + rate).powf(periods);
    Some(round_to_cents(principal * rate * growth / (growth - 1.0)))
}

/// Rounds to two decimal places from the exact binary value of `value`.
///
/// Exact ties go to the even cent, so `0.125` becomes `0.12`. Scaling by 100
/// first would round twice and can push a value just below a half cent up.
pub fn round_to_cents(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
