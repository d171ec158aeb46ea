//! Buy-vs-rent affordability evaluation.
//!
//! The engine is a pure function of its inputs and the policy values it was
//! built with; it never fails. Input validation belongs to the request
//! boundary, see [`MortgageInputs::validate`].

pub mod amortization;
mod domain;
mod policy;

pub use domain::{AffordabilityResult, InputError, MortgageInputs};
pub use policy::{
    AffordabilityPolicy, Recommendation, ANNUAL_INTEREST_RATE, BUY_ABOVE_YEARS,
    MIN_DOWN_PAYMENT_RATIO, RENT_BELOW_YEARS, UPFRONT_COST_RATIO,
};

use amortization::{monthly_installment, round_to_cents, MONTHS_PER_YEAR};
use tracing::warn;

/// Stateless evaluator that applies the affordability policy to a request.
#[derive(Debug, Clone, Default)]
pub struct AffordabilityEngine {
    policy: AffordabilityPolicy,
}

impl AffordabilityEngine {
    pub fn new(policy: AffordabilityPolicy) -> Self {
        Self { policy }
    }

    pub fn standard() -> Self {
        Self::new(AffordabilityPolicy::standard())
    }

    pub fn policy(&self) -> &AffordabilityPolicy {
        &self.policy
    }

    pub fn evaluate(&self, inputs: &MortgageInputs) -> AffordabilityResult {
        let policy = &self.policy;

        let min_down_payment_required = policy.min_down_payment_ratio * inputs.property_price;
        let is_down_payment_sufficient = inputs.down_payment >= min_down_payment_required;

        let loan_amount = inputs.loan_amount();
        if loan_amount < 0.0 {
            warn!(
                property_price = inputs.property_price,
                down_payment = inputs.down_payment,
                "down payment exceeds property price; loan amount is negative"
            );
        }

        // A loan with no payment periods is settled in a single payment.
        let installment =
            monthly_installment(loan_amount, policy.annual_interest_rate, inputs.tenure_years)
                .unwrap_or(loan_amount);

        let upfront_costs = policy.upfront_cost_ratio * inputs.property_price;

        let total_rent_over_period = inputs
            .monthly_rent
            .filter(|rent| *rent != 0.0)
            .map(|rent| rent * f64::from(MONTHS_PER_YEAR) * f64::from(inputs.years_planned));

        let installment_to_income_ratio = inputs
            .monthly_income
            .filter(|income| *income != 0.0)
            .map(|income| round_to_cents(installment / income));

        AffordabilityResult {
            min_down_payment_required,
            is_down_payment_sufficient,
            loan_amount,
            installment,
            upfront_costs,
            total_rent_over_period,
            installment_to_income_ratio,
            recommendation: policy.recommend(inputs.years_planned),
        }
    }
}

/// Evaluates a request against the standard policy.
pub fn evaluate(inputs: &MortgageInputs) -> AffordabilityResult {
    AffordabilityEngine::standard().evaluate(inputs)
}
