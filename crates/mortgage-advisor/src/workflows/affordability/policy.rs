use serde::{Deserialize, Serialize};
use std::fmt;

/// Share of the property price expected as a down payment.
pub const MIN_DOWN_PAYMENT_RATIO: f64 = 0.20;
/// Fixed nominal annual interest rate applied to every loan.
pub const ANNUAL_INTEREST_RATE: f64 = 0.045;
/// Registration and agency fees, estimated as a share of the price.
pub const UPFRONT_COST_RATIO: f64 = 0.07;
/// Stays shorter than this many years favour renting.
pub const RENT_BELOW_YEARS: u32 = 3;
/// Stays longer than this many years favour buying.
pub const BUY_ABOVE_YEARS: u32 = 5;

/// Policy values feeding the affordability engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityPolicy {
    pub min_down_payment_ratio: f64,
    pub annual_interest_rate: f64,
    pub upfront_cost_ratio: f64,
    pub rent_below_years: u32,
    pub buy_above_years: u32,
}

impl AffordabilityPolicy {
    pub fn standard() -> Self {
        Self {
            min_down_payment_ratio: MIN_DOWN_PAYMENT_RATIO,
            annual_interest_rate: ANNUAL_INTEREST_RATE,
            upfront_cost_ratio: UPFRONT_COST_RATIO,
            rent_below_years: RENT_BELOW_YEARS,
            buy_above_years: BUY_ABOVE_YEARS,
        }
    }

    /// Classifies a planned stay. Both thresholds fall into `Depends`.
    pub fn recommend(&self, years_planned: u32) -> Recommendation {
        if years_planned < self.rent_below_years {
            Recommendation::Rent
        } else if years_planned > self.buy_above_years {
            Recommendation::Buy
        } else {
            Recommendation::Depends
        }
    }
}

impl Default for AffordabilityPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Rent,
    Buy,
    Depends,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Rent => "rent",
            Recommendation::Buy => "buy",
            Recommendation::Depends => "depends",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
