use serde::{de, Deserialize, Deserializer, Serialize};

use super::policy::Recommendation;

/// Structured buy-vs-rent request as submitted by the calculator form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortgageInputs {
    pub property_price: f64,
    pub down_payment: f64,
    #[serde(deserialize_with = "deserialize_whole_years")]
    pub tenure_years: u32,
    #[serde(deserialize_with = "deserialize_whole_years")]
    pub years_planned: u32,
    #[serde(default)]
    pub monthly_rent: Option<f64>,
    #[serde(default)]
    pub monthly_income: Option<f64>,
}

impl MortgageInputs {
    /// Financed amount. Negative when the down payment exceeds the price.
    pub fn loan_amount(&self) -> f64 {
        self.property_price - self.down_payment
    }

    /// Boundary checks applied before a request reaches the engine.
    ///
    /// A down payment above the property price is accepted here; the engine
    /// computes the resulting negative loan as-is.
    pub fn validate(&self) -> Result<(), InputError> {
        require_finite("property_price", self.property_price)?;
        require_finite("down_payment", self.down_payment)?;

        if self.property_price <= 0.0 {
            return Err(InputError::NotPositive {
                field: "property_price",
            });
        }
        if self.down_payment < 0.0 {
            return Err(InputError::Negative {
                field: "down_payment",
            });
        }
        if self.tenure_years == 0 {
            return Err(InputError::NotPositive {
                field: "tenure_years",
            });
        }
        if self.years_planned == 0 {
            return Err(InputError::NotPositive {
                field: "years_planned",
            });
        }

        if let Some(rent) = self.monthly_rent {
            require_finite("monthly_rent", rent)?;
            if rent < 0.0 {
                return Err(InputError::Negative {
                    field: "monthly_rent",
                });
            }
        }
        if let Some(income) = self.monthly_income {
            require_finite("monthly_income", income)?;
            if income < 0.0 {
                return Err(InputError::Negative {
                    field: "monthly_income",
                });
            }
        }

        Ok(())
    }
}

fn require_finite(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::NotFinite { field })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum YearCount {
    Whole(u64),
    Float(f64),
}

/// Accepts `25` and `25.0` alike; fractional or negative counts are rejected.
fn deserialize_whole_years<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let years = match YearCount::deserialize(deserializer)? {
        YearCount::Whole(value) => value,
        YearCount::Float(value) if value.fract() == 0.0 && value >= 0.0 => value as u64,
        YearCount::Float(value) => {
            return Err(de::Error::custom(format!(
                "expected a whole number of years, got {value}"
            )));
        }
    };
    u32::try_from(years)
        .map_err(|_| de::Error::custom(format!("{years} years is out of range")))
}

/// Rejection raised for inputs the engine is not meant to see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
    #[error("{field} must not be negative")]
    Negative { field: &'static str },
}

/// Buy-vs-rent evaluation returned to callers.
///
/// Optional figures are left out of the serialized payload entirely when they
/// could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityResult {
    pub min_down_payment_required: f64,
    pub is_down_payment_sufficient: bool,
    pub loan_amount: f64,
    pub installment: f64,
    pub upfront_costs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rent_over_period: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_to_income_ratio: Option<f64>,
    pub recommendation: Recommendation,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(tenure: &str) -> Result<MortgageInputs, serde_json::Error> {
        serde_json::from_str(&format!(
            r#"{{"property_price":1500000,"down_payment":300000,"tenure_years":{tenure},"years_planned":5}}"#
        ))
    }

    #[test]
    fn whole_float_years_are_accepted() {
        let inputs = parse("25.0").expect("whole float parses");

        assert_eq!(inputs.tenure_years, 25);
        assert_eq!(inputs.years_planned, 5);
        assert_eq!(parse("25").expect("integer parses"), inputs);
    }

    #[test]
    fn fractional_and_negative_years_are_rejected() {
        assert!(parse("25.5").is_err());
        assert!(parse("-1").is_err());
        assert!(parse("-1.0").is_err());
        assert!(parse("5000000000").is_err());
        assert!(parse("\"25\"").is_err());
    }
}
