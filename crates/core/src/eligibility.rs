use crate::elicit::ProfileField;
use crate::models::{EligibilityVerdict, Scheme, UserProfile};

/// Rule-based eligibility check for one profile-scheme pair. Pure: neither
/// input is mutated and identical inputs always yield identical verdicts.
///
/// Every rule class is checked independently (no short-circuit), so each can
/// contribute its missing field. A verdict can be ineligible with an empty
/// `missing` list when a known value simply fails a bound.
pub fn evaluate(profile: &UserProfile, scheme: &Scheme) -> EligibilityVerdict {
    let rules = &scheme.eligibility;
    let mut missing = Vec::new();
    let mut eligible = true;

    if rules.min_age.is_some() || rules.max_age.is_some() {
        match profile.age {
            None => {
                missing.push(ProfileField::Age);
                eligible = false;
            }
            Some(age) => {
                if rules.min_age.is_some_and(|min| age < min) {
                    eligible = false;
                }
                if rules.max_age.is_some_and(|max| age > max) {
                    eligible = false;
                }
            }
        }
    }

    if let Some(income_below) = rules.income_below {
        match profile.annual_income {
            None => {
                missing.push(ProfileField::AnnualIncome);
                eligible = false;
            }
            Some(income) => {
                if income > income_below {
                    eligible = false;
                }
            }
        }
    }

    if rules.farmer && !profile.farmer.unwrap_or(false) {
        eligible = false;
    }

    // land_size_max of zero is still a constraint
    if let Some(land_size_max) = rules.land_size_max {
        match profile.land_size {
            None => {
                missing.push(ProfileField::LandSize);
                eligible = false;
            }
            Some(land_size) => {
                if land_size > land_size_max {
                    eligible = false;
                }
            }
        }
    }

    EligibilityVerdict { eligible, missing }
}
