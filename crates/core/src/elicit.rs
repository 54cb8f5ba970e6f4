use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::UserProfile;

/// The closed set of profile fields the assistant may ask the user for.
/// The farmer flag is deliberately absent: it has no ask-the-user path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Age,
    AnnualIncome,
    LandSize,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ElicitError {
    #[error("value '{value}' for {field} is not a valid number")]
    NotNumeric { field: &'static str, value: String },
}

impl ProfileField {
    pub fn key(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::AnnualIncome => "annual_income",
            Self::LandSize => "land_size",
        }
    }

    /// Coerce a raw reply to the field's semantic type and write it into the
    /// profile. A value already present is overwritten: an explicit answer
    /// for the same field is the only thing allowed to replace it.
    pub fn apply(self, profile: &mut UserProfile, raw: &str) -> Result<(), ElicitError> {
        let value = raw.trim();
        match self {
            Self::Age => {
                profile.age = Some(parse_numeric(self, value)?);
            }
            Self::AnnualIncome => {
                profile.annual_income = Some(parse_numeric(self, value)?);
            }
            Self::LandSize => {
                profile.land_size = Some(parse_numeric(self, value)?);
            }
        }
        Ok(())
    }
}

fn parse_numeric<T: std::str::FromStr>(
    field: ProfileField,
    value: &str,
) -> Result<T, ElicitError> {
    value.parse().map_err(|_| ElicitError::NotNumeric {
        field: field.key(),
        value: value.to_string(),
    })
}
