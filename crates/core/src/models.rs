use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::elicit::ProfileField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    Mr,
    Te,
    Unknown,
}

impl Locale {
    pub fn from_optional_str(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "mr" || v == "mr-in" || v == "marathi" => Self::Mr,
            Some(v) if v == "te" || v == "te-in" || v == "telugu" => Self::Te,
            _ => Self::Unknown,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::Mr => "mr",
            Self::Te => "te",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    SearchSchemes,
    Apply,
    AskInfo,
}

/// Resolved intent for one utterance. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub action: PlanAction,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Bounds and predicates a profile must satisfy. An absent bound is not a
/// constraint; `land_size_max` of zero is a real constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityRuleSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_below: Option<u64>,
    #[serde(default)]
    pub farmer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_size_max: Option<f64>,
}

/// Immutable catalog entry. Created by catalog load, never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub eligibility: EligibilityRuleSet,
}

/// Partial by construction; owned by the profile store. The core receives a
/// copy, amends it during elicitation, and hands it back for persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_income: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farmer: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityVerdict {
    pub eligible: bool,
    pub missing: Vec<ProfileField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub scheme: Scheme,
    pub verdict: EligibilityVerdict,
}

/// Confirmation record returned by the application-submission gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationReceipt {
    pub application_id: String,
    pub status: String,
    pub scheme_id: String,
    pub message: String,
}

/// Append-only conversation log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnRecord {
    Utterance {
        user_id: String,
        text: String,
        at: DateTime<Utc>,
    },
    Outcome {
        action: String,
        detail: Value,
        at: DateTime<Utc>,
    },
}

impl TurnRecord {
    pub fn recorded_at(&self) -> DateTime<Utc> {
        match self {
            Self::Utterance { at, .. } | Self::Outcome { at, .. } => *at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnInput {
    pub user_id: String,
    pub text: String,
}

/// The exactly-one terminal outcome every conversation turn reaches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TurnOutcome {
    NoMatch,
    Applied {
        scheme: Scheme,
        receipt: ApplicationReceipt,
    },
    NotEligible {
        scheme: Scheme,
        suggestions: Vec<Scheme>,
    },
}

impl TurnOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoMatch => "no_match",
            Self::Applied { .. } => "applied",
            Self::NotEligible { .. } => "not_eligible",
        }
    }
}
