mod fallback;
mod openai;

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;
use yojana_core::{Locale, Plan};

pub use fallback::fallback_plan;
pub use openai::OpenAiPlanOracle;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("plan oracle is not configured")]
    Disabled,
    #[error("plan oracle request failed: {0}")]
    Request(String),
    #[error("plan oracle returned a malformed payload: {0}")]
    Malformed(String),
    #[error("plan oracle reply has no usable action")]
    MissingAction,
}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

/// External plan-producing oracle. Treated as unreliable by construction:
/// every failure is an `Err`, and only an `Err` triggers the fallback.
#[async_trait]
pub trait PlanOracle: Send + Sync {
    fn name(&self) -> &'static str;
    async fn plan(&self, text: &str, locale: Locale) -> Result<Plan, OracleError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanSource {
    Oracle,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct ResolvedPlan {
    pub plan: Plan,
    pub source: PlanSource,
}

/// Plan resolution stack: an optional oracle in front of the deterministic
/// fallback. `resolve` never raises to its caller.
#[derive(Clone, Default)]
pub struct PlannerStack {
    oracle: Option<Arc<dyn PlanOracle>>,
}

impl PlannerStack {
    pub fn without_oracle() -> Self {
        Self { oracle: None }
    }

    pub fn with_oracle(oracle: Arc<dyn PlanOracle>) -> Self {
        Self {
            oracle: Some(oracle),
        }
    }

    /// Build the oracle from `YOJANA_OPENAI_API_KEY` / `YOJANA_OPENAI_MODEL`
    /// when configured, otherwise run fallback-only.
    pub fn load_default() -> Self {
        let Ok(api_key) = env::var("YOJANA_OPENAI_API_KEY") else {
            return Self::without_oracle();
        };
        let model =
            env::var("YOJANA_OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        match OpenAiPlanOracle::new(api_key, model) {
            Ok(oracle) => Self::with_oracle(Arc::new(oracle)),
            Err(err) => {
                warn!(error = %err, "plan oracle unavailable; running fallback-only");
                Self::without_oracle()
            }
        }
    }

    pub fn oracle_enabled(&self) -> bool {
        self.oracle.is_some()
    }

    pub async fn resolve(&self, text: &str, locale: Locale) -> ResolvedPlan {
        if let Some(oracle) = &self.oracle {
            match oracle.plan(text, locale).await {
                Ok(plan) => {
                    return ResolvedPlan {
                        plan,
                        source: PlanSource::Oracle,
                    }
                }
                Err(err) => {
                    warn!(oracle = oracle.name(), error = %err, "plan oracle failed; using fallback");
                }
            }
        }

        ResolvedPlan {
            plan: fallback_plan(text),
            source: PlanSource::Fallback,
        }
    }
}
