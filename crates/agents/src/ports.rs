use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;
use yojana_core::{ApplicationReceipt, Locale, ProfileField, Scheme, UserProfile};

/// Boundary for asking the user one missing profile field. The prompt is
/// already localized; the reply comes back raw and uncoerced.
#[async_trait]
pub trait ElicitationPort: Send + Sync {
    async fn request_field(&self, field: ProfileField, prompt: &str) -> Result<String>;
}

/// Speech boundary. `speak` failures are never fatal to a turn; the agent
/// logs the raw text and moves on.
#[async_trait]
pub trait VoicePort: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
    async fn speak(&self, text: &str, locale: Locale) -> Result<()>;
}

/// External scheme-application service. Not assumed idempotent; the agent
/// calls it at most once per eligible turn.
#[async_trait]
pub trait ApplicationGateway: Send + Sync {
    async fn submit(&self, profile: &UserProfile, scheme: &Scheme) -> Result<ApplicationReceipt>;
}

/// Stand-in submission service returning a fresh confirmation record.
#[derive(Debug, Clone)]
pub struct MockApplicationGateway {
    locale: Locale,
}

impl MockApplicationGateway {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

#[async_trait]
impl ApplicationGateway for MockApplicationGateway {
    async fn submit(&self, _profile: &UserProfile, scheme: &Scheme) -> Result<ApplicationReceipt> {
        let message = match self.locale {
            Locale::Te => "దరఖాస్తు విజయవంతంగా సమర్పించబడింది",
            Locale::Mr | Locale::Unknown => "अर्ज यशस्वीरित्या सादर करण्यात आला",
        };

        Ok(ApplicationReceipt {
            application_id: Uuid::new_v4().to_string(),
            status: "submitted".to_string(),
            scheme_id: scheme.id.clone(),
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yojana_core::EligibilityRuleSet;

    #[tokio::test]
    async fn mock_gateway_mints_fresh_application_ids() {
        let gateway = MockApplicationGateway::new(Locale::Te);
        let scheme = Scheme {
            id: "pm-kisan".to_string(),
            name: "పిఎం కిసాన్".to_string(),
            description: String::new(),
            eligibility: EligibilityRuleSet::default(),
        };

        let first = gateway
            .submit(&UserProfile::default(), &scheme)
            .await
            .unwrap();
        let second = gateway
            .submit(&UserProfile::default(), &scheme)
            .await
            .unwrap();

        assert_eq!(first.status, "submitted");
        assert_eq!(first.scheme_id, "pm-kisan");
        assert!(!first.application_id.is_empty());
        assert_ne!(first.application_id, second.application_id);
    }
}
