use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use yojana_core::{Locale, Plan};

use crate::{OracleError, PlanOracle};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI-backed plan oracle. Asks for a JSON plan in the user's language;
/// the reply is treated as unreliable and every failure is surfaced as a
/// typed `OracleError` for the caller's fallback to act on.
#[derive(Debug, Clone)]
pub struct OpenAiPlanOracle {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiPlanOracle {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, OracleError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(6))
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|err| OracleError::Request(err.to_string()))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl PlanOracle for OpenAiPlanOracle {
    fn name(&self) -> &'static str {
        "openai-chat"
    }

    async fn plan(&self, text: &str, locale: Locale) -> Result<Plan, OracleError> {
        let (system, prompt) = prompts_for(locale, text);
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt }
            ],
            "temperature": 0.2,
            "max_tokens": 200
        });

        let response = self
            .http
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Request(format!(
                "non-success status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| OracleError::Malformed(err.to_string()))?;

        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| OracleError::Malformed("reply has no message content".to_string()))?;

        parse_plan_payload(content)
    }
}

fn prompts_for(locale: Locale, text: &str) -> (String, String) {
    match locale {
        Locale::Te => (
            "మీరు ఒక ప్లాన్-ఆధారిత ఏజెంట్‌గా వ్యవహరించాలి. వినియోగదారు తెలుగు భాషలో మాట్లాడారు. \
             దయచేసి అవుట్‌పుట్ కేవలం JSON గా ఇవ్వండి, నిర్మాణం: {\"action\":..., \"keywords\":[...]}"
                .to_string(),
            format!(
                "వినియోగదారుని వాక్యం: {text}\n\n\
                 దయచేసి వెంటనే JSON ప్లాన్ ఇవ్వండి: action (search_schemes/apply/ask_info), keywords (తెలుగు పదాల జాబితా)."
            ),
        ),
        Locale::Mr | Locale::Unknown => (
            "आपण एक योजना-निर्मित सहाय्यक आहात. वापरकर्त्याने मराठीत बोलले आहे. \
             आउटपुट फक्त JSON मध्ये पाठवा, संरचना द्या: {\"action\":..., \"keywords\":[...]}"
                .to_string(),
            format!(
                "वापरकर्त्याचे वाक्य: {text}\n\n\
                 कृपया लगेच JSON प्लॅन द्या: action (search_schemes/apply/ask_info), keywords (मराठी शब्द सूची)."
            ),
        ),
    }
}

/// Parse the model's reply into a `Plan`. Accepts bare JSON or JSON embedded
/// in surrounding prose (first `{` to last `}`).
fn parse_plan_payload(content: &str) -> Result<Plan, OracleError> {
    let value = serde_json::from_str::<Value>(content)
        .ok()
        .or_else(|| {
            extract_json_object(content).and_then(|candidate| serde_json::from_str(candidate).ok())
        })
        .ok_or_else(|| OracleError::Malformed(snippet(content)))?;

    let has_action = value
        .get("action")
        .and_then(Value::as_str)
        .is_some_and(|action| !action.is_empty());
    if !has_action {
        return Err(OracleError::MissingAction);
    }

    serde_json::from_value(value).map_err(|err| OracleError::Malformed(err.to_string()))
}

fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (start < end).then(|| &content[start..=end])
}

fn snippet(content: &str) -> String {
    content.chars().take(120).collect()
}
