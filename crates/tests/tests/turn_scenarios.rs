use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use yojana_agents::{
    ElicitationPort, MockApplicationGateway, SahayakAgent, TurnReport, VoicePort,
};
use yojana_core::{
    EligibilityRuleSet, Locale, ProfileField, Scheme, TurnInput, TurnOutcome, TurnRecord,
    UserProfile,
};
use yojana_observability::AppMetrics;
use yojana_planner::{PlanSource, PlannerStack};
use yojana_retrieval::SchemeRetriever;
use yojana_storage::{MemoryStore, ProfileRepository};

struct SilentVoice;

#[async_trait]
impl VoicePort for SilentVoice {
    async fn transcribe(&self, _audio_path: &Path) -> Result<String> {
        Err(anyhow!("no transcription in tests"))
    }

    async fn speak(&self, _text: &str, _locale: Locale) -> Result<()> {
        Ok(())
    }
}

/// Answers elicitations from a fixed script and records what was asked.
struct ScriptedElicitation {
    replies: HashMap<&'static str, &'static str>,
    asked: Mutex<Vec<&'static str>>,
}

impl ScriptedElicitation {
    fn new(replies: &[(&'static str, &'static str)]) -> Arc<Self> {
        Arc::new(Self {
            replies: replies.iter().copied().collect(),
            asked: Mutex::new(Vec::new()),
        })
    }

    fn none() -> Arc<Self> {
        Self::new(&[])
    }

    fn asked(&self) -> Vec<&'static str> {
        self.asked.lock().clone()
    }
}

#[async_trait]
impl ElicitationPort for ScriptedElicitation {
    async fn request_field(&self, field: ProfileField, _prompt: &str) -> Result<String> {
        self.asked.lock().push(field.key());
        self.replies
            .get(field.key())
            .map(|reply| reply.to_string())
            .ok_or_else(|| anyhow!("unexpected elicitation for {}", field.key()))
    }
}

fn scheme(id: &str, name: &str, description: &str, eligibility: EligibilityRuleSet) -> Scheme {
    Scheme {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        eligibility,
    }
}

fn farm_scheme(rules: EligibilityRuleSet) -> Scheme {
    scheme(
        "pm-kisan",
        "पीएम किसान सन्मान निधी",
        "शेतकरी कुटुंबांना वार्षिक आर्थिक मदत",
        rules,
    )
}

fn agent_with(
    schemes: Vec<Scheme>,
    store: Arc<MemoryStore>,
    elicitation: Arc<ScriptedElicitation>,
) -> SahayakAgent<MemoryStore> {
    SahayakAgent::new(
        Arc::new(SchemeRetriever::from_schemes(schemes)),
        PlannerStack::without_oracle(),
        store,
        Arc::new(MockApplicationGateway::new(Locale::Mr)),
        Arc::new(SilentVoice),
        elicitation,
        AppMetrics::shared(),
        Locale::Mr,
    )
}

async fn run_turn(agent: &SahayakAgent<MemoryStore>, text: &str) -> Result<TurnReport> {
    agent
        .handle_turn(TurnInput {
            user_id: "user_1".to_string(),
            text: text.to_string(),
        })
        .await
}

#[tokio::test]
async fn happy_path_reaches_done_with_an_application_id() {
    let store = Arc::new(MemoryStore::new());
    store
        .store_profile(
            "user_1",
            &UserProfile {
                age: Some(35),
                annual_income: Some(180_000),
                farmer: Some(true),
                ..UserProfile::default()
            },
        )
        .await
        .unwrap();

    let agent = agent_with(
        vec![farm_scheme(EligibilityRuleSet {
            min_age: Some(18),
            income_below: Some(200_000),
            farmer: true,
            ..EligibilityRuleSet::default()
        })],
        store.clone(),
        ScriptedElicitation::none(),
    );

    let report = run_turn(&agent, "शेतकरी योजना माहिती").await.unwrap();

    assert_eq!(report.plan_source, PlanSource::Fallback);
    let TurnOutcome::Applied { scheme, receipt } = report.outcome else {
        panic!("expected an application, got {:?}", report.outcome);
    };
    assert_eq!(scheme.id, "pm-kisan");
    assert!(!receipt.application_id.is_empty());
    assert_eq!(receipt.status, "submitted");

    // the applied outcome lands in the conversation log after the utterance
    let turns = store.turns();
    assert_eq!(turns.len(), 2);
    assert!(matches!(&turns[0], TurnRecord::Utterance { text, .. } if text.contains("शेतकरी")));
    assert!(matches!(&turns[1], TurnRecord::Outcome { action, .. } if action == "applied"));
}

#[tokio::test]
async fn missing_fields_are_elicited_then_re_evaluated_once() {
    let store = Arc::new(MemoryStore::new());
    let elicitation = ScriptedElicitation::new(&[("age", "40"), ("annual_income", "150000")]);

    let agent = agent_with(
        vec![farm_scheme(EligibilityRuleSet {
            min_age: Some(18),
            income_below: Some(200_000),
            ..EligibilityRuleSet::default()
        })],
        store.clone(),
        elicitation.clone(),
    );

    let report = run_turn(&agent, "शेतकरी योजना माहिती").await.unwrap();

    assert_eq!(elicitation.asked(), vec!["age", "annual_income"]);
    assert!(matches!(report.outcome, TurnOutcome::Applied { .. }));

    // the amended profile was persisted before re-evaluation
    let profile = store.load_profile("user_1").await.unwrap();
    assert_eq!(profile.age, Some(40));
    assert_eq!(profile.annual_income, Some(150_000));
}

#[tokio::test]
async fn hard_ineligible_skips_elicitation() {
    let store = Arc::new(MemoryStore::new());
    store
        .store_profile(
            "user_1",
            &UserProfile {
                age: Some(15),
                ..UserProfile::default()
            },
        )
        .await
        .unwrap();

    let elicitation = ScriptedElicitation::none();
    let agent = agent_with(
        vec![farm_scheme(EligibilityRuleSet {
            min_age: Some(18),
            ..EligibilityRuleSet::default()
        })],
        store,
        elicitation.clone(),
    );

    let report = run_turn(&agent, "शेतकरी योजना माहिती").await.unwrap();

    assert!(elicitation.asked().is_empty());
    let TurnOutcome::NotEligible { scheme, suggestions } = report.outcome else {
        panic!("expected not-eligible, got {:?}", report.outcome);
    };
    assert_eq!(scheme.id, "pm-kisan");
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn unmatched_keywords_terminate_as_no_match() {
    let store = Arc::new(MemoryStore::new());
    let elicitation = ScriptedElicitation::none();
    let agent = agent_with(
        vec![farm_scheme(EligibilityRuleSet::default())],
        store.clone(),
        elicitation.clone(),
    );

    let report = run_turn(&agent, "xyzabc").await.unwrap();

    assert_eq!(report.candidates, 0);
    assert_eq!(report.outcome, TurnOutcome::NoMatch);
    assert!(elicitation.asked().is_empty());

    // only the utterance is logged; no outcome record for a no-match turn
    let turns = store.turns();
    assert_eq!(turns.len(), 1);
    assert!(matches!(&turns[0], TurnRecord::Utterance { .. }));
}

#[tokio::test]
async fn not_eligible_surfaces_the_next_candidates_as_suggestions() {
    let store = Arc::new(MemoryStore::new());
    store
        .store_profile(
            "user_1",
            &UserProfile {
                age: Some(15),
                ..UserProfile::default()
            },
        )
        .await
        .unwrap();

    let adult_only = EligibilityRuleSet {
        min_age: Some(18),
        ..EligibilityRuleSet::default()
    };
    let agent = agent_with(
        vec![
            scheme("a", "योजना एक", "पहिली योजना", adult_only.clone()),
            scheme("b", "योजना दोन", "दुसरी योजना", adult_only.clone()),
            scheme("c", "योजना तीन", "तिसरी योजना", adult_only.clone()),
            scheme("d", "योजना चार", "चौथी योजना", adult_only),
        ],
        store,
        ScriptedElicitation::none(),
    );

    let report = run_turn(&agent, "योजना").await.unwrap();

    let TurnOutcome::NotEligible { scheme, suggestions } = report.outcome else {
        panic!("expected not-eligible, got {:?}", report.outcome);
    };
    assert_eq!(scheme.id, "a");
    let suggested: Vec<_> = suggestions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(suggested, vec!["b", "c", "d"]);
}

#[tokio::test]
async fn malformed_elicitation_reply_fails_the_turn() {
    let store = Arc::new(MemoryStore::new());
    let elicitation = ScriptedElicitation::new(&[("age", "चाळीस")]);

    let agent = agent_with(
        vec![farm_scheme(EligibilityRuleSet {
            min_age: Some(18),
            ..EligibilityRuleSet::default()
        })],
        store.clone(),
        elicitation,
    );

    let result = run_turn(&agent, "शेतकरी योजना माहिती").await;
    assert!(result.is_err());

    // nothing was persisted for the failed round
    let profile = store.load_profile("user_1").await.unwrap();
    assert_eq!(profile, UserProfile::default());
}
