mod ports;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use yojana_core::{
    evaluate, select_candidate, Locale, MessageCatalog, Plan, PlanAction, Scheme, ScoredCandidate,
    TurnInput, TurnOutcome, TurnRecord, UserProfile,
};
use yojana_observability::AppMetrics;
use yojana_planner::{PlanSource, PlannerStack};
use yojana_retrieval::SchemeRetriever;
use yojana_storage::{ConversationLog, ProfileRepository};

pub use ports::{ApplicationGateway, ElicitationPort, MockApplicationGateway, VoicePort};

/// What one conversation turn produced, for callers and tests.
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub plan: Plan,
    pub plan_source: PlanSource,
    pub candidates: usize,
    pub outcome: TurnOutcome,
}

/// Drives the plan -> retrieve -> evaluate -> select -> elicit pipeline for
/// one user utterance at a time. Stateless between turns: everything durable
/// lives behind the store handle.
#[derive(Clone)]
pub struct SahayakAgent<S>
where
    S: ProfileRepository + ConversationLog,
{
    retriever: Arc<SchemeRetriever>,
    planner: PlannerStack,
    store: Arc<S>,
    gateway: Arc<dyn ApplicationGateway>,
    voice: Arc<dyn VoicePort>,
    elicitation: Arc<dyn ElicitationPort>,
    metrics: Arc<AppMetrics>,
    locale: Locale,
}

impl<S> SahayakAgent<S>
where
    S: ProfileRepository + ConversationLog,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        retriever: Arc<SchemeRetriever>,
        planner: PlannerStack,
        store: Arc<S>,
        gateway: Arc<dyn ApplicationGateway>,
        voice: Arc<dyn VoicePort>,
        elicitation: Arc<dyn ElicitationPort>,
        metrics: Arc<AppMetrics>,
        locale: Locale,
    ) -> Self {
        Self {
            retriever,
            planner,
            store,
            gateway,
            voice,
            elicitation,
            metrics,
            locale,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Transcribe an audio file at the voice boundary, then run the turn on
    /// the resulting text.
    pub async fn handle_audio_turn(&self, user_id: &str, audio_path: &Path) -> Result<TurnReport> {
        let text = self
            .voice
            .transcribe(audio_path)
            .await
            .context("speech transcription failed")?;

        self.handle_turn(TurnInput {
            user_id: user_id.to_string(),
            text,
        })
        .await
    }

    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn handle_turn(&self, input: TurnInput) -> Result<TurnReport> {
        let started = Instant::now();
        self.metrics.inc_turn();
        let messages = MessageCatalog::for_locale(self.locale);

        self.store
            .append_turn(TurnRecord::Utterance {
                user_id: input.user_id.clone(),
                text: input.text.clone(),
                at: Utc::now(),
            })
            .await?;

        let resolved = self.planner.resolve(&input.text, self.locale).await;
        if resolved.source == PlanSource::Fallback {
            self.metrics.inc_plan_fallback();
        }
        debug!(
            action = ?resolved.plan.action,
            keywords = resolved.plan.keywords.len(),
            "plan resolved"
        );

        let mut profile = self.store.load_profile(&input.user_id).await?;

        let candidates = self.score_candidates(&resolved.plan, &profile);
        self.metrics.add_retrieval_hits(candidates.len());

        let Some(selected) = select_candidate(&candidates).cloned() else {
            self.say(messages.no_scheme()).await;
            return Ok(self.finish(
                started,
                resolved.plan,
                resolved.source,
                candidates.len(),
                TurnOutcome::NoMatch,
            ));
        };

        let scheme = selected.scheme;
        let mut verdict = selected.verdict;

        if !verdict.eligible && !verdict.missing.is_empty() {
            for field in &verdict.missing {
                self.metrics.inc_elicitation();
                self.say(&messages.ask_field(field.key())).await;
                let reply = self
                    .elicitation
                    .request_field(*field, &messages.elicit_prompt(field.key()))
                    .await?;
                field.apply(&mut profile, &reply)?;
            }

            self.store.store_profile(&input.user_id, &profile).await?;
            // single elicitation round: one re-evaluation against the same
            // scheme, no second pass even if fields are still missing
            verdict = evaluate(&profile, &scheme);
        }

        let outcome = if verdict.eligible {
            self.say(&messages.apply_start(&scheme.name)).await;

            let receipt = self
                .gateway
                .submit(&profile, &scheme)
                .await
                .context("application submission failed")?;
            self.metrics.inc_application();

            self.store
                .append_turn(TurnRecord::Outcome {
                    action: "applied".to_string(),
                    detail: serde_json::to_value(&receipt)?,
                    at: Utc::now(),
                })
                .await?;

            self.say(&messages.apply_success(&receipt.message, &receipt.application_id))
                .await;
            TurnOutcome::Applied { scheme, receipt }
        } else {
            self.say(messages.not_eligible()).await;

            let suggestions: Vec<Scheme> = candidates
                .iter()
                .filter(|candidate| candidate.scheme.id != scheme.id)
                .take(3)
                .map(|candidate| candidate.scheme.clone())
                .collect();
            for suggestion in &suggestions {
                self.say(&messages.recommend(&suggestion.name, &suggestion.description))
                    .await;
            }
            TurnOutcome::NotEligible { scheme, suggestions }
        };

        Ok(self.finish(started, resolved.plan, resolved.source, candidates.len(), outcome))
    }

    /// Catalog lookup for the driver's search command; keywords are derived
    /// the same way the plan fallback derives them.
    pub fn search_schemes(&self, query: &str) -> Vec<Scheme> {
        self.retriever
            .find(&yojana_planner::fallback_plan(query).keywords)
    }

    fn score_candidates(&self, plan: &Plan, profile: &UserProfile) -> Vec<ScoredCandidate> {
        if plan.action != PlanAction::SearchSchemes {
            return Vec::new();
        }

        self.retriever
            .find(&plan.keywords)
            .into_iter()
            .map(|scheme| {
                let verdict = evaluate(profile, &scheme);
                ScoredCandidate { scheme, verdict }
            })
            .collect()
    }

    async fn say(&self, text: &str) {
        if let Err(err) = self.voice.speak(text, self.locale).await {
            warn!(error = %err, text, "voice synthesis failed; raw text logged");
        }
    }

    fn finish(
        &self,
        started: Instant,
        plan: Plan,
        plan_source: PlanSource,
        candidates: usize,
        outcome: TurnOutcome,
    ) -> TurnReport {
        self.metrics.observe_latency(started.elapsed());
        info!(
            locale = %self.locale.as_code(),
            plan_source = ?plan_source,
            candidates,
            outcome = outcome.label(),
            "turn handled"
        );

        TurnReport {
            plan,
            plan_source,
            candidates,
            outcome,
        }
    }
}
