//! Main orchestrator that coordinates message processing.

use std::sync::Arc;

use catalog::{Catalog, ParamRuleMatcher, ScoringEngine};
use oracle_core::{TextOracle, TimeoutOracle, Turn};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::actions::{Action, EvaluationStep};
use crate::compare::ArchitectureNameExtractor;
use crate::config::OrchestratorConfig;
use crate::conversation::Conversation;
use crate::error::{AssistantError, MISSING_USER_ID_MESSAGE};
use crate::extractor::HybridParamExtractor;
use crate::intent::{IntentClassifier, IntentRules};
use crate::locks::UserLocks;
use crate::responder::{
    clarification_reply, evaluation_reply, Responder, ARCHIVE_REPLY, INSUFFICIENT_INFO_REPLY,
    SUGGESTION_TEXT,
};
use crate::state::{ConversationState, StateMachine};
use crate::store::ConversationStore;

/// One inbound user message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

impl AssistantRequest {
    pub fn new(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_id: Some(user_id.into()),
            conversation_id: None,
        }
    }

    pub fn in_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }
}

/// The assistant's answer to one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub reply: String,
    pub conversation_id: String,
    pub state: ConversationState,
    /// Set when the message closed the conversation it arrived in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

/// Reply text plus whether the conversation was closed.
struct Outcome {
    reply: String,
    archived: bool,
}

impl Outcome {
    fn reply(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            archived: false,
        }
    }
}

/// Drives one conversation turn from classification to commit.
///
/// The orchestrator:
/// - Classifies each message (oracle first, rules as fallback)
/// - Picks an action with the pure [`StateMachine`]
/// - Collects parameters and ranks the catalog for evaluations
/// - Writes replies through the [`Responder`]
/// - Serializes messages per user and keeps one active conversation each
pub struct Orchestrator<S: ConversationStore> {
    store: S,
    oracle: Arc<dyn TextOracle>,
    catalog: Arc<Catalog>,
    classifier: IntentClassifier,
    extractor: HybridParamExtractor,
    names: ArchitectureNameExtractor,
    engine: ScoringEngine,
    responder: Responder,
    machine: StateMachine,
    locks: UserLocks,
}

impl<S: ConversationStore> Orchestrator<S> {
    /// Create an orchestrator, loading the static tables named by `config`.
    pub fn new(
        config: &OrchestratorConfig,
        store: S,
        oracle: Arc<dyn TextOracle>,
    ) -> Result<Self, AssistantError> {
        let catalog = Catalog::load(config.catalog_path.as_deref())?;
        let matcher =
            ParamRuleMatcher::load(config.param_rules_path.as_deref(), config.match_mode)?;
        let rules = IntentRules::load(config.intent_rules_path.as_deref())?;

        Self::from_parts(config, store, oracle, catalog, matcher, rules)
    }

    /// Create an orchestrator from already loaded tables.
    ///
    /// Every oracle call is bounded by `config.oracle_timeout`.
    pub fn from_parts(
        config: &OrchestratorConfig,
        store: S,
        oracle: Arc<dyn TextOracle>,
        catalog: Catalog,
        matcher: ParamRuleMatcher,
        rules: IntentRules,
    ) -> Result<Self, AssistantError> {
        let oracle: Arc<dyn TextOracle> =
            Arc::new(TimeoutOracle::new(oracle, config.oracle_timeout));
        let catalog = Arc::new(catalog);

        let classifier = IntentClassifier::new(oracle.clone(), Arc::new(rules));
        let extractor =
            HybridParamExtractor::new(Arc::new(matcher), oracle.clone(), config.merge_policy);
        let names = ArchitectureNameExtractor::new(oracle.clone(), catalog.clone())?;
        let responder = Responder::new(oracle.clone(), catalog.clone(), config.transcript_turns);

        info!(
            oracle = oracle.name(),
            architectures = catalog.len(),
            merge_policy = ?config.merge_policy,
            "Orchestrator initialized"
        );

        Ok(Self {
            store,
            oracle,
            engine: ScoringEngine::new(catalog.clone()),
            catalog,
            classifier,
            extractor,
            names,
            responder,
            machine: StateMachine::new(config.suggest_after_questions, config.suggest_after_known),
            locks: UserLocks::new(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Whether messages can currently be processed.
    pub async fn oracle_ready(&self) -> bool {
        self.oracle.is_ready().await
    }

    /// Process one user message and commit the resulting conversation.
    pub async fn process_message(
        &self,
        request: AssistantRequest,
    ) -> Result<AssistantReply, AssistantError> {
        let user_id = validate_user_id(request.user_id.as_deref())?;

        if !self.oracle.is_ready().await {
            warn!(oracle = self.oracle.name(), "ORACLE_NOT_CONFIGURED");
            return Err(AssistantError::Configuration(format!(
                "oracle {} is not configured",
                self.oracle.name()
            )));
        }

        let _guard = self.locks.acquire(user_id).await;

        let mut conversation = self
            .store
            .active_or_create(user_id, request.conversation_id.as_deref())
            .await?;
        conversation.push_user(&request.message);

        let intent = self.classifier.classify(&request.message).await;
        conversation.intent = Some(intent);

        let action = self.machine.next_action(conversation.state, intent);
        info!(
            user_id,
            conversation_id = %conversation.id,
            intent = %intent,
            action = ?action,
            state = %conversation.state,
            "MESSAGE_CLASSIFIED"
        );

        let outcome = match action {
            Action::Evaluate { force } => {
                self.evaluate(&mut conversation, &request.message, force).await
            }
            Action::StartEvaluation => {
                self.start_evaluation(&mut conversation, &request.message).await
            }
            Action::Compare => self.compare(&request.message).await,
            Action::AnswerQuestion => Outcome::reply(
                self.responder
                    .answer_question(&request.message, &conversation.history)
                    .await,
            ),
            Action::Archive => return self.archive(conversation).await,
        };

        conversation.push_assistant(&outcome.reply);
        self.store.save(&conversation).await?;

        info!(
            user_id,
            conversation_id = %conversation.id,
            state = %conversation.state,
            archived = outcome.archived,
            "MESSAGE_COMMITTED"
        );

        Ok(AssistantReply {
            reply: outcome.reply,
            conversation_id: conversation.id,
            state: conversation.state,
            archived: outcome.archived.then_some(true),
        })
    }

    /// Every conversation of `user_id`, most recently updated first.
    pub async fn history(&self, user_id: &str) -> Result<Vec<Conversation>, AssistantError> {
        let user_id = validate_user_id(Some(user_id))?;
        Ok(self.store.list_for_user(user_id).await?)
    }

    async fn evaluate(
        &self,
        conversation: &mut Conversation,
        message: &str,
        force: bool,
    ) -> Outcome {
        conversation.state = ConversationState::EvaluationStarted;

        if !force {
            let extracted = self.extractor.extract(message).await;
            conversation.update_params(&extracted);
        }

        match self
            .machine
            .plan_evaluation(conversation, self.catalog.parameters(), force)
        {
            EvaluationStep::Score => self.score(conversation).await,
            EvaluationStep::Ask { missing, suggest } => {
                debug!(
                    conversation_id = %conversation.id,
                    missing = missing.len(),
                    suggest,
                    "ASKING_FOR_PARAMETERS"
                );
                let question = self
                    .responder
                    .ask_for_parameters(&missing, &conversation.history)
                    .await;
                conversation.questions_asked += 1;

                if suggest {
                    conversation.suggestion_given = true;
                    Outcome::reply(format!("{}\n\n{}", SUGGESTION_TEXT, question))
                } else {
                    Outcome::reply(question)
                }
            }
        }
    }

    async fn score(&self, conversation: &mut Conversation) -> Outcome {
        let ranking = self.engine.rank(&conversation.params);
        if ranking.is_empty() {
            debug!(conversation_id = %conversation.id, "NO_PARAMETERS_TO_SCORE");
            return Outcome::reply(INSUFFICIENT_INFO_REPLY);
        }

        let explanation = self.responder.explain(&ranking, &conversation.params).await;
        conversation.state = ConversationState::Completed;
        conversation.archive();

        Outcome {
            reply: evaluation_reply(&ranking, &explanation),
            archived: true,
        }
    }

    async fn start_evaluation(&self, conversation: &mut Conversation, message: &str) -> Outcome {
        let missing = conversation.params.missing(self.catalog.parameters());
        if missing.is_empty() {
            return self.evaluate(conversation, message, true).await;
        }

        conversation.state = ConversationState::EvaluationStarted;
        let question = self
            .responder
            .ask_for_parameters(&missing, &conversation.history)
            .await;
        conversation.questions_asked += 1;
        Outcome::reply(question)
    }

    async fn compare(&self, message: &str) -> Outcome {
        let names = self.names.extract(message).await;
        match names.as_slice() {
            [first, second] => Outcome::reply(self.responder.compare(first, second).await),
            _ => {
                debug!(found = names.len(), "COMPARISON_NEEDS_TWO_ARCHITECTURES");
                Outcome::reply(clarification_reply(&self.catalog))
            }
        }
    }

    /// Close the current conversation and open a fresh one holding the
    /// confirmation.
    async fn archive(&self, mut current: Conversation) -> Result<AssistantReply, AssistantError> {
        current.archive();
        let fresh = self
            .store
            .archive_and_start(&current, &[Turn::assistant(ARCHIVE_REPLY)])
            .await?;

        info!(
            user_id = %current.user_id,
            archived_id = %current.id,
            conversation_id = %fresh.id,
            "CONVERSATION_ARCHIVED"
        );

        Ok(AssistantReply {
            reply: ARCHIVE_REPLY.to_string(),
            conversation_id: fresh.id,
            state: fresh.state,
            archived: Some(true),
        })
    }
}

fn validate_user_id(user_id: Option<&str>) -> Result<&str, AssistantError> {
    user_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AssistantError::Validation(MISSING_USER_ID_MESSAGE.to_string()))
}
