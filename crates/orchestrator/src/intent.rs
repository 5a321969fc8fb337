//! Intent classification: oracle first, regex rules as fallback.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use catalog::CatalogError;
use oracle_core::{hash_prompt, TextOracle};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::prompts::{intent_user_prompt, INTENT_SYSTEM_PROMPT};

/// Default intent rule table.
pub const DEFAULT_INTENT_RULES_JSON: &str = include_str!("../data/intent_rules.json");

/// What the user wants from a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Evaluate,
    ForceEvaluate,
    Compare,
    GeneralQuestion,
    Archive,
    Unclassified,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Evaluate => "evaluate",
            Intent::ForceEvaluate => "force_evaluate",
            Intent::Compare => "compare",
            Intent::GeneralQuestion => "general_question",
            Intent::Archive => "archive",
            Intent::Unclassified => "unclassified",
        }
    }

    /// Parse an English or Spanish label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "evaluate" | "evaluar" => Some(Intent::Evaluate),
            "force_evaluate" | "forzar_evaluacion" | "forzar_evaluación" => {
                Some(Intent::ForceEvaluate)
            }
            "compare" | "comparar" => Some(Intent::Compare),
            "general_question" | "inform" | "informar" | "pregunta_general" => {
                Some(Intent::GeneralQuestion)
            }
            "archive" | "archivar" => Some(Intent::Archive),
            "unclassified" | "unknown" => Some(Intent::Unclassified),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interpret a classification reply from the oracle.
///
/// Returns `None` when the reply is neither a known label nor an explicit
/// refusal, in which case the caller falls back to the rules.
pub fn parse_oracle_label(reply: &str) -> Option<Intent> {
    let normalized = reply
        .trim()
        .to_lowercase()
        .replace(['"', '\'', '`'], "");
    let normalized = normalized
        .trim()
        .trim_end_matches(['.', '!', ',', ';', ':'])
        .trim();

    if let Some(intent) = Intent::from_label(normalized) {
        return Some(intent);
    }

    if normalized.contains("no puedo clasificar") {
        return Some(Intent::Unclassified);
    }

    None
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    default: String,
    rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    intent: String,
    groups: Vec<GroupEntry>,
}

#[derive(Debug, Deserialize)]
struct GroupEntry {
    #[serde(rename = "type", default)]
    kind: GroupKind,
    patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum GroupKind {
    All,
    #[default]
    Any,
}

#[derive(Debug)]
struct RuleGroup {
    kind: GroupKind,
    patterns: Vec<Regex>,
}

impl RuleGroup {
    fn is_satisfied(&self, text: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        match self.kind {
            GroupKind::All => self.patterns.iter().all(|p| p.is_match(text)),
            GroupKind::Any => self.patterns.iter().any(|p| p.is_match(text)),
        }
    }
}

/// Compiled intent rules, tried in file order.
#[derive(Debug)]
pub struct IntentRules {
    rules: Vec<(Intent, Vec<RuleGroup>)>,
    default: Intent,
}

impl IntentRules {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: RuleFile = serde_json::from_str(json)?;

        let default =
            Intent::from_label(&file.default).ok_or(CatalogError::UnknownIntent(file.default))?;

        let mut rules = Vec::with_capacity(file.rules.len());
        for entry in file.rules {
            let intent =
                Intent::from_label(&entry.intent).ok_or(CatalogError::UnknownIntent(entry.intent))?;

            let mut groups = Vec::with_capacity(entry.groups.len());
            for group in entry.groups {
                let patterns = group
                    .patterns
                    .iter()
                    .map(|p| {
                        Regex::new(&format!("(?i){}", p)).map_err(|source| {
                            CatalogError::InvalidPattern {
                                pattern: p.clone(),
                                source,
                            }
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                groups.push(RuleGroup {
                    kind: group.kind,
                    patterns,
                });
            }
            rules.push((intent, groups));
        }

        Ok(Self { rules, default })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let rules = Self::from_json(&json)?;
        info!("Loaded intent rules from {}", path.display());
        Ok(rules)
    }

    /// The rule table compiled into the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_INTENT_RULES_JSON)
    }

    /// Load from `path` if given, otherwise the embedded table.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    /// First intent with a satisfied group, or the default.
    pub fn classify(&self, message: &str) -> Intent {
        let text = message.to_lowercase();
        self.rules
            .iter()
            .find(|(_, groups)| groups.iter().any(|g| g.is_satisfied(&text)))
            .map(|(intent, _)| *intent)
            .unwrap_or(self.default)
    }
}

/// Classifies messages with the oracle, falling back to the rule table.
///
/// Classification never fails.
pub struct IntentClassifier {
    oracle: Arc<dyn TextOracle>,
    rules: Arc<IntentRules>,
}

impl IntentClassifier {
    pub fn new(oracle: Arc<dyn TextOracle>, rules: Arc<IntentRules>) -> Self {
        info!(
            "Intent prompt fingerprint: {}",
            hash_prompt(INTENT_SYSTEM_PROMPT)
        );
        Self { oracle, rules }
    }

    pub async fn classify(&self, message: &str) -> Intent {
        match self
            .oracle
            .complete(INTENT_SYSTEM_PROMPT, &intent_user_prompt(message))
            .await
        {
            Ok(reply) => {
                debug!(raw_response = %reply, "INTENT_RAW_RESPONSE");
                match parse_oracle_label(&reply) {
                    Some(intent) => {
                        debug!(intent = %intent, source = "oracle", "INTENT_CLASSIFIED");
                        intent
                    }
                    None => {
                        warn!(raw_response = %reply, "INTENT_UNEXPECTED_LABEL");
                        self.classify_with_rules(message)
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "INTENT_ORACLE_FAILED");
                self.classify_with_rules(message)
            }
        }
    }

    /// Deterministic classification with the rule table only.
    pub fn classify_with_rules(&self, message: &str) -> Intent {
        let intent = self.rules.classify(message);
        debug!(intent = %intent, source = "rules", "INTENT_CLASSIFIED");
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_oracle::{FailingOracle, ScriptedOracle};

    fn rules() -> Arc<IntentRules> {
        Arc::new(IntentRules::embedded().unwrap())
    }

    fn rule_classifier() -> IntentClassifier {
        IntentClassifier::new(Arc::new(FailingOracle::unavailable()), rules())
    }

    #[test]
    fn test_labels_and_aliases() {
        assert_eq!(Intent::from_label("evaluar"), Some(Intent::Evaluate));
        assert_eq!(Intent::from_label("forzar_evaluacion"), Some(Intent::ForceEvaluate));
        assert_eq!(Intent::from_label("inform"), Some(Intent::GeneralQuestion));
        assert_eq!(Intent::from_label("pregunta_general"), Some(Intent::GeneralQuestion));
        assert_eq!(Intent::from_label("ARCHIVAR"), Some(Intent::Archive));
        assert_eq!(Intent::from_label("unknown"), Some(Intent::Unclassified));
        assert_eq!(Intent::from_label("greet"), None);
    }

    #[test]
    fn test_parse_oracle_label_normalizes() {
        assert_eq!(parse_oracle_label("  \"Evaluate\".\n"), Some(Intent::Evaluate));
        assert_eq!(parse_oracle_label("'archivar'!"), Some(Intent::Archive));
        assert_eq!(parse_oracle_label("compare"), Some(Intent::Compare));
        assert_eq!(
            parse_oracle_label("No puedo clasificar la consulta."),
            Some(Intent::Unclassified)
        );
        assert_eq!(parse_oracle_label("I think the user wants help"), None);
    }

    #[test]
    fn test_rules_classify_spanish_messages() {
        let classifier = rule_classifier();

        assert_eq!(
            classifier.classify_with_rules("archivar conversación"),
            Intent::Archive
        );
        assert_eq!(classifier.classify_with_rules("evalúa ya"), Intent::ForceEvaluate);
        assert_eq!(
            classifier.classify_with_rules("compara monolítica y microservicios"),
            Intent::Compare
        );
        assert_eq!(
            classifier.classify_with_rules("necesito alta escalabilidad y bajo costo"),
            Intent::Evaluate
        );
        assert_eq!(
            classifier.classify_with_rules("la seguridad debe ser alta"),
            Intent::Evaluate
        );
        assert_eq!(classifier.classify_with_rules("Bajo."), Intent::Evaluate);
        assert_eq!(
            classifier.classify_with_rules("¿qué es un service mesh?"),
            Intent::GeneralQuestion
        );
    }

    #[test]
    fn test_rules_are_idempotent() {
        let classifier = rule_classifier();
        for message in ["reset", "microservicios vs monolito", "hola", "evalúa ya"] {
            assert_eq!(
                classifier.classify_with_rules(message),
                classifier.classify_with_rules(message)
            );
        }
    }

    #[test]
    fn test_custom_rule_table() {
        let rules = IntentRules::from_json(
            r#"{"default": "unclassified", "rules": [
                {"intent": "compare", "groups": [{"type": "all", "patterns": ["foo", "bar"]}]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(rules.classify("FOO and BAR"), Intent::Compare);
        assert_eq!(rules.classify("foo only"), Intent::Unclassified);
    }

    #[test]
    fn test_invalid_tables_are_rejected() {
        let err = IntentRules::from_json(r#"{"default": "chat", "rules": []}"#).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownIntent(label) if label == "chat"));

        let err = IntentRules::from_json(
            r#"{"default": "evaluate", "rules": [
                {"intent": "archive", "groups": [{"type": "any", "patterns": ["(unclosed"]}]}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPattern { .. }));
    }

    #[tokio::test]
    async fn test_oracle_label_wins_over_rules() {
        let oracle = ScriptedOracle::new().when(INTENT_SYSTEM_PROMPT, "compare");
        let classifier = IntentClassifier::new(Arc::new(oracle), rules());

        assert_eq!(classifier.classify("archivar conversación").await, Intent::Compare);
    }

    #[tokio::test]
    async fn test_unexpected_reply_falls_back_to_rules() {
        let oracle = ScriptedOracle::new().when(INTENT_SYSTEM_PROMPT, "The user wants to archive.");
        let classifier = IntentClassifier::new(Arc::new(oracle), rules());

        assert_eq!(classifier.classify("archivar conversación").await, Intent::Archive);
    }

    #[tokio::test]
    async fn test_oracle_failure_falls_back_to_rules() {
        let classifier = rule_classifier();
        assert_eq!(classifier.classify("archivar conversación").await, Intent::Archive);
    }

    #[tokio::test]
    async fn test_explicit_refusal_is_unclassified() {
        let oracle = ScriptedOracle::new()
            .when(INTENT_SYSTEM_PROMPT, "no puedo clasificar la consulta");
        let classifier = IntentClassifier::new(Arc::new(oracle), rules());

        assert_eq!(classifier.classify("necesito algo").await, Intent::Unclassified);
    }
}
