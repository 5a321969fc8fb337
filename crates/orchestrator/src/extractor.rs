//! Hybrid parameter extraction: keyword rules plus the oracle.

use std::sync::Arc;

use catalog::{Level, ParamName, ParamRuleMatcher, ParamSet};
use oracle_core::{extract_json, OracleError, TextOracle};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::prompts::{extraction_user_prompt, EXTRACTION_SYSTEM_PROMPT};

/// How local and oracle extractions are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// A known oracle value wins, otherwise the local one.
    #[default]
    LlmOverrides,
    /// Average both values when both are known.
    Average,
}

impl MergePolicy {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "llm_overrides" | "llm" => Some(MergePolicy::LlmOverrides),
            "average" | "avg" => Some(MergePolicy::Average),
            _ => None,
        }
    }
}

/// Parse the oracle's JSON reply into known parameters.
///
/// Unknown keys and values such as `"unknown"` are dropped.
pub fn parse_oracle_params(reply: &str) -> Result<ParamSet, OracleError> {
    let json = extract_json(reply);
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| OracleError::InvalidResponse(format!("extraction is not JSON: {}", e)))?;

    if !value.is_object() {
        return Err(OracleError::InvalidResponse(
            "extraction is not a JSON object".to_string(),
        ));
    }

    Ok(ParamSet::from_json_value(&value))
}

/// Combine the two extractions key by key.
pub fn merge(local: &ParamSet, remote: &ParamSet, policy: MergePolicy) -> ParamSet {
    ParamName::ALL
        .iter()
        .filter_map(|&name| {
            let level = match (local.get(name), remote.get(name), policy) {
                (_, Some(remote), MergePolicy::LlmOverrides) => remote,
                (Some(local), Some(remote), MergePolicy::Average) => {
                    let avg = f64::from(local.value() + remote.value()) / 2.0;
                    Level::from_average(avg)
                }
                (_, Some(remote), MergePolicy::Average) => remote,
                (Some(local), None, _) => local,
                (None, None, _) => return None,
            };
            Some((name, level))
        })
        .collect()
}

/// Extracts requirement levels from a user message.
///
/// Extraction never fails: when the oracle is unavailable or replies with
/// garbage, only the keyword matches are returned.
pub struct HybridParamExtractor {
    matcher: Arc<ParamRuleMatcher>,
    oracle: Arc<dyn TextOracle>,
    policy: MergePolicy,
}

impl HybridParamExtractor {
    pub fn new(
        matcher: Arc<ParamRuleMatcher>,
        oracle: Arc<dyn TextOracle>,
        policy: MergePolicy,
    ) -> Self {
        Self {
            matcher,
            oracle,
            policy,
        }
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    pub async fn extract(&self, message: &str) -> ParamSet {
        let local = self.matcher.match_text(message);

        let remote = match self
            .oracle
            .complete(EXTRACTION_SYSTEM_PROMPT, &extraction_user_prompt(message))
            .await
        {
            Ok(reply) => {
                debug!(raw_response = %reply, "EXTRACTION_RAW_RESPONSE");
                parse_oracle_params(&reply).unwrap_or_else(|e| {
                    warn!(error = %e, "EXTRACTION_PARSE_FAILED");
                    ParamSet::new()
                })
            }
            Err(e) => {
                warn!(error = %e, "EXTRACTION_ORACLE_FAILED");
                ParamSet::new()
            }
        };

        let merged = merge(&local, &remote, self.policy);
        debug!(
            local = local.len(),
            remote = remote.len(),
            merged = merged.len(),
            "PARAMS_EXTRACTED"
        );
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::MatchMode;
    use mock_oracle::{FailingOracle, ScriptedOracle};

    fn matcher() -> Arc<ParamRuleMatcher> {
        Arc::new(ParamRuleMatcher::embedded(MatchMode::WholeWord).unwrap())
    }

    fn set(pairs: &[(ParamName, Level)]) -> ParamSet {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_parse_fenced_reply() {
        let reply = "Here you go:\n```json\n{\"scalability\": \"high\", \"cost\": \"unknown\", \"mood\": \"high\"}\n```";
        let params = parse_oracle_params(reply).unwrap();

        assert_eq!(params, set(&[(ParamName::Scalability, Level::High)]));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(
            parse_oracle_params("I cannot help with that"),
            Err(OracleError::InvalidResponse(_))
        ));
        assert!(parse_oracle_params("[1, 2]").is_err());
    }

    #[test]
    fn test_llm_overrides_merge() {
        let local = set(&[(ParamName::Cost, Level::Low), (ParamName::Security, Level::High)]);
        let remote = set(&[(ParamName::Cost, Level::High), (ParamName::Latency, Level::Low)]);

        let merged = merge(&local, &remote, MergePolicy::LlmOverrides);
        assert_eq!(
            merged,
            set(&[
                (ParamName::Cost, Level::High),
                (ParamName::Security, Level::High),
                (ParamName::Latency, Level::Low),
            ])
        );
    }

    #[test]
    fn test_average_merge() {
        let local = set(&[(ParamName::Cost, Level::Low), (ParamName::Security, Level::High)]);
        let remote = set(&[
            (ParamName::Cost, Level::High),
            (ParamName::Security, Level::Medium),
            (ParamName::Latency, Level::Low),
        ]);

        let merged = merge(&local, &remote, MergePolicy::Average);
        assert_eq!(merged.get(ParamName::Cost), Some(Level::Medium));
        assert_eq!(merged.get(ParamName::Security), Some(Level::High));
        assert_eq!(merged.get(ParamName::Latency), Some(Level::Low));
    }

    #[test]
    fn test_merge_policy_labels() {
        assert_eq!(MergePolicy::from_label("average"), Some(MergePolicy::Average));
        assert_eq!(MergePolicy::from_label("LLM_OVERRIDES"), Some(MergePolicy::LlmOverrides));
        assert_eq!(MergePolicy::from_label("max"), None);
    }

    #[tokio::test]
    async fn test_extract_with_failing_oracle_uses_rules() {
        let extractor = HybridParamExtractor::new(
            matcher(),
            Arc::new(FailingOracle::unavailable()),
            MergePolicy::LlmOverrides,
        );

        let params = extractor.extract("necesito alta escalabilidad y bajo costo").await;
        assert_eq!(
            params,
            set(&[(ParamName::Scalability, Level::High), (ParamName::Cost, Level::Low)])
        );
    }

    #[tokio::test]
    async fn test_extract_prefers_oracle_values() {
        let oracle = ScriptedOracle::new().when(
            EXTRACTION_SYSTEM_PROMPT,
            r#"{"scalability": "medium", "availability": "alta"}"#,
        );
        let extractor =
            HybridParamExtractor::new(matcher(), Arc::new(oracle), MergePolicy::LlmOverrides);

        let params = extractor.extract("necesito alta escalabilidad y bajo costo").await;
        assert_eq!(params.get(ParamName::Scalability), Some(Level::Medium));
        assert_eq!(params.get(ParamName::Cost), Some(Level::Low));
        assert_eq!(params.get(ParamName::Availability), Some(Level::High));
    }

    #[tokio::test]
    async fn test_garbage_reply_is_ignored() {
        let oracle = ScriptedOracle::new().when(EXTRACTION_SYSTEM_PROMPT, "{not json");
        let extractor =
            HybridParamExtractor::new(matcher(), Arc::new(oracle), MergePolicy::LlmOverrides);

        let params = extractor.extract("hola").await;
        assert!(params.is_empty());
    }
}
