//! Keyword rules for local parameter extraction.
//!
//! The rule table maps each parameter to its levels and each level to a
//! list of keywords: `{"scalability": {"high": ["alta escalabilidad"]}}`.
//! Table order is priority order, both across parameters and across the
//! levels of one parameter.

use std::path::Path;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{read_file, CatalogError, Result};
use crate::params::{Level, ParamName, ParamSet};

/// Embedded default keyword rules.
pub const DEFAULT_PARAM_RULES_JSON: &str = include_str!("../data/param_rules.json");

/// How keywords are matched against the message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Keywords must start and end on word boundaries.
    #[default]
    WholeWord,
    /// Keywords may appear anywhere, even inside other words.
    Substring,
}

impl MatchMode {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "whole_word" | "word" => Some(MatchMode::WholeWord),
            "substring" => Some(MatchMode::Substring),
            _ => None,
        }
    }
}

/// Compile a case-insensitive regex for one keyword.
///
/// In whole-word mode a `\b` anchor is added only on sides where the keyword
/// begins or ends with a word character, so keywords like `24/7` or `c++`
/// still match.
pub fn keyword_regex(keyword: &str, mode: MatchMode) -> Result<Regex> {
    compile(&format!("(?i){}", keyword_pattern(keyword, mode)))
}

fn keyword_pattern(keyword: &str, mode: MatchMode) -> String {
    let keyword = keyword.trim();
    let escaped = regex::escape(keyword);
    match mode {
        MatchMode::Substring => escaped,
        MatchMode::WholeWord => {
            let lead = if keyword.chars().next().is_some_and(is_word_char) {
                r"\b"
            } else {
                ""
            };
            let tail = if keyword.chars().last().is_some_and(is_word_char) {
                r"\b"
            } else {
                ""
            };
            format!("{lead}{escaped}{tail}")
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| CatalogError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[derive(Debug)]
struct LevelRule {
    level: Level,
    pattern: Regex,
}

#[derive(Debug)]
struct ParamRule {
    param: ParamName,
    levels: Vec<LevelRule>,
}

/// Deterministic keyword matcher over the rule table.
///
/// For each parameter the first level with any matching keyword wins;
/// parameters without a match are left out of the result.
#[derive(Debug)]
pub struct ParamRuleMatcher {
    rules: Vec<ParamRule>,
    mode: MatchMode,
}

impl ParamRuleMatcher {
    pub fn from_json(json: &str, mode: MatchMode) -> Result<Self> {
        let table: IndexMap<String, IndexMap<String, Vec<String>>> = serde_json::from_str(json)?;

        let mut rules = Vec::with_capacity(table.len());
        for (param_label, levels) in table {
            let param = ParamName::from_label(&param_label)
                .ok_or(CatalogError::UnknownParameter(param_label))?;

            let mut level_rules = Vec::with_capacity(levels.len());
            for (level_label, keywords) in levels {
                let level = Level::from_label(&level_label)
                    .ok_or(CatalogError::UnknownLevel(level_label))?;

                let alternatives: Vec<String> = keywords
                    .iter()
                    .filter(|k| !k.trim().is_empty())
                    .map(|k| keyword_pattern(&k.to_lowercase(), mode))
                    .collect();
                if alternatives.is_empty() {
                    continue;
                }

                let pattern = compile(&format!("(?i)(?:{})", alternatives.join("|")))?;
                level_rules.push(LevelRule { level, pattern });
            }

            rules.push(ParamRule {
                param,
                levels: level_rules,
            });
        }

        Ok(Self { rules, mode })
    }

    pub fn from_path(path: impl AsRef<Path>, mode: MatchMode) -> Result<Self> {
        let path = path.as_ref();
        let matcher = Self::from_json(&read_file(path)?, mode)?;
        info!("Loaded parameter rules from {}", path.display());
        Ok(matcher)
    }

    /// The rule table compiled into the binary.
    pub fn embedded(mode: MatchMode) -> Result<Self> {
        Self::from_json(DEFAULT_PARAM_RULES_JSON, mode)
    }

    /// Load from `path` if given, otherwise the embedded table.
    pub fn load(path: Option<&Path>, mode: MatchMode) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path, mode),
            None => Self::embedded(mode),
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Extract every parameter whose keywords occur in `text`.
    pub fn match_text(&self, text: &str) -> ParamSet {
        let text = text.to_lowercase();
        let mut params = ParamSet::new();

        for rule in &self.rules {
            if let Some(hit) = rule.levels.iter().find(|l| l.pattern.is_match(&text)) {
                params.insert(rule.param, hit.level);
            }
        }

        debug!(matched = params.len(), "PARAM_RULES_MATCHED");
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedded() -> ParamRuleMatcher {
        ParamRuleMatcher::embedded(MatchMode::WholeWord).unwrap()
    }

    #[test]
    fn test_scalability_and_cost_from_spanish() {
        let params = embedded().match_text("necesito alta escalabilidad y bajo costo");

        assert_eq!(params.get(ParamName::Scalability), Some(Level::High));
        assert_eq!(params.get(ParamName::Cost), Some(Level::Low));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_matching_ignores_case() {
        let params = embedded().match_text("Necesito ALTA DISPONIBILIDAD");
        assert_eq!(params.get(ParamName::Availability), Some(Level::High));
    }

    #[test]
    fn test_no_keywords_yields_empty_set() {
        assert!(embedded().match_text("hola, ¿qué tal?").is_empty());
        assert!(embedded().match_text("").is_empty());
    }

    #[test]
    fn test_first_level_in_table_order_wins() {
        let json = r#"{"cost": {"high": ["caro"], "low": ["barato"]}}"#;
        let matcher = ParamRuleMatcher::from_json(json, MatchMode::WholeWord).unwrap();

        let params = matcher.match_text("ni caro ni barato");
        assert_eq!(params.get(ParamName::Cost), Some(Level::High));
    }

    #[test]
    fn test_whole_word_vs_substring() {
        let json = r#"{"complexity": {"low": ["simple"]}}"#;

        let whole = ParamRuleMatcher::from_json(json, MatchMode::WholeWord).unwrap();
        assert!(whole.match_text("simplemente funciona").is_empty());
        assert_eq!(
            whole.match_text("algo simple").get(ParamName::Complexity),
            Some(Level::Low)
        );

        let substring = ParamRuleMatcher::from_json(json, MatchMode::Substring).unwrap();
        assert_eq!(
            substring.match_text("simplemente funciona").get(ParamName::Complexity),
            Some(Level::Low)
        );
    }

    #[test]
    fn test_keywords_with_symbols() {
        let json = r#"{"availability": {"high": ["24/7"]}}"#;
        let matcher = ParamRuleMatcher::from_json(json, MatchMode::WholeWord).unwrap();

        let params = matcher.match_text("debe operar 24/7.");
        assert_eq!(params.get(ParamName::Availability), Some(Level::High));
    }

    #[test]
    fn test_rejects_unknown_names() {
        let bad_param = r#"{"budget": {"low": ["barato"]}}"#;
        assert!(matches!(
            ParamRuleMatcher::from_json(bad_param, MatchMode::WholeWord),
            Err(CatalogError::UnknownParameter(_))
        ));

        let bad_level = r#"{"cost": {"extreme": ["carísimo"]}}"#;
        assert!(matches!(
            ParamRuleMatcher::from_json(bad_level, MatchMode::WholeWord),
            Err(CatalogError::UnknownLevel(_))
        ));
    }

    #[test]
    fn test_keyword_regex() {
        let re = keyword_regex("tiempo real", MatchMode::WholeWord).unwrap();
        assert!(re.is_match("Necesito TIEMPO REAL"));
        assert!(!re.is_match("tiempo realista"));
    }

    #[test]
    fn test_match_mode_labels() {
        assert_eq!(MatchMode::from_label("substring"), Some(MatchMode::Substring));
        assert_eq!(MatchMode::from_label("WHOLE_WORD"), Some(MatchMode::WholeWord));
        assert_eq!(MatchMode::from_label("fuzzy"), None);
    }
}
