//! Architecture names mentioned in a comparison request.

use std::sync::Arc;

use catalog::{keyword_regex, Catalog, CatalogError, MatchMode};
use oracle_core::{extract_json, OracleError, TextOracle};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::prompts::{names_user_prompt, NAMES_SYSTEM_PROMPT};

#[derive(Debug, Deserialize)]
struct NamesReply {
    #[serde(default)]
    architectures: Vec<String>,
}

/// Parse `{"architectures": [...]}` from an oracle reply.
pub fn parse_names_reply(reply: &str) -> Result<Vec<String>, OracleError> {
    let parsed: NamesReply = serde_json::from_str(extract_json(reply))
        .map_err(|e| OracleError::InvalidResponse(format!("names reply is not JSON: {}", e)))?;
    Ok(parsed
        .architectures
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}

/// Finds which architectures a message talks about.
pub struct ArchitectureNameExtractor {
    oracle: Arc<dyn TextOracle>,
    catalog: Arc<Catalog>,
    /// Canonical name plus one whole-word pattern per name or alias.
    patterns: Vec<(String, Vec<Regex>)>,
}

impl ArchitectureNameExtractor {
    pub fn new(oracle: Arc<dyn TextOracle>, catalog: Arc<Catalog>) -> Result<Self, CatalogError> {
        let mut patterns = Vec::with_capacity(catalog.len());
        for profile in catalog.profiles() {
            let regexes = std::iter::once(&profile.name)
                .chain(profile.aliases.iter())
                .map(|term| keyword_regex(&term.to_lowercase(), MatchMode::WholeWord))
                .collect::<Result<Vec<_>, _>>()?;
            patterns.push((profile.name.clone(), regexes));
        }

        Ok(Self {
            oracle,
            catalog,
            patterns,
        })
    }

    /// Distinct architecture names, in the order the user mentioned them.
    ///
    /// Names found in the catalog are replaced by their canonical form;
    /// others are kept as written.
    pub async fn extract(&self, message: &str) -> Vec<String> {
        let from_oracle = match self
            .oracle
            .complete(NAMES_SYSTEM_PROMPT, &names_user_prompt(message))
            .await
        {
            Ok(reply) => {
                debug!(raw_response = %reply, "NAMES_RAW_RESPONSE");
                parse_names_reply(&reply).unwrap_or_else(|e| {
                    warn!(error = %e, "NAMES_PARSE_FAILED");
                    Vec::new()
                })
            }
            Err(e) => {
                warn!(error = %e, "NAMES_ORACLE_FAILED");
                Vec::new()
            }
        };

        let names = if from_oracle.is_empty() {
            self.scan(message)
        } else {
            self.canonicalize(from_oracle)
        };

        debug!(names = ?names, "ARCHITECTURES_EXTRACTED");
        names
    }

    /// Local scan of catalog names and aliases, ordered by first mention.
    pub fn scan(&self, message: &str) -> Vec<String> {
        let text = message.to_lowercase();
        let mut found: Vec<(usize, &str)> = self
            .patterns
            .iter()
            .filter_map(|(name, regexes)| {
                regexes
                    .iter()
                    .filter_map(|re| re.find(&text).map(|m| m.start()))
                    .min()
                    .map(|pos| (pos, name.as_str()))
            })
            .collect();
        found.sort_by_key(|(pos, _)| *pos);
        found.into_iter().map(|(_, name)| name.to_string()).collect()
    }

    fn canonicalize(&self, names: Vec<String>) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            let resolved = self
                .catalog
                .find(&name)
                .map(|profile| profile.name.clone())
                .unwrap_or(name);
            if !out.iter().any(|seen| seen.eq_ignore_ascii_case(&resolved)) {
                out.push(resolved);
            }
        }
        out
    }
}
