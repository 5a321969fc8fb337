//! Distance-based ranking of the architecture catalog.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::params::ParamSet;
use crate::profile::{ArchitectureProfile, Catalog};

/// Fit of one architecture to the user's parameters, in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureScore {
    pub name: String,
    pub score: f64,
}

/// Score one profile against the known parameters.
///
/// Each parameter rated by both sides contributes a distance
/// `|user - arch| / 2`; the score is one minus the mean distance. A profile
/// sharing no parameters with the user scores 0.
pub fn score_profile(profile: &ArchitectureProfile, params: &ParamSet) -> f64 {
    let mut total = 0.0;
    let mut considered = 0usize;

    for (name, level) in params.iter() {
        if let Some(arch_level) = profile.level(name) {
            let distance = (f64::from(level.value()) - f64::from(arch_level.value())).abs() / 2.0;
            total += distance;
            considered += 1;
        }
    }

    if considered == 0 {
        return 0.0;
    }

    1.0 - total / considered as f64
}

/// Ranks the catalog against a conversation's parameters.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    catalog: Arc<Catalog>,
}

impl ScoringEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Score every architecture, best first.
    ///
    /// Ties keep catalog order. When none of the known parameters is rated
    /// by any architecture the result is empty, which callers treat as "not
    /// enough information".
    pub fn rank(&self, params: &ParamSet) -> Vec<ArchitectureScore> {
        let rated = self.catalog.parameters();
        if !params.iter().any(|(name, _)| rated.contains(&name)) {
            debug!(params = params.len(), "NO_RATED_PARAMETERS");
            return Vec::new();
        }

        let mut scores: Vec<ArchitectureScore> = self
            .catalog
            .profiles()
            .iter()
            .map(|profile| ArchitectureScore {
                name: profile.name.clone(),
                score: score_profile(profile, params),
            })
            .collect();

        // sort_by is stable
        scores.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            params = params.len(),
            top = scores.first().map(|s| s.name.as_str()).unwrap_or(""),
            "CATALOG_RANKED"
        );
        scores
    }
}

/// Render a ranking as `name: 0.83` lines.
pub fn format_ranking(scores: &[ArchitectureScore]) -> String {
    scores
        .iter()
        .map(|s| format!("{}: {:.2}", s.name, s.score))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Level, ParamName};

    fn two_entry_catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::from_json(
                r#"[
                    {"name": "Microservices", "scalability": "high", "cost": "high"},
                    {"name": "Monolith", "scalability": "low", "cost": "low"}
                ]"#,
            )
            .unwrap(),
        )
    }

    fn params(pairs: &[(ParamName, Level)]) -> ParamSet {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_tie_keeps_catalog_order() {
        let engine = ScoringEngine::new(two_entry_catalog());
        let ranking = engine.rank(&params(&[
            (ParamName::Scalability, Level::High),
            (ParamName::Cost, Level::Low),
        ]));

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].name, "Microservices");
        assert_eq!(ranking[1].name, "Monolith");
        assert!((ranking[0].score - 0.5).abs() < f64::EPSILON);
        assert!((ranking[1].score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_identical_profile_scores_one() {
        let engine = ScoringEngine::new(two_entry_catalog());
        let ranking = engine.rank(&params(&[
            (ParamName::Scalability, Level::Low),
            (ParamName::Cost, Level::Low),
        ]));

        assert_eq!(ranking[0].name, "Monolith");
        assert_eq!(ranking[0].score, 1.0);
        assert_eq!(ranking[1].score, 0.0);
    }

    #[test]
    fn test_empty_params_yield_empty_ranking() {
        let engine = ScoringEngine::new(two_entry_catalog());
        assert!(engine.rank(&ParamSet::new()).is_empty());
    }

    #[test]
    fn test_unrated_params_yield_empty_ranking() {
        let catalog = Catalog::from_json(
            r#"[
                {"name": "A", "scalability": "high"},
                {"name": "B", "scalability": "low"}
            ]"#,
        )
        .unwrap();
        let engine = ScoringEngine::new(Arc::new(catalog));

        assert!(engine.rank(&params(&[(ParamName::Latency, Level::Low)])).is_empty());

        let ranking = engine.rank(&params(&[
            (ParamName::Latency, Level::Low),
            (ParamName::Scalability, Level::Low),
        ]));
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].name, "B");
    }

    #[test]
    fn test_parameters_missing_from_profile_are_skipped() {
        let catalog = Catalog::from_json(
            r#"[
                {"name": "A", "cost": "low"},
                {"name": "B", "security": "high"}
            ]"#,
        )
        .unwrap();

        let user = params(&[(ParamName::Cost, Level::Medium), (ParamName::Latency, Level::Low)]);

        assert_eq!(score_profile(&catalog.profiles()[0], &user), 0.5);
        assert_eq!(score_profile(&catalog.profiles()[1], &user), 0.0);
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let engine = ScoringEngine::new(Arc::new(Catalog::embedded().unwrap()));

        for level in Level::ALL {
            let user: ParamSet = ParamName::ALL.iter().map(|name| (*name, level)).collect();
            for score in engine.rank(&user) {
                assert!((0.0..=1.0).contains(&score.score), "{} out of range", score.score);
            }
        }
    }

    #[test]
    fn test_ranking_is_sorted_descending() {
        let engine = ScoringEngine::new(Arc::new(Catalog::embedded().unwrap()));
        let ranking = engine.rank(&params(&[
            (ParamName::Scalability, Level::High),
            (ParamName::Availability, Level::High),
        ]));

        assert!(ranking.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_format_ranking() {
        let scores = vec![
            ArchitectureScore {
                name: "Microservices".to_string(),
                score: 0.8333,
            },
            ArchitectureScore {
                name: "Monolith".to_string(),
                score: 0.5,
            },
        ];

        assert_eq!(format_ranking(&scores), "Microservices: 0.83\nMonolith: 0.50");
    }
}
