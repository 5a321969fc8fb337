//! Architecture profiles.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{read_file, CatalogError, Result};
use crate::params::{Level, ParamName};

/// Embedded default catalog.
pub const DEFAULT_CATALOG_JSON: &str = include_str!("../data/architectures.json");

/// One architecture rated on the qualitative parameters.
///
/// The JSON form is flat: `{"name": "...", "scalability": "high", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureProfile {
    pub name: String,
    /// Other names users may type for this architecture.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub levels: BTreeMap<ParamName, Level>,
}

impl ArchitectureProfile {
    pub fn level(&self, name: ParamName) -> Option<Level> {
        self.levels.get(&name).copied()
    }

    /// True if `candidate` is this architecture's name or one of its aliases.
    pub fn answers_to(&self, candidate: &str) -> bool {
        let candidate = candidate.trim().to_lowercase();
        self.name.to_lowercase() == candidate
            || self.aliases.iter().any(|alias| alias.to_lowercase() == candidate)
    }
}

/// The ordered, immutable set of known architectures.
#[derive(Debug, Clone)]
pub struct Catalog {
    profiles: Vec<ArchitectureProfile>,
    parameters: Vec<ParamName>,
}

impl Catalog {
    /// Validate and wrap a list of profiles.
    pub fn new(profiles: Vec<ArchitectureProfile>) -> Result<Self> {
        if profiles.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        // Names and aliases share one namespace across the catalog.
        let mut seen = HashSet::new();
        for profile in &profiles {
            let own: HashSet<String> = std::iter::once(&profile.name)
                .chain(&profile.aliases)
                .map(|name| name.trim().to_lowercase())
                .collect();
            if let Some(clash) = own.iter().find(|name| seen.contains(*name)) {
                return Err(CatalogError::DuplicateArchitecture(clash.clone()));
            }
            seen.extend(own);

            if profile.levels.is_empty() {
                return Err(CatalogError::EmptyProfile(profile.name.clone()));
            }
        }

        let parameters = ParamName::ALL
            .into_iter()
            .filter(|name| profiles.iter().any(|p| p.levels.contains_key(name)))
            .collect();

        Ok(Self {
            profiles,
            parameters,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let profiles: Vec<ArchitectureProfile> = serde_json::from_str(json)?;
        Self::new(profiles)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let catalog = Self::from_json(&read_file(path)?)?;
        info!(
            "Loaded architecture catalog from {} ({} architectures)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(DEFAULT_CATALOG_JSON)
    }

    /// Load from `path` if given, otherwise the embedded catalog.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::embedded(),
        }
    }

    pub fn profiles(&self) -> &[ArchitectureProfile] {
        &self.profiles
    }

    /// Every parameter rated by at least one architecture.
    ///
    /// This is the set of parameters a conversation must collect before it
    /// can be evaluated without forcing.
    pub fn parameters(&self) -> &[ParamName] {
        &self.parameters
    }

    /// Find a profile by name or alias, ignoring case.
    pub fn find(&self, name: &str) -> Option<&ArchitectureProfile> {
        self.profiles.iter().find(|profile| profile.answers_to(name))
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_is_valid() {
        let catalog = Catalog::embedded().unwrap();

        assert!(catalog.len() >= 5);
        assert_eq!(catalog.parameters(), &ParamName::ALL);
        assert!(catalog.find("Microservices").is_some());
    }

    #[test]
    fn test_flat_profile_format() {
        let catalog = Catalog::from_json(
            r#"[
                {"name": "Monolith", "aliases": ["monolito"], "scalability": "low", "cost": 1},
                {"name": "Microservices", "scalability": "alta", "cost": "high"}
            ]"#,
        )
        .unwrap();

        let monolith = &catalog.profiles()[0];
        assert_eq!(monolith.level(ParamName::Scalability), Some(Level::Low));
        assert_eq!(monolith.level(ParamName::Cost), Some(Level::Low));
        assert_eq!(monolith.level(ParamName::Security), None);
        assert_eq!(catalog.parameters(), &[ParamName::Scalability, ParamName::Cost]);
        assert_eq!(catalog.names(), vec!["Monolith", "Microservices"]);
    }

    #[test]
    fn test_find_by_alias_ignores_case() {
        let catalog = Catalog::from_json(
            r#"[{"name": "Monolith", "aliases": ["Monolito"], "cost": "low"}]"#,
        )
        .unwrap();

        assert_eq!(catalog.find("MONOLITO").map(|p| p.name.as_str()), Some("Monolith"));
        assert_eq!(catalog.find("monolith").map(|p| p.name.as_str()), Some("Monolith"));
        assert!(catalog.find("Serverless").is_none());
    }

    #[test]
    fn test_rejects_invalid_catalogs() {
        assert!(matches!(Catalog::from_json("[]"), Err(CatalogError::EmptyCatalog)));

        let dup = r#"[{"name": "A", "cost": "low"}, {"name": "a", "cost": "high"}]"#;
        assert!(matches!(
            Catalog::from_json(dup),
            Err(CatalogError::DuplicateArchitecture(_))
        ));

        let alias_clash = r#"[
            {"name": "Microservices", "aliases": ["servicios"], "cost": "high"},
            {"name": "SOA", "aliases": ["Servicios"], "cost": "low"}
        ]"#;
        assert!(matches!(
            Catalog::from_json(alias_clash),
            Err(CatalogError::DuplicateArchitecture(name)) if name == "servicios"
        ));

        let alias_names_other = r#"[
            {"name": "Monolith", "cost": "low"},
            {"name": "Modular", "aliases": ["monolith"], "cost": "low"}
        ]"#;
        assert!(matches!(
            Catalog::from_json(alias_names_other),
            Err(CatalogError::DuplicateArchitecture(_))
        ));

        let own_alias = r#"[{"name": "SOA", "aliases": ["soa"], "cost": "low"}]"#;
        assert!(Catalog::from_json(own_alias).is_ok());

        let empty_profile = r#"[{"name": "A"}]"#;
        assert!(matches!(
            Catalog::from_json(empty_profile),
            Err(CatalogError::EmptyProfile(_))
        ));

        let bad_level = r#"[{"name": "A", "cost": "extreme"}]"#;
        assert!(matches!(Catalog::from_json(bad_level), Err(CatalogError::Parse(_))));

        let bad_param = r#"[{"name": "A", "budget": "low"}]"#;
        assert!(matches!(Catalog::from_json(bad_param), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Catalog::from_path("/nonexistent/architectures.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
