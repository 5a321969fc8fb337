//! Static knowledge for the architecture assistant.
//!
//! This crate owns everything that is loaded once and never mutated:
//!
//! - [`ParamName`] / [`Level`] / [`ParamSet`] - The qualitative requirement model
//! - [`Catalog`] - Architecture profiles rated on the same parameters
//! - [`ParamRuleMatcher`] - Keyword rules that pull parameters out of free text
//! - [`ScoringEngine`] - Distance-based ranking of the catalog
//!
//! Default data files are embedded at compile time; every loader also
//! accepts a path so deployments can ship their own tables.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use catalog::{Catalog, MatchMode, ParamRuleMatcher, ScoringEngine};
//!
//! # fn main() -> Result<(), catalog::CatalogError> {
//! let matcher = ParamRuleMatcher::embedded(MatchMode::WholeWord)?;
//! let params = matcher.match_text("necesito alta escalabilidad y bajo costo");
//!
//! let engine = ScoringEngine::new(Arc::new(Catalog::embedded()?));
//! let ranking = engine.rank(&params);
//! assert!(!ranking.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod params;
pub mod profile;
pub mod rules;
pub mod scoring;

pub use error::{CatalogError, Result};
pub use params::{Level, ParamName, ParamSet};
pub use profile::{ArchitectureProfile, Catalog};
pub use rules::{keyword_regex, MatchMode, ParamRuleMatcher};
pub use scoring::{format_ranking, score_profile, ArchitectureScore, ScoringEngine};
