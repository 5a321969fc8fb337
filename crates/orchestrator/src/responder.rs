//! Oracle-written replies with deterministic fallbacks.
//!
//! Every method here returns text: oracle failures are logged and replaced
//! by a fixed Spanish message, never propagated.

use std::sync::{Arc, LazyLock};

use catalog::{format_ranking, ArchitectureScore, Catalog, ParamName, ParamSet};
use oracle_core::{render_transcript, TextOracle, Turn};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::prompts::{
    alternative_explanation_user_prompt, comparison_system_prompt, comparison_user_prompt,
    explanation_user_prompt, knowledge_system_prompt, knowledge_user_prompt,
    question_user_prompt, ranking_summary, EXPLANATION_SYSTEM_PROMPT, QUESTION_SYSTEM_PROMPT,
};

/// Reply when an evaluation has no known parameters to score.
pub const INSUFFICIENT_INFO_REPLY: &str = "No tengo suficiente información para recomendarte una arquitectura. Cuéntame un poco más sobre tu sistema: ¿qué nivel de escalabilidad, costo, seguridad, complejidad, disponibilidad o latencia necesitas?";

/// One-shot hint that an early evaluation is possible.
pub const SUGGESTION_TEXT: &str = "Veo que ya tenemos suficiente información para una evaluación preliminar. Si quieres, puedo darte una recomendación ahora, o podemos seguir profundizando. Puedes decir \"evalúa ya\" cuando quieras.";

/// Confirmation placed in the fresh conversation after archiving.
pub const ARCHIVE_REPLY: &str = "¡Conversación archivada! He guardado todo nuestro historial y estoy listo para empezar una nueva conversación. ¿En qué puedo ayudarte ahora?";

pub const EXPLANATION_APOLOGY: &str = "Lo siento, no pude generar una explicación para la recomendación en este momento.";

pub const ANSWER_APOLOGY: &str = "Lo siento, no pude responder tu pregunta en este momento. Inténtalo de nuevo más tarde.";

pub const COMPARISON_APOLOGY: &str = "Lo siento, no pude comparar esas arquitecturas en este momento.";

/// Explanations shorter than this are treated as weak.
const MIN_EXPLANATION_CHARS: usize = 100;

static INSUFFICIENT_CLAIM: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)no (hay|tengo) (suficiente|información)|not enough information").ok()
});

/// Deterministic question about one parameter.
pub fn fallback_question(param: ParamName) -> String {
    format!(
        "¿Qué nivel de {} necesitas para tu sistema: bajo, medio o alto?",
        param.label_es()
    )
}

/// Reply asking for exactly two architectures, listing the catalog.
pub fn clarification_reply(catalog: &Catalog) -> String {
    format!(
        "Por favor, especifica dos arquitecturas para comparar. Por ejemplo: 'compara monolítica y microservicios'. Arquitecturas disponibles: {}.",
        catalog.names().join(", ")
    )
}

/// Ranking followed by the explanation of the winner.
pub fn evaluation_reply(ranking: &[ArchitectureScore], explanation: &str) -> String {
    let best = ranking.first().map(|s| s.name.as_str()).unwrap_or_default();
    format!(
        "Resultados de la evaluación:\n{}\n\nRecomendación: {}\n\n{}",
        format_ranking(ranking),
        best,
        explanation
    )
}

/// Side-by-side catalog levels of two architectures.
///
/// Returns `None` unless both are in the catalog.
pub fn comparison_table(catalog: &Catalog, first: &str, second: &str) -> Option<String> {
    let a = catalog.find(first)?;
    let b = catalog.find(second)?;

    let rows = catalog
        .parameters()
        .iter()
        .map(|&param| {
            let level = |p: &catalog::ArchitectureProfile| {
                p.level(param).map(|l| l.label_es()).unwrap_or("-")
            };
            format!("- {}: {} / {}", param.label_es(), level(a), level(b))
        })
        .collect::<Vec<_>>()
        .join("\n");

    Some(format!("Comparación ({} vs {}):\n{}", a.name, b.name, rows))
}

fn is_weak_explanation(text: &str) -> bool {
    text.chars().count() < MIN_EXPLANATION_CHARS
        || INSUFFICIENT_CLAIM
            .as_ref()
            .is_some_and(|re| re.is_match(text))
}

/// Writes user-facing text with the oracle.
pub struct Responder {
    oracle: Arc<dyn TextOracle>,
    catalog: Arc<Catalog>,
    transcript_turns: usize,
}

impl Responder {
    pub fn new(
        oracle: Arc<dyn TextOracle>,
        catalog: Arc<Catalog>,
        transcript_turns: usize,
    ) -> Self {
        Self {
            oracle,
            catalog,
            transcript_turns,
        }
    }

    /// Next question about the missing parameters.
    pub async fn ask_for_parameters(&self, missing: &[ParamName], history: &[Turn]) -> String {
        let Some(&first) = missing.first() else {
            return INSUFFICIENT_INFO_REPLY.to_string();
        };

        let transcript = render_transcript(history, self.transcript_turns);
        match self
            .oracle
            .complete(QUESTION_SYSTEM_PROMPT, &question_user_prompt(missing, &transcript))
            .await
        {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) => {
                warn!("QUESTION_EMPTY_RESPONSE");
                fallback_question(first)
            }
            Err(e) => {
                warn!(error = %e, "QUESTION_ORACLE_FAILED");
                fallback_question(first)
            }
        }
    }

    /// Explain the top architecture, falling back to the runner-up.
    pub async fn explain(&self, ranking: &[ArchitectureScore], params: &ParamSet) -> String {
        let Some(best) = ranking.first() else {
            return INSUFFICIENT_INFO_REPLY.to_string();
        };
        info!(ranking = %ranking_summary(ranking), "EXPLAINING_RANKING");

        let primary = match self
            .oracle
            .complete(
                EXPLANATION_SYSTEM_PROMPT,
                &explanation_user_prompt(&best.name, params),
            )
            .await
        {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!(error = %e, architecture = %best.name, "EXPLANATION_ORACLE_FAILED");
                return EXPLANATION_APOLOGY.to_string();
            }
        };

        if !is_weak_explanation(&primary) {
            return primary;
        }

        let Some(runner_up) = ranking.get(1) else {
            return primary;
        };
        debug!(architecture = %runner_up.name, "EXPLANATION_WEAK_TRYING_ALTERNATIVE");

        match self
            .oracle
            .complete(
                EXPLANATION_SYSTEM_PROMPT,
                &alternative_explanation_user_prompt(&runner_up.name, params),
            )
            .await
        {
            Ok(text) if !text.trim().is_empty() => format!(
                "Respuesta alternativa ({}):\n\n{}",
                runner_up.name,
                text.trim()
            ),
            Ok(_) => primary,
            Err(e) => {
                warn!(error = %e, architecture = %runner_up.name, "EXPLANATION_ORACLE_FAILED");
                primary
            }
        }
    }

    /// Answer a general architecture question.
    pub async fn answer_question(&self, message: &str, history: &[Turn]) -> String {
        // The current message is already the last turn.
        let previous = history.len().saturating_sub(1);
        let transcript = render_transcript(&history[..previous], self.transcript_turns);

        match self
            .oracle
            .complete(
                &knowledge_system_prompt(),
                &knowledge_user_prompt(message, &transcript),
            )
            .await
        {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) => ANSWER_APOLOGY.to_string(),
            Err(e) => {
                warn!(error = %e, "KNOWLEDGE_ORACLE_FAILED");
                ANSWER_APOLOGY.to_string()
            }
        }
    }

    /// Compare two architectures: oracle prose plus the catalog table.
    pub async fn compare(&self, first: &str, second: &str) -> String {
        let table = comparison_table(&self.catalog, first, second);

        let prose = match self
            .oracle
            .complete(&comparison_system_prompt(), &comparison_user_prompt(first, second))
            .await
        {
            Ok(reply) if !reply.trim().is_empty() => Some(reply.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, first, second, "COMPARISON_ORACLE_FAILED");
                None
            }
        };

        match (prose, table) {
            (Some(prose), Some(table)) => format!("{}\n\n{}", prose, table),
            (Some(prose), None) => prose,
            (None, Some(table)) => table,
            (None, None) => COMPARISON_APOLOGY.to_string(),
        }
    }
}
