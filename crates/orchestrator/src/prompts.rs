//! System prompts and user-prompt builders for every oracle call.
//!
//! All prompts are in English and ask the model to answer in Spanish, the
//! language users write in.

use catalog::{ArchitectureScore, ParamName, ParamSet};

/// Sources every knowledge-bearing prompt is restricted to.
const SOURCE_BOOKS: &str = "Base your answer exclusively on these books:\n\
1. \"Fundamentals of Software Architecture\", Mark Richards and Neal Ford, O'Reilly Media, 2020.\n\
2. \"Software Architecture: The Hard Parts\", Neal Ford et al., O'Reilly Media, 2022.";

/// Constrained intent classification.
pub const INTENT_SYSTEM_PROMPT: &str = r#"You are the intent classifier of a software architecture assistant.
Classify the user's message into exactly one of these labels:

- "evaluate": the user wants an architecture recommendation or is describing their project or its requirements. Examples: "necesito una arquitectura para una red social", "mi app tendrá mucho tráfico", "busco alta disponibilidad".
- "force_evaluate": after being asked for more data, the user insists on getting a recommendation with what they already gave. Examples: "evalúa ya", "evalúa con lo que tienes", "no tengo más datos", "dame la respuesta ya".
- "compare": the user wants two named architectures compared. Examples: "compara monolítica y microservicios", "microservicios vs serverless".
- "general_question": a general knowledge question about software architecture. Examples: "¿qué es la escalabilidad?", "¿qué es un service mesh?".
- "archive": the user wants to archive the current conversation and start a new one. Examples: "archivar conversación", "nueva conversación", "empezar de nuevo", "reset".

Answer with the label only. If the message makes no sense or you cannot classify it, answer "unclassified"."#;

/// Parameter-level extraction.
pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"You extract software architecture requirements from a user's message.
Rate each of these parameters as "low", "medium" or "high", or "unknown" when the message gives no information about it:
scalability, cost, security, complexity, availability, latency.

Respond with a single JSON object and nothing else, for example:
{"scalability": "high", "cost": "low", "security": "unknown", "complexity": "unknown", "availability": "high", "latency": "unknown"}"#;

/// Architecture-name extraction for comparisons.
pub const NAMES_SYSTEM_PROMPT: &str = r#"You extract the names of software architectures mentioned in a user's message.
Examples of architectures: "monolítica", "microservicios", "orientada a servicios", "SOA", "event-driven", "serverless", "layered", "cliente-servidor", "microkernel", "space-based".
Respond with a JSON object only, for example: {"architectures": ["microservicios", "monolítica"]}.
If there are none, respond with {"architectures": []}."#;

/// Follow-up question about missing parameters.
pub const QUESTION_SYSTEM_PROMPT: &str = r#"You are a friendly software architecture assistant collecting requirements for a recommendation.
Write ONE short, natural question, in Spanish, asking the user about the first missing parameter listed.
Suggest the answer scale (bajo, medio o alto) and do not repeat questions already present in the conversation.
Respond with the question only."#;

/// Explanation of a recommended architecture.
pub const EXPLANATION_SYSTEM_PROMPT: &str = r#"You are an expert software architect explaining a recommendation.
Explain, in Spanish, why the given architecture fits the user's requirements, covering its strengths and its trade-offs for those requirements.
If you do not have enough support for the recommendation, say "no tengo suficiente información" and suggest a better option."#;

/// General architecture knowledge answers.
pub const KNOWLEDGE_SYSTEM_PROMPT: &str = r#"You are an expert software architecture assistant answering general questions.
Answer in Spanish, objectively and concisely. If you do not have enough information, say so directly."#;

/// Comparison of two architectures.
pub const COMPARISON_SYSTEM_PROMPT: &str = r#"You are an expert software architecture assistant.
Compare the two given architectures in terms of scalability, cost, maintainability and complexity.
Answer in Spanish, objectively and precisely. If you do not have enough information, say so directly."#;

/// The knowledge prompt with its source restriction.
pub fn knowledge_system_prompt() -> String {
    format!("{}\n\n{}", KNOWLEDGE_SYSTEM_PROMPT, SOURCE_BOOKS)
}

/// The comparison prompt with its source restriction.
pub fn comparison_system_prompt() -> String {
    format!("{}\n\n{}", COMPARISON_SYSTEM_PROMPT, SOURCE_BOOKS)
}

pub fn intent_user_prompt(message: &str) -> String {
    format!("Classify this message: \"{}\"", message)
}

pub fn extraction_user_prompt(message: &str) -> String {
    format!("Extract the parameters from this message: \"{}\"", message)
}

pub fn names_user_prompt(message: &str) -> String {
    format!("Extract the architectures from this message: \"{}\"", message)
}

/// Missing parameters plus the recent transcript.
pub fn question_user_prompt(missing: &[ParamName], transcript: &str) -> String {
    let missing = missing
        .iter()
        .map(|name| format!("{} ({})", name.as_str(), name.label_es()))
        .collect::<Vec<_>>()
        .join(", ");

    if transcript.is_empty() {
        format!("Missing parameters: {}", missing)
    } else {
        format!(
            "Missing parameters: {}\n\nConversation so far:\n{}",
            missing, transcript
        )
    }
}

/// The architecture to explain plus the known requirements.
pub fn explanation_user_prompt(architecture: &str, params: &ParamSet) -> String {
    format!(
        "Why is \"{}\" a good fit for these requirements: {}?",
        architecture,
        params.describe_es()
    )
}

/// Explanation request for the runner-up when the first one was weak.
pub fn alternative_explanation_user_prompt(architecture: &str, params: &ParamSet) -> String {
    format!(
        "Justify using \"{}\" for these requirements: {}, instead of an option that lacked support.",
        architecture,
        params.describe_es()
    )
}

/// The question plus recent history.
pub fn knowledge_user_prompt(message: &str, transcript: &str) -> String {
    if transcript.is_empty() {
        message.to_string()
    } else {
        format!("Conversation so far:\n{}\n\nQuestion: {}", transcript, message)
    }
}

pub fn comparison_user_prompt(first: &str, second: &str) -> String {
    format!("Compare {} and {}.", first, second)
}

/// One-line ranking summary used in logs.
pub fn ranking_summary(ranking: &[ArchitectureScore]) -> String {
    ranking
        .iter()
        .take(3)
        .map(|s| format!("{}={:.2}", s.name, s.score))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::Level;

    #[test]
    fn test_question_prompt_lists_missing() {
        let prompt = question_user_prompt(&[ParamName::Cost, ParamName::Latency], "");
        assert_eq!(prompt, "Missing parameters: cost (costo), latency (latencia)");

        let prompt = question_user_prompt(&[ParamName::Cost], "user: hola");
        assert!(prompt.ends_with("Conversation so far:\nuser: hola"));
    }

    #[test]
    fn test_explanation_prompt_describes_params() {
        let params: ParamSet = [(ParamName::Scalability, Level::High)].into_iter().collect();
        let prompt = explanation_user_prompt("Microservices", &params);

        assert!(prompt.contains("\"Microservices\""));
        assert!(prompt.contains("escalabilidad: alto"));
    }

    #[test]
    fn test_knowledge_prompt_carries_sources() {
        assert!(knowledge_system_prompt().contains("Fundamentals of Software Architecture"));
        assert!(comparison_system_prompt().starts_with(COMPARISON_SYSTEM_PROMPT));
    }

    #[test]
    fn test_ranking_summary_is_top_three() {
        let ranking = vec![
            ArchitectureScore { name: "A".into(), score: 1.0 },
            ArchitectureScore { name: "B".into(), score: 0.5 },
            ArchitectureScore { name: "C".into(), score: 0.25 },
            ArchitectureScore { name: "D".into(), score: 0.0 },
        ];
        assert_eq!(ranking_summary(&ranking), "A=1.00,B=0.50,C=0.25");
    }
}
