//! Prompt templates for retrieval-augmented answering

use crate::types::RetrievedChunk;

/// Canonical refusal the model must emit verbatim when the retrieved
/// context cannot answer the question
pub const INSUFFICIENT_CONTEXT_PHRASE: &str = "No hay información suficiente en el contexto";

/// Spanish marker the evaluator detects on; a prefix of the canonical
/// phrase so shortened refusals still count as insufficient context
pub const INSUFFICIENT_CONTEXT_MARKER_ES: &str = "no hay información suficiente";

/// English marker recognized by the evaluator alongside the Spanish one
pub const INSUFFICIENT_CONTEXT_MARKER_EN: &str = "insufficient context";

/// Prompt builder for ask requests
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render retrieved chunks into the context block: one indexed entry per
    /// hit carrying chunk id, source tag, similarity score, and text.
    /// Empty when there are no hits.
    pub fn build_context(hits: &[RetrievedChunk]) -> String {
        hits.iter()
            .enumerate()
            .map(|(index, hit)| {
                format!(
                    "[{}] chunk={} source={} score={:.4}\n{}",
                    index + 1,
                    hit.chunk_id,
                    hit.source,
                    hit.score,
                    hit.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Fixed system instruction: answer only from context, refuse with the
    /// canonical phrase, answer in Spanish, cite chunk identifiers.
    pub fn build_system_prompt() -> String {
        [
            "Eres un asistente técnico de backend.",
            "Responde solamente con información del contexto recuperado.",
            &format!(
                "Si el contexto es insuficiente, responde exactamente: \"{}\".",
                INSUFFICIENT_CONTEXT_PHRASE
            ),
            "Cita siempre los fragmentos relevantes por su identificador.",
        ]
        .join(" ")
    }

    /// User prompt embedding the question and the context block
    pub fn build_user_prompt(question: &str, context: &str) -> String {
        let question_line = format!("Pregunta:\n{}", question);
        [
            question_line.as_str(),
            "",
            "Contexto recuperado:",
            if context.is_empty() {
                "[Sin contexto recuperado]"
            } else {
                context
            },
            "",
            "Instrucciones de respuesta:",
            "- Responde en español.",
            "- Sé concreto.",
            "- Incluye referencias de chunks usados.",
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn hit(chunk_id: &str, score: f32) -> RetrievedChunk {
        RetrievedChunk {
            chunk_id: chunk_id.to_string(),
            document_id: "doc-1".to_string(),
            source: "directory.records".to_string(),
            text: "Record ID: doc-1".to_string(),
            score,
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn test_context_is_empty_without_hits() {
        assert_eq!(PromptBuilder::build_context(&[]), "");
    }

    #[test]
    fn test_context_renders_indexed_entries_with_scores() {
        let context = PromptBuilder::build_context(&[hit("doc-1#0", 0.91237), hit("doc-1#1", 0.5)]);

        assert!(context.starts_with("[1] chunk=doc-1#0 source=directory.records score=0.9124\n"));
        assert!(context.contains("\n\n[2] chunk=doc-1#1"));
        assert!(context.contains("score=0.5000"));
    }

    #[test]
    fn test_user_prompt_placeholder_without_context() {
        let prompt = PromptBuilder::build_user_prompt("¿Quién es Ana?", "");
        assert!(prompt.contains("[Sin contexto recuperado]"));
        assert!(prompt.contains("Pregunta:\n¿Quién es Ana?"));
    }

    #[test]
    fn test_system_prompt_names_the_canonical_phrase() {
        assert!(PromptBuilder::build_system_prompt().contains(INSUFFICIENT_CONTEXT_PHRASE));
    }
}
