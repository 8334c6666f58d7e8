//! Answer composition: generated answer when possible, templated otherwise

use crate::error::GeneratorError;
use crate::generators::TextGenerator;
use crate::types::{GenerationParams, RegulationEntry};
use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Returned when no entry matched the question
pub const NO_MATCHES_ANSWER: &str = "Lo siento, no encontré información específica sobre eso en el reglamento de tránsito de Hermosillo. ¿Podrías reformular tu pregunta o ser más específico?";

const FALLBACK_INTRO: &str =
    "📋 Encontré la siguiente información en el Reglamento de Tránsito de Hermosillo:";

const FALLBACK_CLOSING: &str = "💡 ¿Necesitas más información sobre algún tema específico?";

/// Which path a composition took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeState {
    NoMatches,
    GeneratorAttempt,
    Fallback,
}

/// Why no generated answer is available
#[derive(Debug)]
pub enum UnavailableReason {
    NotConfigured,
    Failed(GeneratorError),
}

/// Outcome of asking the generator for an answer
#[derive(Debug)]
pub enum GenerationOutcome {
    Generated(String),
    Unavailable(UnavailableReason),
}

/// Final answer text and whether the generator produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub answer: String,
    pub used_generator: bool,
}

/// Composes answers from matched entries. Holds no per-query state.
pub struct AnswerComposer {
    generator: Option<Arc<dyn TextGenerator>>,
    params: GenerationParams,
}

impl AnswerComposer {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, params: GenerationParams) -> Self {
        Self { generator, params }
    }

    /// Composer that only ever renders the templated answer
    pub fn fallback_only() -> Self {
        Self::new(None, GenerationParams::default())
    }

    pub fn generator(&self) -> Option<&Arc<dyn TextGenerator>> {
        self.generator.as_ref()
    }

    /// Build an answer for `question` from `matches`. Never fails.
    pub async fn compose(&self, question: &str, matches: &[RegulationEntry]) -> Composition {
        if matches.is_empty() {
            debug!(state = ?ComposeState::NoMatches, "No matches, skipping generator");
            return Composition {
                answer: NO_MATCHES_ANSWER.to_string(),
                used_generator: false,
            };
        }

        match self.try_generate(question, matches).await {
            GenerationOutcome::Generated(answer) => Composition {
                answer,
                used_generator: true,
            },
            GenerationOutcome::Unavailable(reason) => {
                match reason {
                    UnavailableReason::NotConfigured => {
                        debug!(state = ?ComposeState::Fallback, "No generator configured")
                    }
                    UnavailableReason::Failed(e) => warn!(
                        state = ?ComposeState::Fallback,
                        kind = e.kind(),
                        "Generator failed, using templated answer: {}",
                        e
                    ),
                }
                Composition {
                    answer: render_fallback(matches),
                    used_generator: false,
                }
            }
        }
    }

    async fn try_generate(&self, question: &str, matches: &[RegulationEntry]) -> GenerationOutcome {
        let Some(generator) = self.generator.as_ref() else {
            return GenerationOutcome::Unavailable(UnavailableReason::NotConfigured);
        };

        let prompt = build_prompt(question, &build_context(matches));
        let start = Instant::now();
        info!(
            state = ?ComposeState::GeneratorAttempt,
            "Generating answer with '{}' for: {}",
            generator.model(),
            question
        );

        match generator.generate(&prompt, &self.params).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return GenerationOutcome::Unavailable(UnavailableReason::Failed(
                        GeneratorError::Empty,
                    ));
                }
                info!("Generated answer in {}ms", start.elapsed().as_millis());
                GenerationOutcome::Generated(text.to_string())
            }
            Err(e) => GenerationOutcome::Unavailable(UnavailableReason::Failed(e)),
        }
    }
}

/// One "- subcategory: description" line per match, plus its legal basis
pub fn build_context(matches: &[RegulationEntry]) -> String {
    let mut context = String::new();
    for entry in matches {
        let _ = writeln!(context, "- {}: {}", entry.subcategory, entry.description);
        if let Some(ref article) = entry.article {
            let _ = writeln!(context, "  Fundamento: {}", article);
        }
    }
    context
}

/// Instruction prompt embedding the context block and the verbatim question
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "Eres un asistente experto en el Reglamento de Tránsito de Hermosillo, Sonora.

Pregunta del usuario: {question}

Información relevante del reglamento:
{context}

Instrucciones:
- Responde de forma clara, concisa y profesional
- Usa formato markdown: **negrita** para títulos, _cursiva_ para fundamentos legales
- Menciona los artículos del reglamento cuando sea relevante
- Si la información no es suficiente, indícalo claramente
- Mantén un tono amigable pero formal

Respuesta:"
    )
}

/// Templated answer listing every match in order
pub fn render_fallback(matches: &[RegulationEntry]) -> String {
    if matches.is_empty() {
        return NO_MATCHES_ANSWER.to_string();
    }

    let mut answer = format!("{}\n\n", FALLBACK_INTRO);

    for (i, entry) in matches.iter().enumerate() {
        let _ = writeln!(answer, "**{}. {}**", i + 1, entry.subcategory_or_default());
        let _ = writeln!(answer, "{}", entry.description);
        if let Some(ref article) = entry.article {
            let _ = writeln!(answer, "_Fundamento: {}_", article);
        }
        answer.push('\n');
    }

    if matches.len() > 1 {
        let _ = writeln!(answer, "_Se encontraron {} entradas relevantes._", matches.len());
    }

    answer.push('\n');
    answer.push_str(FALLBACK_CLOSING);
    answer
}
