//! Query pipeline: corpus matching followed by answer composition

use crate::composer::AnswerComposer;
use crate::corpus::Corpus;
use crate::selection::{match_entries, DEFAULT_MATCH_LIMIT};
use crate::types::QueryResult;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Answers questions against an immutable corpus (thread-safe via Arc)
pub struct QueryEngine {
    corpus: Corpus,
    composer: AnswerComposer,
    match_limit: usize,
}

pub type SharedQueryEngine = Arc<QueryEngine>;

impl QueryEngine {
    pub fn new(corpus: Corpus, composer: AnswerComposer, match_limit: usize) -> SharedQueryEngine {
        Arc::new(Self {
            corpus,
            composer,
            match_limit,
        })
    }

    /// Engine with the default match limit and no generator
    pub fn new_simple(corpus: Corpus) -> SharedQueryEngine {
        Self::new(corpus, AnswerComposer::fallback_only(), DEFAULT_MATCH_LIMIT)
    }

    /// Main entry point: match the question, then compose an answer.
    ///
    /// Question length is validated by the caller.
    pub async fn answer(&self, question: &str) -> QueryResult {
        let start = Instant::now();

        let sources = match_entries(question, &self.corpus, self.match_limit);
        let composition = self.composer.compose(question, &sources).await;

        info!(
            "Answered query: {} sources, generator={}, {}ms",
            sources.len(),
            composition.used_generator,
            start.elapsed().as_millis()
        );

        QueryResult {
            answer: composition.answer,
            sources,
            used_generator: composition.used_generator,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn match_limit(&self) -> usize {
        self.match_limit
    }

    pub fn generator_enabled(&self) -> bool {
        self.composer.generator().is_some()
    }

    /// Model of the configured generator, if any
    pub fn model_name(&self) -> Option<&str> {
        self.composer.generator().map(|g| g.model())
    }
}
