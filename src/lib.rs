//! Reglamento - traffic regulation question answering
//!
//! Answers natural-language questions about the Hermosillo traffic
//! regulation with:
//! - Keyword relevance matching over a local corpus
//! - Optional answer phrasing by a hosted language model
//! - Deterministic templated answers when the model is unavailable

pub mod types;
pub mod error;
pub mod config;
pub mod corpus;
pub mod scoring;
pub mod selection;
pub mod generators;
pub mod http_generator;
pub mod composer;
pub mod query_engine;
pub mod server;

pub use types::*;
pub use error::{ConfigError, CorpusError, GeneratorError};
pub use config::AppConfig;
pub use corpus::Corpus;
pub use selection::{match_entries, DEFAULT_MATCH_LIMIT};
pub use generators::{FailingGenerator, MockGenerator, TextGenerator};
pub use http_generator::HuggingFaceGenerator;
pub use composer::{AnswerComposer, Composition};
pub use query_engine::{QueryEngine, SharedQueryEngine};
