//! Text generators used to phrase answers

use crate::error::GeneratorError;
use crate::types::GenerationParams;
use async_trait::async_trait;
use std::time::Duration;

/// Trait for pluggable text-generation backends
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Model identifier reported by the info endpoint
    fn model(&self) -> &str;

    /// Submit one prompt. Implementations make a single attempt and never retry.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GeneratorError>;
}

/// Mock generator that always answers with the same text
pub struct MockGenerator {
    reply: String,
}

impl MockGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, GeneratorError> {
        Ok(self.reply.clone())
    }
}

/// Mock generator that always fails, for exercising the fallback path
pub struct FailingGenerator {
    make_error: fn() -> GeneratorError,
}

impl FailingGenerator {
    pub fn new(make_error: fn() -> GeneratorError) -> Self {
        Self { make_error }
    }

    pub fn timeout() -> Self {
        Self::new(|| GeneratorError::Timeout(Duration::from_secs(10)))
    }
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn model(&self) -> &str {
        "failing-model"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, GeneratorError> {
        Err((self.make_error)())
    }
}
