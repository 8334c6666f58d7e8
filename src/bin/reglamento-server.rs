//! Regulation query HTTP server binary

use reglamento::{
    AnswerComposer, AppConfig, Corpus, GenerationParams, HuggingFaceGenerator, QueryEngine,
    TextGenerator,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    info!("Reglamento query server v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env()?;

    let corpus = Corpus::load(&config.corpus_path)?;
    if corpus.is_empty() {
        warn!("Corpus is empty; every query will get the not-found answer");
    }

    let generator: Option<Arc<dyn TextGenerator>> = match config.generator {
        Some(ref settings) => {
            info!(
                "Generator enabled: model {} at {} (timeout {:?})",
                settings.model, settings.endpoint, settings.timeout
            );
            Some(Arc::new(HuggingFaceGenerator::new(
                settings.endpoint.clone(),
                settings.model.clone(),
                settings.api_key.clone(),
                settings.timeout,
            )))
        }
        None => {
            info!("HUGGINGFACE_API_KEY not set; answers use the built-in template");
            None
        }
    };

    let composer = AnswerComposer::new(generator, GenerationParams::default());
    let engine = QueryEngine::new(corpus, composer, config.max_results);

    reglamento::server::run_server(engine, &config.server).await?;

    Ok(())
}
