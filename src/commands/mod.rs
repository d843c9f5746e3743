//! CLI command implementations

mod compare;
mod index;
mod init;
mod serve;
mod stats;

pub use compare::compare_text;
pub use index::index_corpus;
pub use init::init_config;
pub use serve::run_server;
pub use stats::show_stats;

use anyhow::{Context, Result};
use std::sync::Arc;

use textsim::config::Config;
use textsim::corpus::Corpus;
use textsim::embedding::build_encoder;
use textsim::query::CompareService;
use textsim::store::HttpVectorStore;

/// Load the corpus and wire the comparison service from configuration.
pub(crate) fn build_service(config: &Config) -> Result<Arc<CompareService>> {
    let corpus = Corpus::load(&config.corpus.path).context("Failed to load corpus")?;
    if corpus.is_empty() {
        anyhow::bail!("No documents found in {}", config.corpus.path.display());
    }

    let encoder = build_encoder(&config.embedding).context("Failed to build encoder")?;
    let store =
        Arc::new(HttpVectorStore::new(&config.vector_store).context("Failed to build store client")?);

    let service = CompareService::new(
        corpus,
        encoder,
        store,
        &config.ranking,
        &config.vector_store,
    )
    .context("Failed to build comparison service")?;

    Ok(Arc::new(service))
}
