use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use textsim::config::Config;
use textsim::corpus;
use textsim::embedding::build_encoder;
use textsim::ingest::IngestPipeline;
use textsim::store::HttpVectorStore;

/// Provision collections and ingest the corpus into the vector store.
pub async fn index_corpus(config: Config) -> Result<()> {
    let records = corpus::read_records(&config.corpus.path).context("Failed to read corpus")?;
    if records.is_empty() {
        anyhow::bail!("No ingestable records in {}", config.corpus.path.display());
    }
    info!("Read {} records from {}", records.len(), config.corpus.path.display());

    let encoder = build_encoder(&config.embedding).context("Failed to build encoder")?;
    let store =
        Arc::new(HttpVectorStore::new(&config.vector_store).context("Failed to build store client")?);

    let pipeline = IngestPipeline::new(encoder, store, config.vector_store.clone());
    pipeline
        .provision()
        .await
        .context("Failed to provision collections")?;

    let reports = pipeline
        .run(&records)
        .await
        .context("Ingest failed")?;

    for report in reports {
        println!(
            "[{}] unchanged={} upserted={} total={}",
            report.collection, report.unchanged, report.upserted, report.total
        );
    }
    Ok(())
}
