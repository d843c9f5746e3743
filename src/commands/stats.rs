use anyhow::{Context, Result};

use textsim::config::Config;
use textsim::store::{HttpVectorStore, VectorStore};

/// Show collection point counts.
pub async fn show_stats(config: Config) -> Result<()> {
    let store = HttpVectorStore::new(&config.vector_store).context("Failed to build store client")?;

    let hybrid = store
        .count(&config.vector_store.hybrid_collection)
        .await
        .context("Failed to count hybrid collection")?;
    let dense = store
        .count(&config.vector_store.dense_collection)
        .await
        .context("Failed to count dense collection")?;

    println!("Vector store: {}", config.vector_store.url);
    println!("  {}: {} points", config.vector_store.hybrid_collection, hybrid);
    println!("  {}: {} points", config.vector_store.dense_collection, dense);
    println!("Embedding model: {} ({} dimensions)", config.embedding.model_name, config.embedding.dimensions);
    Ok(())
}
