use anyhow::Result;
use std::path::PathBuf;

use textsim::config::Config;

/// Write a starter configuration file.
pub async fn init_config(path: PathBuf) -> Result<()> {
    let config_path = path.join("textsim.toml");
    if config_path.exists() {
        anyhow::bail!("Refusing to overwrite {}", config_path.display());
    }

    let config = Config::default();
    let toml_content = format!(
        r#"# textsim configuration

[corpus]
path = "{}"

[embedding]
backend = "http"
endpoint = "http://localhost:8081/v1/embeddings"
model_name = "{}"
dimensions = {}

[vector_store]
url = "{}"
hybrid_collection = "{}"
dense_collection = "{}"

[ranking]
ngram_min = {}
ngram_max = {}
min_df = {}
max_df = {}
max_features = {}
rrf_k = {}
candidates_dense = {}
candidates_sparse = {}

[http]
listen_addr = "{}"
cors_enabled = false

[logging]
format = "text"
level = "info"
"#,
        config.corpus.path.display(),
        config.embedding.model_name,
        config.embedding.dimensions,
        config.vector_store.url,
        config.vector_store.hybrid_collection,
        config.vector_store.dense_collection,
        config.ranking.ngram_min,
        config.ranking.ngram_max,
        config.ranking.min_df,
        config.ranking.max_df,
        config.ranking.max_features,
        config.ranking.rrf_k,
        config.ranking.candidates_dense,
        config.ranking.candidates_sparse,
        config.http.listen_addr,
    );

    std::fs::write(&config_path, toml_content)?;
    println!("Created configuration file: {}", config_path.display());
    Ok(())
}
