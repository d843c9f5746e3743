use anyhow::{Context, Result};

use textsim::config::Config;
use textsim::types::CompareMode;

/// One-shot comparison printed as JSON.
pub async fn compare_text(
    config: Config,
    text: String,
    top_k: usize,
    mode: CompareMode,
) -> Result<()> {
    let service = super::build_service(&config)?;

    let outcome = service
        .compare(&text, top_k, mode)
        .await
        .context("Comparison failed")?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
