use crate::types::{Niche, NicheResult, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Location of a niche's output document inside `data_dir`.
pub fn output_path(data_dir: &Path, niche: Niche) -> PathBuf {
    data_dir.join(format!("{}_news.json", niche))
}

/// Write `result` as pretty-printed JSON, creating `data_dir` if needed.
pub async fn write_niche_result(data_dir: &Path, niche: Niche, result: &NicheResult) -> Result<PathBuf> {
    tokio::fs::create_dir_all(data_dir).await?;

    let path = output_path(data_dir, niche);
    let json = serde_json::to_string_pretty(result)?;
    tokio::fs::write(&path, json).await?;

    info!("Saved {} articles to {}", result.total_articles, path.display());
    Ok(path)
}

/// Read back a previously written output document.
pub async fn read_niche_result(path: &Path) -> Result<NicheResult> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}
