use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::info;

/// Opens a presentation file in the operating system's default application
pub fn open_presentation(path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("presentation file not found: {}", path.display());
    }
    opener::open(path)
        .with_context(|| format!("failed to open presentation {}", path.display()))?;
    info!("opened presentation {}", path.display());
    Ok(())
}
