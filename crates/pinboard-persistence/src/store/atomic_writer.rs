use pinboard_core::PinboardResult;
use std::path::Path;
use tokio::fs;

/// Writes whole files so that readers see either the old or the new
/// contents, never a torn write.
pub struct AtomicWriter;

impl AtomicWriter {
    /// Write to a temp file next to `path`, then rename it over `path`.
    /// Missing parent directories are created.
    pub async fn write_atomic(path: &Path, data: &[u8]) -> PinboardResult<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).await?;

        // Same directory keeps the rename on one filesystem.
        let temp_file = tempfile::NamedTempFile::new_in(parent)?;
        let temp_path = temp_file.path().to_path_buf();
        fs::write(&temp_path, data).await?;
        fs::rename(&temp_path, path).await?;

        tracing::debug!(bytes = data.len(), path = %path.display(), "atomic write");
        Ok(())
    }

    pub async fn read_all(path: &Path) -> PinboardResult<Vec<u8>> {
        let data = fs::read(path).await?;
        tracing::debug!(bytes = data.len(), path = %path.display(), "read file");
        Ok(data)
    }
}
