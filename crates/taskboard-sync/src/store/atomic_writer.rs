use std::path::Path;
use taskboard_core::{BoardError, BoardResult};
use tokio::fs;

/// Whole-file writes that never leave a half-written file behind.
pub struct AtomicWriter;

impl AtomicWriter {
    /// Write `data` to a temp file next to `path`, then rename it over `path`.
    pub async fn write_atomic(path: &Path, data: &[u8]) -> BoardResult<()> {
        // Same directory, so the rename never crosses filesystems.
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).await?;

        let temp_path = tempfile::NamedTempFile::new_in(parent)?.into_temp_path();
        fs::write(&temp_path, data).await?;
        temp_path
            .persist(path)
            .map_err(|e| BoardError::Io(e.error))?;

        tracing::debug!(
            "Atomically wrote {} bytes to {}",
            data.len(),
            path.display()
        );
        Ok(())
    }

    /// `None` when the file does not exist yet.
    pub async fn read_optional(path: &Path) -> BoardResult<Option<Vec<u8>>> {
        match fs::read(path).await {
            Ok(data) => {
                tracing::debug!("Read {} bytes from {}", data.len(), path.display());
                Ok(Some(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
