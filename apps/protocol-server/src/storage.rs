//! On-disk storage for uploaded contracts and generated protocols

use std::path::{Path, PathBuf};

use tracing::debug;

/// Reduce a client-supplied filename to a safe single path component.
///
/// Keeps letters, digits, `-`, `_` and `.`, turns whitespace into `_`, and
/// strips leading dots and underscores. Returns `None` when nothing usable is
/// left.
pub fn sanitize_filename(name: &str) -> Option<String> {
    // browsers on Windows may send the full client path
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    let cleaned = cleaned.trim_start_matches(['.', '_']).to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// True for `.docx` names, case-insensitive
pub fn has_docx_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.eq_ignore_ascii_case("docx"))
        .unwrap_or(false)
}

/// Names served by `/download` must be a bare file name
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

#[derive(Debug, Clone)]
pub struct Storage {
    upload_dir: PathBuf,
    output_dir: PathBuf,
}

impl Storage {
    /// Create the storage directories if they do not exist yet.
    pub fn open(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let storage = Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
        };
        std::fs::create_dir_all(&storage.upload_dir)?;
        std::fs::create_dir_all(&storage.output_dir)?;
        Ok(storage)
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub async fn save_upload(&self, name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.upload_dir.join(name);
        tokio::fs::write(&path, bytes).await?;
        debug!("Saved upload to {}", path.display());
        Ok(path)
    }

    pub async fn save_protocol(&self, name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let path = self.output_dir.join(name);
        tokio::fs::write(&path, bytes).await?;
        debug!("Saved protocol to {}", path.display());
        Ok(path)
    }

    /// Read a generated protocol; `Ok(None)` when it does not exist.
    pub async fn read_protocol(&self, name: &str) -> std::io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.output_dir.join(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
