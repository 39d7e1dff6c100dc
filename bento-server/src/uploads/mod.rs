//! Image upload side-channel
//!
//! The only thing the rest of the system learns from an upload is the URL
//! string stored on a menu item. Files land under `<work_dir>/uploads`
//! with a timestamped unique name and are served back at `/uploads/...`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::utils::AppError;

#[derive(Clone, Debug)]
pub struct UploadService {
    dir: PathBuf,
}

impl UploadService {
    pub fn new(work_dir: &str) -> Self {
        Self {
            dir: Path::new(work_dir).join("uploads"),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// Write an uploaded image and return its public URL path.
    ///
    /// The original extension is kept when the client supplied one; the
    /// rest of the name is server-generated so uploads cannot collide or
    /// escape the directory.
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<String, AppError> {
        let ext = original_name
            .and_then(|n| Path::new(n).extension())
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();

        let suffix = Uuid::new_v4().simple().to_string();
        let name = format!(
            "image-{}-{}{}",
            Utc::now().timestamp_millis(),
            &suffix[..8],
            ext
        );

        tokio::fs::write(self.dir.join(&name), bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {e}")))?;

        Ok(format!("/uploads/{name}"))
    }
}
