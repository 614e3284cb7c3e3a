use crate::domain::ports::StateStore;
use crate::utils::error::{ProviderError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// 以 JSON 檔保存本地狀態
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for FileStateStore {
    async fn read_state(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ProviderError::StateError {
                message: format!("Failed to read state file {}: {}", self.path.display(), e),
            }),
        }
    }

    // 先寫暫存檔再改名，避免寫到一半的狀態檔
    async fn write_state(&self, data: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, data).await?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| ProviderError::StateError {
                message: format!("Failed to replace state file {}: {}", self.path.display(), e),
            })?;
        Ok(())
    }
}
