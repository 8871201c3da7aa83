use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = fs::read(self.full_path(path))?;
        Ok(data)
    }

    /// 先寫到同目錄的暫存檔再 rename，讀者不會看到寫到一半的內容
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);
        let write_failure = |source: std::io::Error| EtlError::WriteFailure {
            path: full_path.display().to_string(),
            source,
        };

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(write_failure)?;
        }

        let file_name = full_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let temp_path = full_path.with_file_name(format!(".{}.tmp", file_name));

        if let Err(e) = fs::write(&temp_path, data) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_failure(e));
        }

        if let Err(e) = fs::rename(&temp_path, &full_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_failure(e));
        }

        Ok(())
    }

    fn location(&self, path: &str) -> String {
        self.full_path(path).display().to_string()
    }
}
