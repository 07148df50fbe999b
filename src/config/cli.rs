use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    async fn list_dirs(&self, path: &str) -> Result<Vec<String>> {
        let full_path = Path::new(&self.base_path).join(path);
        let mut dirs = Vec::new();

        for entry in fs::read_dir(full_path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    dirs.push(name.to_string());
                }
            }
        }

        Ok(dirs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_dirs_and_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage
            .write_file("backup_20260101/stations.csv", b"code\n121\n")
            .await
            .unwrap();

        let data = storage.read_file("backup_20260101/stations.csv").await.unwrap();
        assert_eq!(data, b"code\n121\n");
    }

    #[tokio::test]
    async fn test_list_dirs_only_returns_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage
            .write_file("backup_20260101/stations.csv", b"x")
            .await
            .unwrap();
        storage.write_file("loose-file.txt", b"x").await.unwrap();

        let dirs = storage.list_dirs("").await.unwrap();
        assert_eq!(dirs, vec!["backup_20260101".to_string()]);
    }

    #[tokio::test]
    async fn test_list_dirs_on_missing_path_errors() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(
            temp_dir
                .path()
                .join("does-not-exist")
                .to_str()
                .unwrap()
                .to_string(),
        );

        assert!(storage.list_dirs("").await.is_err());
    }
}
