use crate::core::{Snapshot, Storage};
use crate::domain::model::{CombinedRow, FuelPrice, Station};
use crate::utils::error::{FuelError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const STATIONS_FILE: &str = "stations.csv";
pub const PRICES_FILE: &str = "prices.csv";
pub const COMBINED_FILE: &str = "combined.csv";

const SNAPSHOT_PREFIX: &str = "backup_";

/// 快照目錄管理：每次執行寫入 backup_<YYYYMMDD>/ 下的三個 CSV，
/// 重新載入時取字典序最大的目錄
pub struct SnapshotArchive<S: Storage> {
    storage: S,
}

impl<S: Storage> SnapshotArchive<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn snapshot_dir_name() -> String {
        format!(
            "{}{}",
            SNAPSHOT_PREFIX,
            chrono::Local::now().format("%Y%m%d")
        )
    }

    /// 將三張表寫成當日快照，回傳快照目錄名稱
    pub async fn write_snapshot(&self, snapshot: &Snapshot) -> Result<String> {
        let dir = Self::snapshot_dir_name();

        let stations_csv = to_csv_bytes(&snapshot.stations)?;
        let prices_csv = to_csv_bytes(&snapshot.prices)?;
        let combined_csv = to_csv_bytes(&snapshot.combined)?;

        self.storage
            .write_file(&format!("{}/{}", dir, STATIONS_FILE), &stations_csv)
            .await?;
        self.storage
            .write_file(&format!("{}/{}", dir, PRICES_FILE), &prices_csv)
            .await?;
        self.storage
            .write_file(&format!("{}/{}", dir, COMBINED_FILE), &combined_csv)
            .await?;

        tracing::debug!(
            "💾 Wrote snapshot '{}' ({} stations, {} prices, {} combined rows)",
            dir,
            snapshot.stations.len(),
            snapshot.prices.len(),
            snapshot.combined.len()
        );

        Ok(dir)
    }

    /// 字典序最大的 backup_* 目錄即最近一次快照
    pub async fn latest_snapshot_dir(&self) -> Result<String> {
        let mut dirs: Vec<String> = self
            .storage
            .list_dirs("")
            .await?
            .into_iter()
            .filter(|name| name.starts_with(SNAPSHOT_PREFIX))
            .collect();

        dirs.sort();
        dirs.pop().ok_or_else(|| FuelError::SnapshotError {
            message: "no snapshot directories found".to_string(),
        })
    }

    /// 讀回最近一次快照的三張表，回傳 (目錄名, 快照)
    pub async fn read_latest(&self) -> Result<(String, Snapshot)> {
        let dir = self.latest_snapshot_dir().await?;

        let stations_csv = self
            .storage
            .read_file(&format!("{}/{}", dir, STATIONS_FILE))
            .await?;
        let prices_csv = self
            .storage
            .read_file(&format!("{}/{}", dir, PRICES_FILE))
            .await?;
        let combined_csv = self
            .storage
            .read_file(&format!("{}/{}", dir, COMBINED_FILE))
            .await?;

        let snapshot = Snapshot {
            stations: from_csv_bytes::<Station>(&stations_csv)?,
            prices: from_csv_bytes::<FuelPrice>(&prices_csv)?,
            combined: from_csv_bytes::<CombinedRow>(&combined_csv)?,
        };

        tracing::debug!(
            "📂 Read snapshot '{}' ({} stations, {} prices, {} combined rows)",
            dir,
            snapshot.stations.len(),
            snapshot.prices.len(),
            snapshot.combined.len()
        );

        Ok((dir, snapshot))
    }
}

fn to_csv_bytes<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| FuelError::ProcessingError {
            message: format!("CSV buffer error: {}", e),
        })
}

fn from_csv_bytes<T: DeserializeOwned>(data: &[u8]) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_reader(data);
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn insert(&self, path: &str, data: &[u8]) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                FuelError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn list_dirs(&self, _path: &str) -> Result<Vec<String>> {
            let files = self.files.lock().await;
            let mut dirs: Vec<String> = files
                .keys()
                .filter_map(|key| key.split_once('/').map(|(dir, _)| dir.to_string()))
                .collect();
            dirs.sort();
            dirs.dedup();
            Ok(dirs)
        }
    }

    fn sample_snapshot() -> Snapshot {
        let stations = vec![Station {
            brandid: "1".to_string(),
            stationid: "S1".to_string(),
            brand: "Caltex".to_string(),
            code: 121,
            name: "Caltex Chatswood".to_string(),
            address: "1 Victoria Ave, Chatswood NSW 2067".to_string(),
            latitude: -33.796,
            longitude: 151.183,
            state: "NSW".to_string(),
        }];
        let prices = vec![
            FuelPrice {
                stationcode: "121".to_string(),
                fueltype: "E10".to_string(),
                price: 179.9,
                lastupdated: "02/08/2026 07:31:00".to_string(),
            },
            FuelPrice {
                stationcode: "999".to_string(),
                fueltype: "P95".to_string(),
                price: 201.5,
                lastupdated: "02/08/2026 07:45:00".to_string(),
            },
        ];
        let combined = vec![
            CombinedRow {
                brandid: Some("1".to_string()),
                stationid: Some("S1".to_string()),
                brand: Some("Caltex".to_string()),
                code: Some(121),
                name: Some("Caltex Chatswood".to_string()),
                address: Some("1 Victoria Ave, Chatswood NSW 2067".to_string()),
                latitude: Some(-33.796),
                longitude: Some(151.183),
                state: Some("NSW".to_string()),
                stationcode: "121".to_string(),
                fueltype: "E10".to_string(),
                price: 179.9,
                lastupdated: "02/08/2026 07:31:00".to_string(),
            },
            CombinedRow {
                brandid: None,
                stationid: None,
                brand: None,
                code: None,
                name: None,
                address: None,
                latitude: None,
                longitude: None,
                state: None,
                stationcode: "999".to_string(),
                fueltype: "P95".to_string(),
                price: 201.5,
                lastupdated: "02/08/2026 07:45:00".to_string(),
            },
        ];

        Snapshot {
            stations,
            prices,
            combined,
        }
    }

    #[tokio::test]
    async fn test_write_then_read_latest_round_trips() {
        let storage = MockStorage::new();
        let archive = SnapshotArchive::new(storage);
        let snapshot = sample_snapshot();

        let dir = archive.write_snapshot(&snapshot).await.unwrap();
        assert!(dir.starts_with("backup_"));

        let (read_dir, reloaded) = archive.read_latest().await.unwrap();
        assert_eq!(read_dir, dir);
        assert_eq!(reloaded, snapshot);
    }

    #[tokio::test]
    async fn test_read_latest_picks_lexicographically_last_dir() {
        let storage = MockStorage::new();
        let empty = to_csv_bytes::<Station>(&[]).unwrap();

        for dir in ["backup_20250101", "backup_20260102", "backup_20251231"] {
            storage
                .insert(&format!("{}/{}", dir, STATIONS_FILE), &empty)
                .await;
            storage
                .insert(&format!("{}/{}", dir, PRICES_FILE), &empty)
                .await;
            storage
                .insert(&format!("{}/{}", dir, COMBINED_FILE), &empty)
                .await;
        }

        let archive = SnapshotArchive::new(storage);
        let dir = archive.latest_snapshot_dir().await.unwrap();
        assert_eq!(dir, "backup_20260102");
    }

    #[tokio::test]
    async fn test_non_snapshot_dirs_are_ignored() {
        let storage = MockStorage::new();
        storage.insert("scratch/notes.txt", b"x").await;

        let archive = SnapshotArchive::new(storage);
        let result = archive.latest_snapshot_dir().await;
        assert!(matches!(result, Err(FuelError::SnapshotError { .. })));
    }

    #[tokio::test]
    async fn test_read_latest_with_no_snapshots_errors() {
        let storage = MockStorage::new();
        let archive = SnapshotArchive::new(storage);

        let result = archive.read_latest().await;
        assert!(matches!(result, Err(FuelError::SnapshotError { .. })));
    }

    #[tokio::test]
    async fn test_empty_snapshot_round_trips() {
        let storage = MockStorage::new();
        let archive = SnapshotArchive::new(storage);
        let snapshot = Snapshot::default();

        archive.write_snapshot(&snapshot).await.unwrap();
        let (_, reloaded) = archive.read_latest().await.unwrap();

        assert!(reloaded.stations.is_empty());
        assert!(reloaded.prices.is_empty());
        assert!(reloaded.combined.is_empty());
    }
}
