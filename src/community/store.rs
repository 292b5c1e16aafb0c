use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ClientError, IncidentReport, ReportedIncident};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingReport {
    pub local_id: Uuid,
    pub queued_at: DateTime<Utc>,
    pub report: IncidentReport,
}

impl PendingReport {
    pub fn new(report: IncidentReport) -> Self {
        Self {
            local_id: Uuid::new_v4(),
            queued_at: Utc::now(),
            report,
        }
    }
}

/// Everything the client keeps on disk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheFile {
    /// Last list the server returned.
    #[serde(default)]
    pub snapshot: Vec<ReportedIncident>,
    /// Reports not yet accepted by the server, oldest first.
    #[serde(default)]
    pub pending: Vec<PendingReport>,
}

/// A JSON file holding the [`CacheFile`]. Writes go to a sibling temp file
/// that is then renamed over the original.
#[derive(Clone, Debug)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<CacheFile, ClientError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CacheFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, cache: &CacheFile) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(cache)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::views::Location;
    use crate::entities::prelude::IncidentType;

    fn report() -> IncidentReport {
        IncidentReport {
            incident_type: IncidentType::Poaching,
            description: "Snare wire found near the waterhole".into(),
            location: Location { latitude: 11.66, longitude: 76.63, address: None },
            reported_by: Uuid::new_v4(),
            severity: None,
            images: vec![],
            notes: None,
        }
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let store = LocalStore::new(std::env::temp_dir().join(format!("vr-missing-{}.json", Uuid::new_v4())));
        assert_eq!(store.load().await.unwrap(), CacheFile::default());
    }

    #[tokio::test]
    async fn saved_cache_is_read_back() {
        let dir = std::env::temp_dir().join(format!("vr-store-{}", Uuid::new_v4()));
        let store = LocalStore::new(dir.join("reports.json"));

        let cache = CacheFile {
            snapshot: vec![],
            pending: vec![PendingReport::new(report())],
        };
        store.save(&cache).await.unwrap();

        assert_eq!(store.load().await.unwrap(), cache);
        assert!(!store.path().with_extension("tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("vr-corrupt-{}.json", Uuid::new_v4()));
        std::fs::write(&path, b"{not json").unwrap();

        let err = LocalStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, ClientError::Codec(_)));

        let _ = std::fs::remove_file(&path);
    }
}
