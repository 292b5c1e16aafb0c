use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    api_client::IncidentRemote,
    store::{LocalStore, PendingReport},
    ClientError, IncidentReport, ReportedIncident,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Submission {
    Delivered(ReportedIncident),
    /// The server could not be reached; the report waits in the local store.
    Queued(PendingReport),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Listing {
    pub incidents: Vec<ReportedIncident>,
    pub pending: Vec<PendingReport>,
    /// True when `incidents` is the cached snapshot rather than a fresh read.
    pub from_cache: bool,
}

#[async_trait]
pub trait IncidentRepository: Send + Sync {
    async fn submit(&self, report: IncidentReport) -> Result<Submission, ClientError>;
    async fn list(&self) -> Result<Listing, ClientError>;
    /// Replays queued reports in order and returns how many were delivered.
    async fn flush_pending(&self) -> Result<usize, ClientError>;
}

/// Write-through on submit, read-through on list, with the local store as
/// the fallback for both.
pub struct CachedIncidentRepository<R> {
    remote: R,
    store: LocalStore,
    // Serialises read-modify-write cycles on the store file.
    lock: Mutex<()>,
}

impl<R: IncidentRemote> CachedIncidentRepository<R> {
    pub fn new(remote: R, store: LocalStore) -> Self {
        Self {
            remote,
            store,
            lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }
}

#[async_trait]
impl<R: IncidentRemote> IncidentRepository for CachedIncidentRepository<R> {
    async fn submit(&self, report: IncidentReport) -> Result<Submission, ClientError> {
        let _guard = self.lock.lock().await;

        match self.remote.submit(&report).await {
            Ok(incident) => {
                let mut cache = self.store.load().await?;
                cache.snapshot.insert(0, incident.clone());
                self.store.save(&cache).await?;
                Ok(Submission::Delivered(incident))
            }
            Err(e) if e.is_retryable() => {
                tracing::warn!("incident report queued locally: {}", e);
                let pending = PendingReport::new(report);
                let mut cache = self.store.load().await?;
                cache.pending.push(pending.clone());
                self.store.save(&cache).await?;
                Ok(Submission::Queued(pending))
            }
            Err(e) => Err(e),
        }
    }

    async fn list(&self) -> Result<Listing, ClientError> {
        let _guard = self.lock.lock().await;
        let mut cache = self.store.load().await?;

        match self.remote.list().await {
            Ok(incidents) => {
                cache.snapshot = incidents.clone();
                self.store.save(&cache).await?;
                Ok(Listing {
                    incidents,
                    pending: cache.pending,
                    from_cache: false,
                })
            }
            Err(e) if e.is_retryable() => {
                tracing::warn!("serving cached incidents: {}", e);
                Ok(Listing {
                    incidents: cache.snapshot,
                    pending: cache.pending,
                    from_cache: true,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn flush_pending(&self) -> Result<usize, ClientError> {
        let _guard = self.lock.lock().await;
        let mut cache = self.store.load().await?;

        let mut delivered = 0;
        while let Some(next) = cache.pending.first() {
            match self.remote.submit(&next.report).await {
                Ok(incident) => {
                    cache.pending.remove(0);
                    cache.snapshot.insert(0, incident);
                    delivered += 1;
                }
                Err(e) if e.is_retryable() => {
                    tracing::info!("stopping flush, {} reports still queued: {}", cache.pending.len(), e);
                    break;
                }
                Err(e) => {
                    // The server will never accept it; drop it rather than block the queue.
                    let dropped = cache.pending.remove(0);
                    tracing::warn!(local_id = %dropped.local_id, "discarding rejected report: {}", e);
                }
            }
        }

        self.store.save(&cache).await?;
        Ok(delivered)
    }
}
