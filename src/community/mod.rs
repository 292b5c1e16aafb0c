//! Client side of community reporting: submitting incidents to the server,
//! keeping a local cache for when the server is unreachable, and turning a
//! voice note into a draft report.

pub mod api_client;
pub mod repository;
pub mod store;
pub mod transcribe;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::api::views::Location;
use crate::entities::prelude::{IncidentStatus, IncidentType, Severity};

pub use api_client::ReportsApi;
pub use repository::{CachedIncidentRepository, IncidentRepository, Listing, Submission};
pub use store::LocalStore;
pub use transcribe::{Audio, GeminiTranscriber, StaticTranscriber, TranscribedReport, Transcriber};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server accepted the request but its answer could not be read.
    #[error("unreadable response to an accepted request: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("server rejected the request ({status}): {code}: {message}")]
    Rejected {
        status: u16,
        code: String,
        message: String,
    },

    #[error("local store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("local store is corrupt: {0}")]
    Codec(#[from] serde_json::Error),
}

impl ClientError {
    /// Transport failures and server-side errors are worth retrying later;
    /// a 4xx rejection will fail the same way again. A 2xx whose body cannot
    /// be read is not retried either: the server already stored the report.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(_) => true,
            ClientError::Rejected { status, .. } => *status >= 500,
            ClientError::Decode(_) | ClientError::Store(_) | ClientError::Codec(_) => false,
        }
    }
}

/// An incident as the community form submits it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentReport {
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub description: String,
    pub location: Location,
    pub reported_by: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl IncidentReport {
    pub fn from_transcript(transcript: TranscribedReport, location: Location, reported_by: Uuid) -> Self {
        Self {
            incident_type: transcript.incident_type,
            description: transcript.description,
            location,
            reported_by,
            severity: None,
            images: Vec::new(),
            notes: None,
        }
    }
}

/// An incident as the server returned it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedIncident {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub description: String,
    pub location: Location,
    pub severity: Severity,
    pub status: IncidentStatus,
    #[serde(default)]
    pub images: Vec<String>,
    pub timestamp: DateTime<Utc>,
}
