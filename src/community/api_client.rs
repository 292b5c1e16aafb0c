use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use super::{ClientError, IncidentReport, ReportedIncident};

#[async_trait]
pub trait IncidentRemote: Send + Sync {
    async fn submit(&self, report: &IncidentReport) -> Result<ReportedIncident, ClientError>;
    async fn list(&self) -> Result<Vec<ReportedIncident>, ClientError>;
}

/// HTTP client for the incident endpoints.
#[derive(Clone)]
pub struct ReportsApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct CreatedEnvelope {
    incident: ReportedIncident,
}

#[derive(Deserialize)]
struct ListEnvelope {
    incidents: Vec<ReportedIncident>,
}

#[derive(Deserialize, Default)]
struct ErrorEnvelope {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl ReportsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Listing incidents is an admin read and needs a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(res: Response) -> Result<Response, ClientError> {
        if res.status().is_success() {
            return Ok(res);
        }
        let status = res.status().as_u16();
        let body: ErrorEnvelope = res.json().await.unwrap_or_default();
        Err(ClientError::Rejected {
            status,
            code: body.code,
            message: body.message,
        })
    }
}

#[async_trait]
impl IncidentRemote for ReportsApi {
    async fn submit(&self, report: &IncidentReport) -> Result<ReportedIncident, ClientError> {
        let res = self
            .client
            .post(self.url("/api/incidents"))
            .json(report)
            .send()
            .await?;
        let envelope: CreatedEnvelope = Self::check(res)
            .await?
            .json()
            .await
            .map_err(ClientError::Decode)?;
        Ok(envelope.incident)
    }

    async fn list(&self) -> Result<Vec<ReportedIncident>, ClientError> {
        let mut request = self.client.get(self.url("/api/incidents"));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let envelope: ListEnvelope = Self::check(request.send().await?).await?.json().await?;
        Ok(envelope.incidents)
    }
}
