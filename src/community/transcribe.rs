use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::entities::prelude::IncidentType;

const GEMINI_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("transcriber is not configured: {0}")]
    Config(&'static str),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transcription service error: {0}")]
    Service(String),

    #[error("could not read the model answer: {0}")]
    Parse(String),
}

/// A recorded voice note.
#[derive(Clone, Debug)]
pub struct Audio {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribedReport {
    pub incident_type: IncidentType,
    pub description: String,
}

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Audio) -> Result<TranscribedReport, TranscriptionError>;
}

/// Always answers with the same report. Used offline and in tests.
pub struct StaticTranscriber(pub TranscribedReport);

#[async_trait]
impl Transcriber for StaticTranscriber {
    async fn transcribe(&self, _audio: Audio) -> Result<TranscribedReport, TranscriptionError> {
        Ok(self.0.clone())
    }
}

pub struct GeminiTranscriber {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

struct UploadedFile {
    name: String,
    uri: String,
}

impl GeminiTranscriber {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: GEMINI_BASE.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn from_env() -> Result<Self, TranscriptionError> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| TranscriptionError::Config("GEMINI_API_KEY must be set"))?;
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string());
        Ok(Self::new(api_key, model))
    }

    /// Points the transcriber at another host serving the same API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn upload(&self, audio: Audio) -> Result<UploadedFile, TranscriptionError> {
        let url = format!("{}/upload/v1beta/files?key={}", self.base_url, self.api_key);
        let part = reqwest::multipart::Part::bytes(audio.bytes)
            .file_name("voice-report")
            .mime_str(&audio.mime_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let res = self.client.post(&url).multipart(form).send().await?;
        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(TranscriptionError::Service(format!("upload failed: {text}")));
        }

        let body: Value = res.json().await?;
        let field = |key: &str| {
            body["file"][key]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| TranscriptionError::Service(format!("upload response has no {key}")))
        };
        Ok(UploadedFile {
            name: field("name")?,
            uri: field("uri")?,
        })
    }

    async fn wait_until_active(&self, file: &UploadedFile) -> Result<(), TranscriptionError> {
        let url = format!("{}/v1beta/{}?key={}", self.base_url, file.name, self.api_key);

        for _ in 0..30 {
            let res = self.client.get(&url).send().await?;
            if !res.status().is_success() {
                let status = res.status();
                let text = res.text().await.unwrap_or_default();
                return Err(TranscriptionError::Service(format!(
                    "file status check failed ({status}): {text}"
                )));
            }
            let body: Value = res.json().await?;
            match body["state"].as_str().unwrap_or("UNKNOWN") {
                "ACTIVE" => return Ok(()),
                "FAILED" => return Err(TranscriptionError::Service("audio processing failed".into())),
                _ => tokio::time::sleep(std::time::Duration::from_secs(2)).await,
            }
        }

        Err(TranscriptionError::Service("timed out waiting for audio processing".into()))
    }

    async fn generate(&self, file: &UploadedFile, mime_type: &str) -> Result<String, TranscriptionError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let prompt = "This is a voice report of a forest incident. Transcribe it and reply with a \
            JSON object only, no markdown: {\"incidentType\": one of \"fire\", \"poaching\", \
            \"illegal-logging\", \"wildlife-injury\", \"encroachment\", \"other\", \
            \"description\": a clear English description of what the reporter saw and where}.";

        let body = json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    { "file_data": { "mime_type": mime_type, "file_uri": file.uri } }
                ]
            }]
        });

        let res = self.client.post(&url).json(&body).send().await?;
        if !res.status().is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(TranscriptionError::Service(format!("generate failed: {text}")));
        }

        let json: Value = res.json().await?;
        json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| TranscriptionError::Parse("no text in model response".into()))
    }
}

#[async_trait]
impl Transcriber for GeminiTranscriber {
    async fn transcribe(&self, audio: Audio) -> Result<TranscribedReport, TranscriptionError> {
        let mime_type = audio.mime_type.clone();
        let file = self.upload(audio).await?;
        self.wait_until_active(&file).await?;
        let text = self.generate(&file, &mime_type).await?;
        parse_model_answer(&text)
    }
}

/// Maps a free-form label from the model onto a known incident type.
pub fn incident_type_from_label(label: &str) -> IncidentType {
    let normalized = label.trim().to_lowercase().replace(['_', ' '], "-");
    match normalized.as_str() {
        "fire" | "forest-fire" | "wildfire" => IncidentType::Fire,
        "poaching" | "hunting" => IncidentType::Poaching,
        "illegal-logging" | "logging" | "tree-felling" => IncidentType::IllegalLogging,
        "wildlife-injury" | "injured-animal" | "animal-injury" => IncidentType::WildlifeInjury,
        "encroachment" => IncidentType::Encroachment,
        _ => IncidentType::Other,
    }
}

/// Reads the model's JSON answer, tolerating markdown fences around it.
pub fn parse_model_answer(text: &str) -> Result<TranscribedReport, TranscriptionError> {
    let clean = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let value: Value = serde_json::from_str(clean)
        .map_err(|e| TranscriptionError::Parse(format!("{e}: {clean}")))?;

    let description = value["description"]
        .as_str()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| TranscriptionError::Parse("answer has no description".into()))?;

    Ok(TranscribedReport {
        incident_type: incident_type_from_label(value["incidentType"].as_str().unwrap_or("other")),
        description: description.to_string(),
    })
}
