use std::time::Duration;

use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::message::ChatMessage;
use crate::model::settings::BackendSettings;

/// Backend failures, classified up front into retryable and permanent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("model is still loading")]
    Loading { estimated_wait: Option<Duration> },

    #[error("rate limited by backend")]
    RateLimited,

    #[error("missing API key (set {0})")]
    MissingCredentials(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("backend error: {0}")]
    Other(String),
}

impl BackendError {
    pub fn is_transient(&self) -> bool {
        matches!(self, BackendError::Loading { .. } | BackendError::RateLimited)
    }
}

/// Something that can turn a conversation into raw model output.
pub trait NarrativeBackend: Send {
    fn complete(&self, conversation: &[ChatMessage]) -> Result<String, BackendError>;
}

const EXAMPLE_PROMPT: &str = "Écris un court récit de 100 à 200 mots se déroulant pendant l'Antiquité romaine \
dans un monde parallèle où Rome domine la Méditerranée\navec quelques innovations technologiques.\n\n\
Commence directement par le récit sans introduction.";

const EXAMPLE_STORY: &str = "Sur le forum, les horloges à eau de Vitruve rythment les journées des sénateurs. \
Livia, fille d'un marchand d'huile, descend chaque matin vers le port d'Ostie où les galères à roues \
remontent le Tibre sans rameurs. Dans les thermes, on murmure que l'empereur a commandé une machine \
capable de prédire les crues du fleuve, et les augures, inquiets, regardent le ciel avec moins d'assurance \
qu'autrefois.";

/// One-shot exchange that biases the model towards bare narrative output,
/// followed by the real prompt.
pub fn conversation(prompt: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::user(EXAMPLE_PROMPT),
        ChatMessage::assistant(EXAMPLE_STORY),
        ChatMessage::user(prompt),
    ]
}

#[derive(Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub message: ChatMessageResponse,
}

#[derive(Deserialize)]
pub struct ChatMessageResponse {
    #[serde(default)]
    pub content: Option<String>,
}

/// OpenAI-compatible chat completions over blocking HTTP
/// (LM Studio, Ollama's /v1, llama.cpp server).
pub struct ChatBackend {
    client: Client,
    settings: BackendSettings,
    api_key: Option<String>,
}

impl ChatBackend {
    pub fn from_settings(settings: &BackendSettings) -> Result<Self, BackendError> {
        let api_key = settings.api_key();
        if settings.require_api_key && api_key.is_none() {
            return Err(BackendError::MissingCredentials(settings.api_key_env.clone()));
        }

        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            settings: settings.clone(),
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    /// Lists the models the server exposes.
    pub fn test_connection(&self) -> anyhow::Result<String> {
        let mut request = self.client.get(self.endpoint("models"));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp: serde_json::Value = request
            .send()
            .context("backend did not answer")?
            .error_for_status()?
            .json()
            .context("backend returned an unexpected model list")?;

        Ok(format!(
            "Connected ({} models available)",
            resp["data"].as_array().map(|a| a.len()).unwrap_or(0)
        ))
    }
}

impl NarrativeBackend for ChatBackend {
    fn complete(&self, conversation: &[ChatMessage]) -> Result<String, BackendError> {
        let req = ChatCompletionRequest {
            model: &self.settings.model,
            messages: conversation,
            temperature: self.settings.temperature,
            top_p: self.settings.top_p,
            max_tokens: self.settings.max_tokens,
            stream: false,
        };

        let mut request = self.client.post(self.endpoint("chat/completions")).json(&req);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().map_err(|e| {
            if e.is_timeout() {
                BackendError::Other(format!("request timed out: {e}"))
            } else {
                BackendError::Other(e.to_string())
            }
        })?;

        let status = resp.status();
        let body = resp.text().map_err(|e| BackendError::Other(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::Other(format!("malformed response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| BackendError::Other("response had no choices".into()))
    }
}

/// Maps a non-success HTTP answer onto the error taxonomy.
pub fn classify_failure(status: StatusCode, body: &str) -> BackendError {
    let detail: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let mentions_loading = body.to_lowercase().contains("loading");

    if status == StatusCode::TOO_MANY_REQUESTS {
        return BackendError::RateLimited;
    }

    if status == StatusCode::SERVICE_UNAVAILABLE || mentions_loading {
        let estimated_wait = detail
            .as_ref()
            .and_then(|v| v["estimated_time"].as_f64())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64);
        return BackendError::Loading { estimated_wait };
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return BackendError::Other(format!("authentication rejected ({status})"));
    }

    let message = detail
        .as_ref()
        .and_then(|v| v["error"]["message"].as_str().or_else(|| v["error"].as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| body.chars().take(200).collect());

    BackendError::Other(format!("{status}: {message}"))
}

/// Stand-in when no HTTP client could be built. Every call fails permanently.
pub struct UnavailableBackend {
    pub reason: BackendError,
}

impl NarrativeBackend for UnavailableBackend {
    fn complete(&self, _conversation: &[ChatMessage]) -> Result<String, BackendError> {
        Err(self.reason.clone())
    }
}

/// Builds the configured backend, degrading to [`UnavailableBackend`].
pub fn backend_from_settings(settings: &BackendSettings) -> Box<dyn NarrativeBackend> {
    match ChatBackend::from_settings(settings) {
        Ok(backend) => Box::new(backend),
        Err(reason) => {
            tracing::warn!(%reason, "narrative backend unavailable, only canned stories will be served");
            Box::new(UnavailableBackend { reason })
        }
    }
}
