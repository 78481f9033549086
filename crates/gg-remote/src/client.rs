//! ImageGenClient - text-to-image inference over a task-array HTTP API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The environment variable name for the API key.
pub const API_KEY_ENV: &str = "RUNWARE_API_KEY";

/// Default endpoint for task submission.
pub const API_BASE_URL: &str = "https://api.runware.ai/v1";

/// Default inference model.
pub const DEFAULT_MODEL: &str = "runware:100@1";

/// Default end-to-end budget for generate + download (120 seconds).
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Default timeout for a single HTTP request (60 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Output image side, in pixels.
const IMAGE_SIZE: u32 = 768;

/// Inference steps for the fast default model.
const INFERENCE_STEPS: u32 = 4;

/// Errors from the remote generation service.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("API key not configured (set {API_KEY_ENV})")]
    MissingApiKey,

    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("API returned no image for this task")]
    NoResult,

    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),
}

/// Validate a prompt before sending it.
///
/// # Errors
/// Returns `RemoteError::EmptyPrompt` for empty or whitespace-only prompts.
pub fn validate_prompt(prompt: &str) -> Result<(), RemoteError> {
    if prompt.trim().is_empty() {
        return Err(RemoteError::EmptyPrompt);
    }
    Ok(())
}

/// Caller-facing generation parameters. Unset fields take the service defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateImageParams {
    pub positive_prompt: String,
    pub model: Option<String>,
    pub number_results: Option<u32>,
    pub output_format: Option<String>,
    pub cfg_scale: Option<f32>,
    pub scheduler: Option<String>,
    pub strength: Option<f32>,
    /// "compel" or "sdEmbeds". Dropped for the default model.
    pub prompt_weighting: Option<String>,
    /// `None` or 0 lets the service pick a seed.
    pub seed: Option<u64>,
    pub lora: Vec<String>,
}

impl GenerateImageParams {
    /// Params with only a prompt set.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            positive_prompt: prompt.into(),
            ..Self::default()
        }
    }
}

/// Wire form of an inference task.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InferenceTask<'a> {
    task_type: &'static str,
    #[serde(rename = "taskUUID")]
    task_uuid: &'a str,
    positive_prompt: &'a str,
    model: &'a str,
    width: u32,
    height: u32,
    number_results: u32,
    output_format: &'a str,
    steps: u32,
    #[serde(rename = "CFGScale")]
    cfg_scale: f32,
    scheduler: &'a str,
    strength: f32,
    lora: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_weighting: Option<&'a str>,
}

impl<'a> InferenceTask<'a> {
    fn from_params(params: &'a GenerateImageParams, task_uuid: &'a str) -> Self {
        let model = params.model.as_deref().unwrap_or(DEFAULT_MODEL);
        Self {
            task_type: "imageInference",
            task_uuid,
            positive_prompt: &params.positive_prompt,
            model,
            width: IMAGE_SIZE,
            height: IMAGE_SIZE,
            number_results: params.number_results.unwrap_or(1),
            output_format: params.output_format.as_deref().unwrap_or("WEBP"),
            steps: INFERENCE_STEPS,
            cfg_scale: params.cfg_scale.unwrap_or(1.0),
            scheduler: params
                .scheduler
                .as_deref()
                .unwrap_or("FlowMatchEulerDiscreteScheduler"),
            strength: params.strength.unwrap_or(0.8),
            lora: &params.lora,
            seed: params.seed.filter(|&s| s != 0),
            prompt_weighting: if model == DEFAULT_MODEL {
                None
            } else {
                params.prompt_weighting.as_deref()
            },
        }
    }
}

/// Response envelope: either `data` items or top-level `errors`.
#[derive(Debug, Deserialize)]
struct TaskResponse {
    #[serde(default)]
    data: Vec<TaskData>,
    #[serde(default)]
    errors: Vec<ApiErrorItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskData {
    #[serde(rename = "taskUUID", default)]
    task_uuid: Option<String>,
    #[serde(rename = "imageURL", default)]
    image_url: Option<String>,
    #[serde(default)]
    positive_prompt: Option<String>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(rename = "NSFWContent", default)]
    nsfw_content: bool,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorItem {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl ApiErrorItem {
    fn describe(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(msg)) => format!("{code}: {msg}"),
            (None, Some(msg)) => msg.clone(),
            (Some(code), None) => code.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}

/// A generated image, as reported by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub image_url: String,
    pub positive_prompt: String,
    pub seed: u64,
    pub nsfw_content: bool,
}

/// Client for the remote text-to-image service.
pub struct ImageGenClient {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl ImageGenClient {
    /// Create a client by reading the API key from `RUNWARE_API_KEY`.
    ///
    /// # Errors
    /// Returns `RemoteError::MissingApiKey` if the variable is unset or empty.
    pub fn new() -> Result<Self, RemoteError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| RemoteError::MissingApiKey)?;
        Self::with_api_key(api_key)
    }

    /// Create a client with an explicit API key.
    ///
    /// # Errors
    /// Returns `RemoteError::MissingApiKey` for an empty key, or `Http` if the
    /// HTTP client cannot be built.
    pub fn with_api_key(api_key: String) -> Result<Self, RemoteError> {
        Self::with_base_url(api_key, API_BASE_URL.to_string())
    }

    /// Create a client against a custom endpoint (tests, proxies).
    ///
    /// # Errors
    /// Same as [`ImageGenClient::with_api_key`].
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, RemoteError> {
        if api_key.trim().is_empty() {
            return Err(RemoteError::MissingApiKey);
        }
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            api_key,
            base_url,
            http_client,
        })
    }

    /// The configured endpoint.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit one inference task and wait for its result.
    ///
    /// # Errors
    /// `EmptyPrompt`, `Http` on transport failure, `Api` when the service
    /// reports an error, `NoResult` when no image comes back for the task.
    pub async fn generate(
        &self,
        params: &GenerateImageParams,
    ) -> Result<GeneratedImage, RemoteError> {
        validate_prompt(&params.positive_prompt)?;

        let task_uuid = new_task_uuid();
        let task = InferenceTask::from_params(params, &task_uuid);
        log::info!("Génération distante : tâche {task_uuid}, modèle {}", task.model);

        let response = self
            .http_client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&[task])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: Option<TaskResponse> = serde_json::from_str(&body).ok();

        if let Some(message) = parsed.as_ref().and_then(error_message) {
            return Err(RemoteError::Api(message));
        }
        if !status.is_success() {
            return Err(RemoteError::Api(format!("HTTP {status}: {body}")));
        }
        let parsed = parsed.ok_or_else(|| RemoteError::Api(format!("malformed response: {body}")))?;

        let item = parsed
            .data
            .into_iter()
            .filter(|d| d.task_uuid.as_deref().is_none_or(|id| id == task_uuid))
            .find(|d| d.image_url.is_some())
            .ok_or(RemoteError::NoResult)?;

        Ok(GeneratedImage {
            image_url: item.image_url.unwrap_or_default(),
            positive_prompt: item
                .positive_prompt
                .unwrap_or_else(|| params.positive_prompt.clone()),
            seed: item.seed.unwrap_or_default(),
            nsfw_content: item.nsfw_content,
        })
    }

    /// Download image bytes.
    ///
    /// # Errors
    /// Returns `Http` on transport failure or a non-success status.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        let response = self.http_client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        log::debug!("Image téléchargée : {} octets", bytes.len());
        Ok(bytes.to_vec())
    }

    /// Generate, then download, under a single deadline.
    ///
    /// # Errors
    /// `Timeout` if the deadline passes, otherwise as for `generate` and `fetch_image`.
    pub async fn generate_and_fetch(
        &self,
        params: &GenerateImageParams,
        deadline: Duration,
    ) -> Result<(GeneratedImage, Vec<u8>), RemoteError> {
        tokio::time::timeout(deadline, async {
            let image = self.generate(params).await?;
            let bytes = self.fetch_image(&image.image_url).await?;
            Ok((image, bytes))
        })
        .await
        .map_err(|_| RemoteError::Timeout(deadline))?
    }
}

/// First reported error: top-level `errors`, else a data item's `errorMessage`.
fn error_message(response: &TaskResponse) -> Option<String> {
    if !response.errors.is_empty() {
        let joined: Vec<String> = response.errors.iter().map(ApiErrorItem::describe).collect();
        return Some(joined.join("; "));
    }
    response.data.iter().find_map(|d| d.error_message.clone())
}

/// Random version-4 UUID string.
fn new_task_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}
