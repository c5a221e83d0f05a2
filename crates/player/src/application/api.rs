//! Typed transport client for the theatre backend.
//!
//! `TheatreApi` wraps an `Arc<dyn RawApiPort>` and exposes one method per
//! endpoint. Every method answers with the same envelope, [`ApiResponse`]:
//! network failures, non-2xx statuses and 2xx bodies carrying an `error` field
//! all come back as `success == false` with a message, never as a panic.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use theatre_domain::GameState;
use theatre_shared::{
    paths, CharacterInfo, CharacterList, ErrorBody, InfoRequest, InfoTopic, InteractRequest,
    InteractResponse, LoadScriptRequest, ModelConfig, Navigation, NavigationResponse,
    PromptTemplates, SaveReceipt, SaveScriptRequest, SavedScripts, ScriptInfo, SystemFeedback,
    UploadReceipt, WorldRecords,
};

use crate::ports::outbound::{ApiError, RawApiPort, UploadForm};

/// Uniform result envelope of every transport call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    failure: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            failure: None,
        }
    }

    pub fn failed(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            failure: Some(error),
        }
    }

    /// The underlying failure, with its category preserved.
    pub fn failure(&self) -> Option<&ApiError> {
        self.failure.as_ref()
    }

    pub fn into_result(self) -> Result<T, ApiError> {
        match (self.data, self.failure) {
            (Some(data), None) => Ok(data),
            (_, Some(failure)) => Err(failure),
            (None, None) => Err(ApiError::ParseError("empty response".to_string())),
        }
    }
}

impl<T> From<Result<T, ApiError>> for ApiResponse<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(error) => Self::failed(error),
        }
    }
}

#[derive(Clone)]
pub struct TheatreApi {
    raw: Arc<dyn RawApiPort>,
}

impl TheatreApi {
    pub fn new(raw: Arc<dyn RawApiPort>) -> Self {
        Self { raw }
    }

    fn envelope<T>(path: &str, result: Result<T, ApiError>) -> ApiResponse<T> {
        if let Err(error) = &result {
            tracing::warn!(path, error = %error, "API request failed");
        }
        ApiResponse::from(result)
    }

    fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
        if let Some(message) = ErrorBody::extract(&value) {
            return Err(ApiError::Application(message));
        }
        serde_json::from_value(value).map_err(|e| ApiError::ParseError(e.to_string()))
    }

    fn encode<B: Serialize>(body: &B) -> Result<Value, ApiError> {
        serde_json::to_value(body).map_err(|e| ApiError::SerializeError(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResponse<T> {
        let result = async {
            let value = self.raw.get_json(path).await?;
            Self::decode(value)
        }
        .await;
        Self::envelope(path, result)
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(&self, path: &str, body: &B) -> ApiResponse<T> {
        let result = async {
            let body = Self::encode(body)?;
            let value = self.raw.post_json(path, &body).await?;
            Self::decode(value)
        }
        .await;
        Self::envelope(path, result)
    }

    /// POST whose reply only has to be free of an `error` field.
    async fn post_ack<B: Serialize + Sync>(&self, path: &str, body: &B) -> ApiResponse<Value> {
        let result = async {
            let body = Self::encode(body)?;
            let value = self.raw.post_json(path, &body).await?;
            match ErrorBody::extract(&value) {
                Some(message) => Err(ApiError::Application(message)),
                None => Ok(value),
            }
        }
        .await;
        Self::envelope(path, result)
    }

    // =========================================================================
    // Game state
    // =========================================================================

    pub async fn init_game(&self) -> ApiResponse<GameState> {
        self.get(paths::DATA).await
    }

    /// The reply is either the new state or nothing at all, depending on the
    /// backend build; callers rebuild the state from the draft instead.
    pub async fn save_script_config(&self, request: &SaveScriptRequest) -> ApiResponse<Value> {
        self.post_ack(paths::DATA, request).await
    }

    pub async fn calculate_interaction(
        &self,
        request: &InteractRequest,
    ) -> ApiResponse<InteractResponse> {
        self.post(paths::INTERACT, request).await
    }

    pub async fn navigate(&self, navigation: Navigation) -> ApiResponse<NavigationResponse> {
        self.post(paths::INTERACT, &InteractRequest::navigate(navigation))
            .await
    }

    // =========================================================================
    // Info panels
    // =========================================================================

    pub async fn get_characters(&self) -> ApiResponse<CharacterList> {
        self.post(paths::INFO, &InfoRequest::help(InfoTopic::Characters))
            .await
    }

    pub async fn get_world_records(&self) -> ApiResponse<WorldRecords> {
        self.post(paths::INFO, &InfoRequest::help(InfoTopic::Allmemory))
            .await
    }

    pub async fn get_system_feedbacks(&self) -> ApiResponse<SystemFeedback> {
        self.post(paths::INFO, &InfoRequest::help(InfoTopic::Dramallm))
            .await
    }

    pub async fn get_script_info(&self) -> ApiResponse<ScriptInfo> {
        self.post(paths::INFO, &InfoRequest::help(InfoTopic::Allscript))
            .await
    }

    pub async fn get_character_info(&self, name: &str) -> ApiResponse<CharacterInfo> {
        self.post(paths::INFO, &InfoRequest::role(name)).await
    }

    /// Raw export payload, as a file download.
    pub async fn export_records(&self) -> ApiResponse<Vec<u8>> {
        let result = async {
            let body = Self::encode(&InfoRequest::help(InfoTopic::ExportRecords))?;
            self.raw.post_for_bytes(paths::INFO, &body).await
        }
        .await;
        Self::envelope(paths::INFO, result)
    }

    // =========================================================================
    // Scripts
    // =========================================================================

    pub async fn load_script(&self, request: &LoadScriptRequest) -> ApiResponse<GameState> {
        self.post(paths::LOAD, request).await
    }

    pub async fn save_script(&self) -> ApiResponse<SaveReceipt> {
        self.get(paths::SAVE).await
    }

    pub async fn get_saved_scripts(&self) -> ApiResponse<SavedScripts> {
        self.get(paths::SAVED_SCRIPTS).await
    }

    // =========================================================================
    // Settings and assets
    // =========================================================================

    pub async fn get_prompt_settings(&self) -> ApiResponse<PromptTemplates> {
        self.get(paths::PROMPT).await
    }

    pub async fn save_prompt_settings(&self, prompts: &PromptTemplates) -> ApiResponse<Value> {
        self.post_ack(paths::PROMPT, prompts).await
    }

    pub async fn get_model_config(&self) -> ApiResponse<ModelConfig> {
        self.get(paths::MODEL_CONFIG).await
    }

    pub async fn save_model_config(&self, config: &ModelConfig) -> ApiResponse<Value> {
        self.post_ack(paths::MODEL_CONFIG, config).await
    }

    pub async fn upload_character_avatar(
        &self,
        character: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ApiResponse<UploadReceipt> {
        let form = UploadForm::new(file_name, bytes).with_field("name", character);
        let result = async {
            let value = self.raw.post_multipart(paths::UPLOAD, form).await?;
            Self::decode(value)
        }
        .await;
        Self::envelope(paths::UPLOAD, result)
    }
}
