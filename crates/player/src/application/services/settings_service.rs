//! Settings Service - Prompt templates and model provider configuration

use theatre_shared::{ModelConfig, PromptTemplates};

use crate::application::api::TheatreApi;
use crate::application::{ParseResponse, ServiceError};

#[derive(Clone)]
pub struct SettingsService {
    api: TheatreApi,
}

impl SettingsService {
    pub fn new(api: TheatreApi) -> Self {
        Self { api }
    }

    pub async fn prompts(&self) -> Result<PromptTemplates, ServiceError> {
        let prompts = self.api.get_prompt_settings().await.parse()?;
        let missing = prompts.missing_keys();
        if !missing.is_empty() {
            tracing::debug!(?missing, "Backend omitted prompt templates");
        }
        Ok(prompts)
    }

    pub async fn save_prompts(&self, prompts: &PromptTemplates) -> Result<(), ServiceError> {
        self.api.save_prompt_settings(prompts).await.parse()?;
        tracing::info!("Prompt templates saved");
        Ok(())
    }

    pub async fn model_config(&self) -> Result<ModelConfig, ServiceError> {
        self.api.get_model_config().await.parse()
    }

    pub async fn save_model_config(&self, config: &ModelConfig) -> Result<(), ServiceError> {
        self.api.save_model_config(config).await.parse()?;
        tracing::info!(provider = %config.provider, "Model configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ports::outbound::{ApiError, MockRawApiPort};
    use serde_json::json;
    use theatre_shared::ModelProvider;

    #[tokio::test]
    async fn save_prompts_posts_templates_verbatim() {
        let mut raw = MockRawApiPort::new();
        raw.expect_post_json()
            .withf(|path, body| path == "/api/prompt" && *body == json!({"prompt_drama_v1": "Act!"}))
            .returning(|_, _| Ok(json!({"message": "ok"})));

        let mut prompts = PromptTemplates::default();
        prompts.set("prompt_drama_v1", "Act!");
        SettingsService::new(TheatreApi::new(Arc::new(raw)))
            .save_prompts(&prompts)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn model_config_round_trip_through_backend() {
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .withf(|path| path == "/api/model-config")
            .returning(|_| Ok(json!({"provider": "deepseek", "deepseek": {"api_key": "k", "api_url": "u", "model": "m"}})));
        raw.expect_post_json()
            .returning(|_, _| Err(ApiError::http_status(500, "")));

        let svc = SettingsService::new(TheatreApi::new(Arc::new(raw)));
        let config = svc.model_config().await.unwrap();
        assert_eq!(config.provider, ModelProvider::Deepseek);

        let err = svc.save_model_config(&config).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }
}
