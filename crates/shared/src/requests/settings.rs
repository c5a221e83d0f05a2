//! Backend settings: prompt templates and LLM provider configuration

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Prompt template keys the backend knows about.
pub const PROMPT_KEYS: [&str; 8] = [
    "prompt_drama_v1",
    "prompt_drama_v1_reflect",
    "prompt_drama_v2",
    "prompt_drama_v2_plus",
    "prompt_character",
    "prompt_character_v2",
    "prompt_global_character",
    "prompt_director_reflect",
];

/// `/api/prompt` body, both directions. Unknown keys pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptTemplates(BTreeMap<String, String>);

impl PromptTemplates {
    pub fn new(templates: BTreeMap<String, String>) -> Self {
        Self(templates)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.0.insert(key.into(), template.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Known keys the backend did not send.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        PROMPT_KEYS
            .into_iter()
            .filter(|key| !self.0.contains_key(*key))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelProvider {
    #[default]
    AzureOpenai,
    Openai,
    Deepseek,
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AzureOpenai => "azure_openai",
            Self::Openai => "openai",
            Self::Deepseek => "deepseek",
        })
    }
}

impl FromStr for ModelProvider {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "azure_openai" => Ok(Self::AzureOpenai),
            "openai" => Ok(Self::Openai),
            "deepseek" => Ok(Self::Deepseek),
            other => Err(ProtocolError::UnknownProvider(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AzureOpenaiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub deployment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpenaiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeepseekConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub model: String,
}

/// `/api/model-config` body, both directions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub provider: ModelProvider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_openai: Option<AzureOpenaiConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<OpenaiConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deepseek: Option<DeepseekConfig>,
}

impl ModelConfig {
    /// Copy with every API key masked, for display and logs.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(azure) = copy.azure_openai.as_mut() {
            azure.api_key = mask(&azure.api_key);
        }
        if let Some(openai) = copy.openai.as_mut() {
            openai.api_key = mask(&openai.api_key);
        }
        if let Some(deepseek) = copy.deepseek.as_mut() {
            deepseek.api_key = mask(&deepseek.api_key);
        }
        copy
    }

    /// Set `provider` or one `<provider>.<field>` value, creating the
    /// provider section if it is missing. Leaves `self` untouched on error.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) -> Result<(), ProtocolError> {
        let value = value.into();
        let slot = match field.split_once('.') {
            None if field == "provider" => {
                self.provider = value.parse()?;
                return Ok(());
            }
            Some(("azure_openai", "api_key")) => &mut self.azure().api_key,
            Some(("azure_openai", "api_version")) => &mut self.azure().api_version,
            Some(("azure_openai", "endpoint")) => &mut self.azure().endpoint,
            Some(("azure_openai", "deployment")) => &mut self.azure().deployment,
            Some(("openai", "api_key")) => &mut self.openai().api_key,
            Some(("openai", "base_url")) => &mut self.openai().base_url,
            Some(("openai", "model")) => &mut self.openai().model,
            Some(("deepseek", "api_key")) => &mut self.deepseek().api_key,
            Some(("deepseek", "api_url")) => &mut self.deepseek().api_url,
            Some(("deepseek", "model")) => &mut self.deepseek().model,
            _ => return Err(ProtocolError::UnknownSetting(field.to_string())),
        };
        *slot = value;
        Ok(())
    }

    fn azure(&mut self) -> &mut AzureOpenaiConfig {
        self.azure_openai.get_or_insert_with(Default::default)
    }

    fn openai(&mut self) -> &mut OpenaiConfig {
        self.openai.get_or_insert_with(Default::default)
    }

    fn deepseek(&mut self) -> &mut DeepseekConfig {
        self.deepseek.get_or_insert_with(Default::default)
    }
}

fn mask(key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if key.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("****{tail}")
    }
}
