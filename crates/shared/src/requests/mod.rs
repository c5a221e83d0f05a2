//! Request bodies, one type per `/api/*` endpoint

mod info;
mod interact;
mod script;
mod settings;

pub use info::{InfoRequest, InfoTopic};
pub use interact::{ActionKind, InteractRequest, Navigation};
pub use script::{
    CharacterConfig, ExampleScript, LoadScriptRequest, SaveScriptRequest, SceneConfig,
    LOAD_SCRIPT_PREFIX,
};
pub use settings::{
    AzureOpenaiConfig, DeepseekConfig, ModelConfig, ModelProvider, OpenaiConfig, PromptTemplates,
    PROMPT_KEYS,
};
