//! Open Theatre Protocol - Wire types for the theatre backend's `/api/*` endpoints
//!
//! One request type and one response type per endpoint, with the backend's
//! field names pinned via serde. Outbound payloads that can be malformed by
//! the editors carry a `validate()` that runs before anything is sent.
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - serde, serde_json, thiserror and the domain crate
//! 2. **No I/O** - pure data types and serialization
//! 3. **Tolerant reads** - missing or `null` fields fall back to defaults

pub mod error;
pub mod requests;
pub mod responses;

pub use error::ProtocolError;

pub use requests::{
    ActionKind, AzureOpenaiConfig, CharacterConfig, DeepseekConfig, ExampleScript, InfoRequest,
    InfoTopic, InteractRequest, LoadScriptRequest, ModelConfig, ModelProvider, Navigation,
    OpenaiConfig, PromptTemplates, SaveScriptRequest, SceneConfig, LOAD_SCRIPT_PREFIX,
    PROMPT_KEYS,
};

pub use responses::{
    ActionEntry, Addressees, CharacterInfo, CharacterList, ErrorBody, InteractResponse,
    NavigationResponse, RetrievedChunk, SaveReceipt, SavedScript, SavedScripts, ScriptInfo,
    SystemFeedback, UploadReceipt, WorldRecords,
};

/// Every endpoint path the client talks to.
pub mod paths {
    pub const DATA: &str = "/api/data";
    pub const INTERACT: &str = "/api/interact";
    pub const INFO: &str = "/api/info";
    pub const LOAD: &str = "/api/load";
    pub const SAVE: &str = "/api/save";
    pub const SAVED_SCRIPTS: &str = "/api/saved-scripts";
    pub const PROMPT: &str = "/api/prompt";
    pub const MODEL_CONFIG: &str = "/api/model-config";
    pub const UPLOAD: &str = "/api/upload";
}
