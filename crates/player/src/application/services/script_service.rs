//! Script Service - Loading, saving and authoring scripts

use std::path::Path;

use theatre_domain::{GameState, Script};
use theatre_shared::{
    ExampleScript, LoadScriptRequest, SaveReceipt, SavedScript, LOAD_SCRIPT_PREFIX,
};

use crate::application::api::TheatreApi;
use crate::application::editors::ScriptDraft;
use crate::application::{ParseResponse, ServiceError};
use crate::state::{ApplyOutcome, GameStore};

/// A state the service installed, with what the install did.
#[derive(Debug, Clone, PartialEq)]
pub struct Installed {
    pub state: GameState,
    pub outcome: ApplyOutcome,
}

#[derive(Clone)]
pub struct ScriptService {
    api: TheatreApi,
    store: GameStore,
}

impl ScriptService {
    pub fn new(api: TheatreApi, store: GameStore) -> Self {
        Self { api, store }
    }

    /// Fetch whatever the backend has loaded. `None` means nothing is set up
    /// yet and the welcome view should show.
    pub async fn init_game(&self) -> Result<Option<Installed>, ServiceError> {
        let ticket = self.store.begin_request();
        let state = self.api.init_game().await.parse()?;
        if !state.is_playable() {
            tracing::info!("Backend has no script loaded");
            return Ok(None);
        }
        let outcome = self.store.apply(ticket, state.clone()).await;
        Ok(Some(Installed { state, outcome }))
    }

    /// Start authoring from a blank script. Nothing is sent.
    pub async fn create_new_script(&self) -> Installed {
        let state = GameState::new_script();
        let outcome = self.store.replace(state.clone()).await;
        Installed { state, outcome }
    }

    /// Upload the draft, then install a fresh local state for it. The prior
    /// state is untouched if validation or the request fails.
    pub async fn save_draft(&self, draft: &ScriptDraft) -> Result<(Script, ApplyOutcome), ServiceError> {
        let request = draft.to_save_request();
        request.validate()?;

        self.api.save_script_config(&request).await.parse()?;

        let state = draft.to_game_state();
        let script = state.script.clone();
        let outcome = self.store.replace(state).await;
        tracing::info!(
            script_id = %script.id,
            scenes = script.scenes.len(),
            characters = request.characters.len(),
            "Script saved"
        );
        Ok((script, outcome))
    }

    /// Load by bundled example name (`hp`, `station`, `romeo`), by saved id, or
    /// by a full `load-script-*` name.
    pub async fn load_script(&self, name: &str) -> Result<Installed, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("Script name is required"));
        }
        if name.starts_with(LOAD_SCRIPT_PREFIX) {
            self.load(LoadScriptRequest::new(name)).await
        } else if let Ok(example) = name.parse::<ExampleScript>() {
            self.load_example(example).await
        } else {
            self.load_saved(name).await
        }
    }

    pub async fn load_example(&self, example: ExampleScript) -> Result<Installed, ServiceError> {
        self.load(LoadScriptRequest::example(example)).await
    }

    pub async fn load_saved(&self, id: &str) -> Result<Installed, ServiceError> {
        self.load(LoadScriptRequest::saved(id)).await
    }

    async fn load(&self, request: LoadScriptRequest) -> Result<Installed, ServiceError> {
        let ticket = self.store.begin_request();
        tracing::info!(script_name = %request.script_name, "Loading script");
        let state = self.api.load_script(&request).await.parse()?;
        let outcome = self.store.apply(ticket, state.clone()).await;
        Ok(Installed { state, outcome })
    }

    /// Persist the running session on the backend.
    pub async fn save_session(&self) -> Result<SaveReceipt, ServiceError> {
        let receipt = self.api.save_script().await.parse()?;
        tracing::info!(save_id = %receipt.save_id, "Session saved");
        Ok(receipt)
    }

    pub async fn list_saved_scripts(&self) -> Result<Vec<SavedScript>, ServiceError> {
        Ok(self.api.get_saved_scripts().await.parse()?.scripts)
    }

    /// Script files are read but not parsed; importing is not available yet.
    pub async fn import_script_file(&self, path: &Path) -> Result<String, ServiceError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ServiceError::validation(format!("Cannot read {}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "Script import requested");
        Ok("Script import is under development".to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::editors::{CharacterField, SceneField};
    use crate::infrastructure::testing::fixtures::{sample_game_state, sample_game_state_json};
    use crate::ports::outbound::{ApiError, MockRawApiPort};
    use serde_json::json;

    fn service(raw: MockRawApiPort) -> ScriptService {
        ScriptService::new(TheatreApi::new(Arc::new(raw)), GameStore::new())
    }

    fn draft() -> ScriptDraft {
        let mut draft = ScriptDraft::new();
        draft.script_name = "heist".into();
        let c = draft.add_character();
        draft.update_character(c, CharacterField::Id, "Ocean").unwrap();
        let s = draft.add_scene();
        draft.update_scene(s, SceneField::Name("Casino".into())).unwrap();
        draft
    }

    #[tokio::test]
    async fn init_game_without_setup_shows_welcome() {
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json()
            .withf(|path| path == "/api/data")
            .returning(|_| Ok(json!({"id": "", "scene_cnt": 0})));

        let svc = service(raw);
        assert_eq!(svc.init_game().await.unwrap(), None);
        assert!(svc.store.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn init_game_installs_playable_state() {
        let mut raw = MockRawApiPort::new();
        raw.expect_get_json().returning(|_| Ok(sample_game_state_json()));

        let svc = service(raw);
        let installed = svc.init_game().await.unwrap().unwrap();
        assert!(installed.outcome.is_applied());
        assert_eq!(svc.store.snapshot().await.unwrap().id, "hp");
    }

    #[tokio::test]
    async fn load_resolves_example_and_saved_names() {
        let mut raw = MockRawApiPort::new();
        raw.expect_post_json()
            .withf(|path, body| path == "/api/load" && body["script_name"] == "load-script-romeo")
            .times(1)
            .returning(|_, _| Ok(sample_game_state_json()));
        raw.expect_post_json()
            .withf(|_, body| body["script_name"] == "load-script-20250301-abc")
            .times(1)
            .returning(|_, _| Ok(sample_game_state_json()));

        let svc = service(raw);
        svc.load_script("romeo").await.unwrap();
        svc.load_script("20250301-abc").await.unwrap();
    }

    #[tokio::test]
    async fn save_draft_replaces_state_at_scene_one() {
        let mut raw = MockRawApiPort::new();
        raw.expect_post_json()
            .withf(|path, body| {
                path == "/api/data"
                    && body["scenes"]["scene1"]["sceneName"] == "Casino"
                    && body["characters_initial_memories"]["Ocean"] == ""
            })
            .returning(|_, _| Ok(serde_json::Value::Null));

        let svc = service(raw);
        svc.store.replace(sample_game_state()).await;
        let (script, outcome) = svc.save_draft(&draft()).await.unwrap();
        assert_eq!(script.id, "heist");
        assert!(outcome.script_changed());

        let state = svc.store.snapshot().await.unwrap();
        assert_eq!(state.scene_cnt, 1);
        assert_eq!(state.current_scene().unwrap().name, "Casino");
    }

    #[tokio::test]
    async fn failed_save_keeps_prior_state() {
        let mut raw = MockRawApiPort::new();
        raw.expect_post_json()
            .returning(|_, _| Err(ApiError::http_status(500, "boom")));

        let svc = service(raw);
        svc.store.replace(sample_game_state()).await;
        assert!(svc.save_draft(&draft()).await.is_err());
        assert_eq!(svc.store.snapshot().await.unwrap().id, "hp");
    }

    #[tokio::test]
    async fn invalid_draft_is_never_sent() {
        let raw = MockRawApiPort::new();
        let svc = service(raw);
        let mut draft = draft();
        let c = draft.add_character();
        draft.update_character(c, CharacterField::Id, "Ocean").unwrap();

        let err = svc.save_draft(&draft).await.unwrap_err();
        assert!(err.is_local());
    }

    #[tokio::test]
    async fn import_reads_file_but_reports_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.yaml");
        std::fs::write(&path, "id: heist\n").unwrap();

        let svc = service(MockRawApiPort::new());
        let text = svc.import_script_file(&path).await.unwrap();
        assert!(text.contains("under development"));
        assert!(svc.import_script_file(&dir.path().join("missing.yaml")).await.is_err());
    }
}
