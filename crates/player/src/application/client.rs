//! Client facade
//!
//! `TheatreClient` wires every service around one transport and one clock,
//! and turns each operation's outcome into a [`Notice`] for the front end.
//! Front ends hold a single client and read state through it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use theatre_domain::GameState;
use theatre_shared::{
    ActionKind, CharacterInfo, ModelConfig, PromptTemplates, SaveReceipt, SavedScript, ScriptInfo,
    SystemFeedback, UploadReceipt, WorldRecords,
};
use tokio::sync::Mutex;

use crate::application::api::TheatreApi;
use crate::application::editors::ScriptDraft;
use crate::application::services::{
    AssetService, InfoService, Installed, InteractionOutcome, InteractionService, PanelCache,
    ScriptService, SettingsService,
};
use crate::application::ServiceError;
use crate::config::ClientConfig;
use crate::ports::outbound::{ClockPort, RawApiPort};
use crate::state::{ApplyOutcome, GameStore, InteractionPhase, Notice, NoticeBoard, Transcript};

#[derive(Clone)]
pub struct TheatreClient {
    store: GameStore,
    clock: Arc<dyn ClockPort>,
    interaction: InteractionService,
    scripts: ScriptService,
    info: InfoService,
    settings: SettingsService,
    assets: AssetService,
    notices: Arc<Mutex<NoticeBoard>>,
    characters: Arc<Mutex<PanelCache<Vec<String>>>>,
    export_dir: PathBuf,
}

impl TheatreClient {
    pub fn new(raw: Arc<dyn RawApiPort>, clock: Arc<dyn ClockPort>, config: &ClientConfig) -> Self {
        let api = TheatreApi::new(raw);
        let store = GameStore::new();
        Self {
            interaction: InteractionService::new(
                api.clone(),
                store.clone(),
                Arc::clone(&clock),
                config.player_fallback.clone(),
            ),
            scripts: ScriptService::new(api.clone(), store.clone()),
            info: InfoService::new(api.clone()),
            settings: SettingsService::new(api.clone()),
            assets: AssetService::new(api),
            store,
            clock,
            notices: Arc::new(Mutex::new(NoticeBoard::default())),
            characters: Arc::new(Mutex::new(PanelCache::new())),
            export_dir: config.export_dir.clone(),
        }
    }

    // =========================================================================
    // Read side
    // =========================================================================

    pub async fn state(&self) -> Option<GameState> {
        self.store.snapshot().await
    }

    pub async fn transcript(&self) -> Transcript {
        self.interaction.transcript().await
    }

    pub async fn phase(&self) -> InteractionPhase {
        self.interaction.phase().await
    }

    pub async fn take_notice(&self) -> Option<Notice> {
        self.notices.lock().await.take()
    }

    /// Addressable characters, refetched when the game state moved on.
    pub async fn characters(&self) -> Result<Vec<String>, ServiceError> {
        let version = self.store.version().await;
        {
            let cache = self.characters.lock().await;
            if !cache.is_stale(version) {
                return Ok(cache.get().cloned().unwrap_or_default());
            }
        }
        let names = self.info.available_characters().await;
        let names = self.report(names, |_| None).await?;
        self.characters.lock().await.store(names.clone(), version);
        Ok(names)
    }

    async fn post(&self, notice: Notice) {
        self.notices.lock().await.post(notice);
    }

    /// Post an error notice on failure, or the success text `describe` gives.
    async fn report<T>(
        &self,
        result: Result<T, ServiceError>,
        describe: impl FnOnce(&T) -> Option<String>,
    ) -> Result<T, ServiceError> {
        match &result {
            Ok(value) => {
                if let Some(text) = describe(value) {
                    self.post(Notice::success(text)).await;
                }
            }
            Err(e) => {
                if e.is_local() {
                    tracing::debug!(error = %e, "Operation refused locally");
                } else {
                    tracing::warn!(error = %e, "Operation failed");
                }
                self.post(Notice::error(e.to_string())).await
            }
        }
        result
    }

    /// After a new state lands: drop a stale transcript and refresh the
    /// character list. A failed refresh only logs.
    async fn after_install(&self, outcome: ApplyOutcome) {
        if !outcome.is_applied() {
            return;
        }
        if outcome.script_changed() {
            self.interaction.clear_transcript().await;
        }
        self.refresh_characters().await;
    }

    async fn refresh_characters(&self) {
        let version = self.store.version().await;
        match self.info.available_characters().await {
            Ok(names) => self.characters.lock().await.store(names, version),
            Err(e) => tracing::warn!(error = %e, "Failed to refresh characters"),
        }
    }

    // =========================================================================
    // Play
    // =========================================================================

    pub async fn start(&self) -> Result<Option<GameState>, ServiceError> {
        let result = self.scripts.init_game().await;
        let installed = self.report(result, |_| None).await?;
        match installed {
            Some(Installed { state, outcome }) => {
                self.after_install(outcome).await;
                Ok(Some(state))
            }
            None => {
                self.post(Notice::info("No script loaded. Load an example or create a new script."))
                    .await;
                Ok(None)
            }
        }
    }

    pub async fn send_action(
        &self,
        kind: ActionKind,
        message: &str,
        object: Option<String>,
    ) -> Result<InteractionOutcome, ServiceError> {
        let result = self.interaction.send_action(kind, message, object).await;
        let outcome = self.report(result, |_| None).await?;
        if let InteractionOutcome::Completed {
            state_replaced: true,
            ..
        } = outcome
        {
            self.post(Notice::success("Scene complete")).await;
            self.refresh_characters().await;
        }
        Ok(outcome)
    }

    pub async fn next_scene(&self) -> Result<ApplyOutcome, ServiceError> {
        let result = self.interaction.next_scene().await;
        let outcome = self
            .report(result, |_| Some("Moved to the next scene".to_string()))
            .await?;
        if outcome.is_applied() {
            self.refresh_characters().await;
        }
        Ok(outcome)
    }

    pub async fn back_scene(&self) -> Result<ApplyOutcome, ServiceError> {
        let result = self.interaction.back_scene().await;
        let outcome = self
            .report(result, |_| Some("Moved to the previous scene".to_string()))
            .await?;
        if outcome.is_applied() {
            self.refresh_characters().await;
        }
        Ok(outcome)
    }

    pub async fn withdraw(&self) -> Result<usize, ServiceError> {
        let result = self.interaction.withdraw().await;
        self.report(result, |removed| Some(format!("Withdrew {removed} message(s)")))
            .await
    }

    // =========================================================================
    // Scripts
    // =========================================================================

    pub async fn new_script(&self) -> GameState {
        let Installed { state, outcome } = self.scripts.create_new_script().await;
        self.interaction.clear_transcript().await;
        self.characters.lock().await.invalidate();
        tracing::debug!(applied = outcome.is_applied(), "Blank script installed");
        self.post(Notice::info("New script started")).await;
        state
    }

    pub async fn save_draft(&self, draft: &ScriptDraft) -> Result<GameState, ServiceError> {
        let result = self.scripts.save_draft(draft).await;
        let (script, outcome) = self
            .report(result, |(script, _)| Some(format!("Script \"{}\" saved", script.id)))
            .await?;
        self.after_install(outcome).await;
        tracing::debug!(script_id = %script.id, "Draft installed");
        self.state().await.ok_or(ServiceError::NoGameState)
    }

    pub async fn load_script(&self, name: &str) -> Result<GameState, ServiceError> {
        let result = self.scripts.load_script(name).await;
        let Installed { state, outcome } = self
            .report(result, |installed| {
                Some(format!("Loaded \"{}\"", installed.state.script.id))
            })
            .await?;
        self.after_install(outcome).await;
        Ok(state)
    }

    pub async fn save_session(&self) -> Result<SaveReceipt, ServiceError> {
        let result = self.scripts.save_session().await;
        self.report(result, |receipt| {
            Some(format!("Saved as {}", receipt.save_id))
        })
        .await
    }

    pub async fn saved_scripts(&self) -> Result<Vec<SavedScript>, ServiceError> {
        let result = self.scripts.list_saved_scripts().await;
        self.report(result, |_| None).await
    }

    pub async fn import_script_file(&self, path: &Path) -> Result<(), ServiceError> {
        let result = self.scripts.import_script_file(path).await;
        let text = self.report(result, |_| None).await?;
        self.post(Notice::info(text)).await;
        Ok(())
    }

    // =========================================================================
    // Panels
    // =========================================================================

    pub async fn world_records(&self) -> Result<WorldRecords, ServiceError> {
        let result = self.info.world_records().await;
        self.report(result, |_| None).await
    }

    pub async fn system_feedbacks(&self) -> Result<SystemFeedback, ServiceError> {
        let result = self.info.system_feedbacks().await;
        self.report(result, |_| None).await
    }

    pub async fn script_info(&self) -> Result<ScriptInfo, ServiceError> {
        let result = self.info.script_info().await;
        self.report(result, |_| None).await
    }

    pub async fn character_info(&self, name: &str) -> Result<CharacterInfo, ServiceError> {
        let result = self.info.character_info(name).await;
        self.report(result, |_| None).await
    }

    pub async fn export_records(&self) -> Result<PathBuf, ServiceError> {
        let today = self.clock.now().date_naive();
        let result = self.info.export_records_to(&self.export_dir, today).await;
        self.report(result, |path| Some(format!("Records exported to {}", path.display())))
            .await
    }

    // =========================================================================
    // Settings and assets
    // =========================================================================

    pub async fn prompts(&self) -> Result<PromptTemplates, ServiceError> {
        let result = self.settings.prompts().await;
        self.report(result, |_| None).await
    }

    pub async fn save_prompts(&self, prompts: &PromptTemplates) -> Result<(), ServiceError> {
        let result = self.settings.save_prompts(prompts).await;
        self.report(result, |_| Some("Prompt templates saved".to_string()))
            .await
    }

    pub async fn model_config(&self) -> Result<ModelConfig, ServiceError> {
        let result = self.settings.model_config().await;
        self.report(result, |_| None).await
    }

    pub async fn save_model_config(&self, config: &ModelConfig) -> Result<(), ServiceError> {
        let result = self.settings.save_model_config(config).await;
        self.report(result, |_| Some("Model configuration saved".to_string()))
            .await
    }

    /// Replace one prompt template with the contents of `path`.
    pub async fn set_prompt_from_file(&self, key: &str, path: &Path) -> Result<(), ServiceError> {
        let template = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) => {
                let err = ServiceError::validation(format!("Cannot read {}: {e}", path.display()));
                return self.report(Err(err), |_: &()| None).await;
            }
        };
        let mut prompts = self.prompts().await?;
        prompts.set(key, template);
        self.save_prompts(&prompts).await
    }

    /// Fetch the model configuration, change one field and save it back.
    pub async fn set_model_field(&self, field: &str, value: &str) -> Result<(), ServiceError> {
        let mut config = self.model_config().await?;
        if let Err(e) = config.set_field(field, value) {
            return self.report(Err(e.into()), |_: &()| None).await;
        }
        self.save_model_config(&config).await
    }

    /// Upload an avatar read from `path`.
    pub async fn upload_avatar(&self, character: &str, path: &Path) -> Result<UploadReceipt, ServiceError> {
        let result = match tokio::fs::read(path).await {
            Ok(bytes) => {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "avatar".to_string());
                self.assets.upload_avatar(character, &file_name, bytes).await
            }
            Err(e) => Err(ServiceError::validation(format!(
                "Cannot read {}: {e}",
                path.display()
            ))),
        };
        self.report(result, |_| Some(format!("Avatar for {character} uploaded")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::{fixed_now, sample_game_state_json_for};
    use crate::infrastructure::testing::ScriptedApi;
    use crate::infrastructure::FixedClock;
    use crate::state::NoticeKind;
    use serde_json::json;

    fn client(api: &ScriptedApi) -> TheatreClient {
        TheatreClient::new(
            Arc::new(api.clone()),
            Arc::new(FixedClock(fixed_now())),
            &ClientConfig::default(),
        )
    }

    #[tokio::test]
    async fn start_without_setup_posts_info() {
        let api = ScriptedApi::new();
        api.respond("/api/data", json!({"id": ""}));

        let client = client(&api);
        assert_eq!(client.start().await.unwrap(), None);
        assert_eq!(client.take_notice().await.unwrap().kind, NoticeKind::Info);
        assert!(api.calls_to("/api/info").is_empty());
    }

    #[tokio::test]
    async fn load_refreshes_characters_once() {
        let api = ScriptedApi::new();
        api.respond("/api/load", sample_game_state_json_for("hp", 1))
            .respond("/api/info", json!({"characters": ["Harry", "Ron", "null"]}));

        let client = client(&api);
        client.load_script("hp").await.unwrap();
        assert_eq!(client.characters().await.unwrap(), vec!["Harry", "Ron"]);
        assert_eq!(api.calls_to("/api/info").len(), 1);

        let notice = client.take_notice().await.unwrap();
        assert_eq!(notice.to_string(), "[ok] Loaded \"hp\"");
    }

    #[tokio::test]
    async fn failures_post_error_notices() {
        let api = ScriptedApi::new();
        let client = client(&api);
        assert!(client.next_scene().await.is_err());
        let notice = client.take_notice().await.unwrap();
        assert!(notice.is_error());
        assert!(notice.text.contains("no scripted response"));
    }

    #[tokio::test]
    async fn export_writes_into_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            export_dir: dir.path().to_path_buf(),
            ..ClientConfig::default()
        };
        let api = ScriptedApi::new();
        api.respond_bytes("/api/info", br#"{"records":[]}"#.to_vec());

        let client = TheatreClient::new(
            Arc::new(api.clone()),
            Arc::new(FixedClock(fixed_now())),
            &config,
        );
        let path = client.export_records().await.unwrap();
        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(std::fs::read(&path).unwrap(), br#"{"records":[]}"#);
        assert!(client.take_notice().await.unwrap().text.starts_with("Records exported to"));
    }
}
