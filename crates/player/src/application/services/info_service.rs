//! Info Service - Read-only side panels over `/api/info`
//!
//! None of these calls touch the game store. Panels that want to stay in step
//! with the game keep their data in a [`PanelCache`] keyed by the store version.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use theatre_shared::{CharacterInfo, ScriptInfo, SystemFeedback, WorldRecords};

use crate::application::api::TheatreApi;
use crate::application::{ParseResponse, ServiceError};

/// Entry the backend appends to the character list.
const NULL_CHARACTER: &str = "null";

/// Last fetched value of a panel, tagged with the store version it was
/// fetched at.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelCache<T> {
    entry: Option<(T, u64)>,
}

impl<T> Default for PanelCache<T> {
    fn default() -> Self {
        Self { entry: None }
    }
}

impl<T> PanelCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, value: T, version: u64) {
        self.entry = Some((value, version));
    }

    pub fn get(&self) -> Option<&T> {
        self.entry.as_ref().map(|(value, _)| value)
    }

    /// True when empty or fetched before the state at `version` was installed.
    pub fn is_stale(&self, version: u64) -> bool {
        match &self.entry {
            Some((_, fetched_at)) => *fetched_at != version,
            None => true,
        }
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[derive(Clone)]
pub struct InfoService {
    api: TheatreApi,
}

impl InfoService {
    pub fn new(api: TheatreApi) -> Self {
        Self { api }
    }

    /// Characters that can be addressed, without blanks or the `"null"` filler.
    pub async fn available_characters(&self) -> Result<Vec<String>, ServiceError> {
        let list = self.api.get_characters().await.parse()?;
        Ok(list
            .characters
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty() && name != NULL_CHARACTER)
            .collect())
    }

    pub async fn world_records(&self) -> Result<WorldRecords, ServiceError> {
        self.api.get_world_records().await.parse()
    }

    pub async fn system_feedbacks(&self) -> Result<SystemFeedback, ServiceError> {
        self.api.get_system_feedbacks().await.parse()
    }

    pub async fn script_info(&self) -> Result<ScriptInfo, ServiceError> {
        self.api.get_script_info().await.parse()
    }

    pub async fn character_info(&self, name: &str) -> Result<CharacterInfo, ServiceError> {
        if name.trim().is_empty() {
            return Err(ServiceError::validation("Character name is required"));
        }
        self.api.get_character_info(name.trim()).await.parse()
    }

    pub async fn export_records(&self) -> Result<Vec<u8>, ServiceError> {
        self.api.export_records().await.parse()
    }

    /// Download the records and write them to `records_{today}.json` in `dir`.
    pub async fn export_records_to(&self, dir: &Path, today: NaiveDate) -> Result<PathBuf, ServiceError> {
        let bytes = self.export_records().await?;
        let path = dir.join(export_file_name(today));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| ServiceError::validation(format!("Cannot write {}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "Records exported");
        Ok(path)
    }
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("records_{}.json", today.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ports::outbound::MockRawApiPort;
    use serde_json::json;

    fn service(raw: MockRawApiPort) -> InfoService {
        InfoService::new(TheatreApi::new(Arc::new(raw)))
    }

    #[tokio::test]
    async fn available_characters_drops_null_and_blanks() {
        let mut raw = MockRawApiPort::new();
        raw.expect_post_json()
            .withf(|path, body| path == "/api/info" && *body == json!({"help": "characters"}))
            .returning(|_, _| Ok(json!({"characters": ["Harry", " ", "", "Ron", "null"]})));

        let names = service(raw).available_characters().await.unwrap();
        assert_eq!(names, vec!["Harry", "Ron"]);
    }

    #[tokio::test]
    async fn no_setup_is_an_api_error() {
        let mut raw = MockRawApiPort::new();
        raw.expect_post_json()
            .returning(|_, _| Ok(json!({"error": "No valid setup! "})));

        let err = service(raw).world_records().await.unwrap_err();
        assert_eq!(err.to_string(), "No valid setup! ");
    }

    #[tokio::test]
    async fn character_info_posts_role() {
        let mut raw = MockRawApiPort::new();
        raw.expect_post_json()
            .withf(|_, body| *body == json!({"role": "Ron"}))
            .returning(|_, _| Ok(json!({"profile": "Loyal friend", "memory": ["Met Harry"]})));

        let info = service(raw).character_info(" Ron ").await.unwrap();
        assert_eq!(info.profile, "Loyal friend");
        assert_eq!(info.memory, vec!["Met Harry"]);
    }

    #[tokio::test]
    async fn export_writes_dated_file() {
        let mut raw = MockRawApiPort::new();
        raw.expect_post_for_bytes()
            .withf(|_, body| *body == json!({"help": "export_records"}))
            .returning(|_, _| Ok(b"{\"scene1\": []}".to_vec()));

        let dir = tempfile::tempdir().unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let path = service(raw).export_records_to(dir.path(), today).await.unwrap();

        assert_eq!(path.file_name().unwrap(), "records_2025-03-01.json");
        assert_eq!(std::fs::read(&path).unwrap(), b"{\"scene1\": []}");
    }

    #[test]
    fn panel_cache_tracks_store_version() {
        let mut cache = PanelCache::new();
        assert!(cache.is_stale(0));
        cache.store(vec!["Harry".to_string()], 3);
        assert!(!cache.is_stale(3));
        assert!(cache.is_stale(4));
        assert_eq!(cache.get().map(Vec::len), Some(1));
        cache.invalidate();
        assert!(cache.get().is_none());
    }
}
