//! Asset Service - Character avatar uploads
//!
//! Uploads are independent of each other and of the game state.

use theatre_shared::UploadReceipt;

use crate::application::api::TheatreApi;
use crate::application::{ParseResponse, ServiceError};

#[derive(Clone)]
pub struct AssetService {
    api: TheatreApi,
}

impl AssetService {
    pub fn new(api: TheatreApi) -> Self {
        Self { api }
    }

    pub async fn upload_avatar(
        &self,
        character: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, ServiceError> {
        if character.trim().is_empty() {
            return Err(ServiceError::validation("Character name is required"));
        }
        if bytes.is_empty() {
            return Err(ServiceError::validation("No file selected"));
        }
        let receipt = self
            .api
            .upload_character_avatar(character.trim(), file_name, bytes)
            .await
            .parse()?;
        tracing::info!(character, path = ?receipt.path, "Avatar uploaded");
        Ok(receipt)
    }
}
