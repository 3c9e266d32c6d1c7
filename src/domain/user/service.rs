use super::{
    dto::{TtsSettingsResponse, UpdateTtsSettingsRequest},
    error::UserServiceError,
    User,
};
use crate::domain::tts::{TtsServiceApi, TtsServicePreference, TtsVendor};
use crate::infrastructure::repositories::UserRepository;
use std::sync::Arc;
use uuid::Uuid;

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    tts_service: Arc<dyn TtsServiceApi>,
    default_service: TtsServicePreference,
}

impl UserService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        tts_service: Arc<dyn TtsServiceApi>,
        default_service: TtsServicePreference,
    ) -> Self {
        Self {
            user_repo,
            tts_service,
            default_service,
        }
    }

    /// Preferred service (configured default applied) and vendors with a user key
    pub async fn get_tts_settings(
        &self,
        user_id: Uuid,
    ) -> Result<TtsSettingsResponse, UserServiceError> {
        let user = self.find_user(user_id).await?;
        Ok(self.build_settings_response(&user))
    }

    pub async fn update_tts_settings(
        &self,
        user_id: Uuid,
        request: UpdateTtsSettingsRequest,
    ) -> Result<TtsSettingsResponse, UserServiceError> {
        let mut user = self.find_user(user_id).await?;

        // Validate everything before touching the record
        let preferred = request
            .preferred_tts_service
            .as_deref()
            .map(str::parse::<TtsServicePreference>)
            .transpose()
            .map_err(UserServiceError::Invalid)?;

        let mut keys = Vec::new();
        for (service, key) in request.api_keys.unwrap_or_default() {
            let vendor = service
                .parse::<TtsVendor>()
                .map_err(UserServiceError::Invalid)?;
            keys.push((vendor, key));
        }

        if let Some(preferred) = preferred {
            user.preferred_tts_service = Some(preferred);
        }
        let changed_vendors: Vec<TtsVendor> = keys.iter().map(|(vendor, _)| *vendor).collect();
        for (vendor, key) in keys {
            user.set_api_key(vendor, Some(key));
        }

        let updated = self.user_repo.update_tts_settings(&user).await?;

        tracing::info!(
            user_id = %user_id,
            preferred_tts_service = ?updated.preferred_tts_service,
            changed_vendors = ?changed_vendors,
            "TTS settings updated"
        );

        self.tts_service.clear_user_instances(user_id);

        Ok(self.build_settings_response(&updated))
    }

    async fn find_user(&self, user_id: Uuid) -> Result<User, UserServiceError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(UserServiceError::NotFound)
    }

    fn build_settings_response(&self, user: &User) -> TtsSettingsResponse {
        TtsSettingsResponse {
            preferred_tts_service: user.preferred_tts_service.unwrap_or(self.default_service),
            configured_services: user.configured_vendors(),
        }
    }
}
