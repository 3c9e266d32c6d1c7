use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::domain::user::{TtsSettingsResponse, UpdateTtsSettingsRequest};
use crate::{domain::user::UserService, error::AppResult, infrastructure::auth::AuthUser};

pub struct UserController {
    user_service: Arc<UserService>,
}

impl UserController {
    pub fn new(user_service: Arc<UserService>) -> Self {
        Self { user_service }
    }

    /// GET /api/me/tts-settings
    pub async fn get_tts_settings(
        State(controller): State<Arc<UserController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<TtsSettingsResponse>> {
        let response = controller
            .user_service
            .get_tts_settings(auth_user.user_id)
            .await?;
        Ok(Json(response))
    }

    /// PUT /api/me/tts-settings
    pub async fn update_tts_settings(
        State(controller): State<Arc<UserController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<UpdateTtsSettingsRequest>,
    ) -> AppResult<Json<TtsSettingsResponse>> {
        let response = controller
            .user_service
            .update_tts_settings(auth_user.user_id, request)
            .await?;
        Ok(Json(response))
    }
}
