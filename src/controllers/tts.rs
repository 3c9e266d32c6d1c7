use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::tts::{
        service::validate_request, GenerationOptions, GenerationResult, TtsServiceApi, TtsVendor,
    },
    error::{AppError, AppResult},
    infrastructure::auth::AuthUser,
};

/// Request for POST /api/tts/generate
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub text: String,
    #[serde(flatten)]
    pub options: GenerationOptions,
}

/// Request for POST /api/tts/test-key
#[derive(Debug, Serialize, Deserialize)]
pub struct TestKeyRequest {
    pub service: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TestKeyResponse {
    pub service: TtsVendor,
    pub valid: bool,
}

pub struct TtsController {
    tts_service: Arc<dyn TtsServiceApi>,
}

impl TtsController {
    pub fn new(tts_service: Arc<dyn TtsServiceApi>) -> Self {
        Self { tts_service }
    }

    /// POST /api/tts/generate - Speak a line in a character's voice.
    /// A vendor outage yields `audioUrl: ""`, never an error status.
    pub async fn generate(
        State(controller): State<Arc<TtsController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<GenerateRequest>,
    ) -> AppResult<Json<GenerationResult>> {
        validate_request(&request.text, &request.options)?;

        let result = controller
            .tts_service
            .generate(&request.text, auth_user.user_id, &request.options)
            .await;

        Ok(Json(result))
    }

    /// POST /api/tts/test-key - Check the caller's stored key for one vendor
    pub async fn test_key(
        State(controller): State<Arc<TtsController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<TestKeyRequest>,
    ) -> AppResult<Json<TestKeyResponse>> {
        let vendor = request
            .service
            .parse::<TtsVendor>()
            .map_err(AppError::BadRequest)?;

        let valid = controller
            .tts_service
            .test_user_api_key(auth_user.user_id, vendor)
            .await;

        Ok(Json(TestKeyResponse {
            service: vendor,
            valid,
        }))
    }
}
