use crate::domain::tts::{TtsServicePreference, TtsVendor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response for GET/PUT /api/me/tts-settings. Keys are never echoed back.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TtsSettingsResponse {
    pub preferred_tts_service: TtsServicePreference,
    pub configured_services: Vec<TtsVendor>,
}

/// Request for PUT /api/me/tts-settings.
/// An empty string in `api_keys` removes that vendor's key.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTtsSettingsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_tts_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_keys: Option<BTreeMap<String, String>>,
}
