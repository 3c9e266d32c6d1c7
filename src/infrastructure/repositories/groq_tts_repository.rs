use super::tts_repository::{ProviderError, SynthesisParams, TtsRepository};
use crate::domain::tts::{
    character::{compute_speed, is_robotic, VoicePicker, VoiceTable},
    text::{robotic_cadence, sanitize_for_speech},
    GenerationResult, TtsVendor,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com";
const MODEL: &str = "playai-tts";

const VOICES: VoiceTable = VoiceTable {
    characters: &[
        ("razor", "Arista-PlayAI"),
        ("venom", "Thunder-PlayAI"),
        ("silk", "Calum-PlayAI"),
        ("cypher", "Fritz-PlayAI"),
    ],
    male: &[
        "Fritz-PlayAI",
        "Atlas-PlayAI",
        "Basil-PlayAI",
        "Briggs-PlayAI",
        "Mason-PlayAI",
        "Mitch-PlayAI",
        "Thunder-PlayAI",
    ],
    female: &[
        "Arista-PlayAI",
        "Celeste-PlayAI",
        "Cheyenne-PlayAI",
        "Deedee-PlayAI",
        "Gail-PlayAI",
        "Indigo-PlayAI",
    ],
    default_voice: "Fritz-PlayAI",
};

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
    speed: f32,
}

/// Groq (PlayAI voices) implementation of TTS repository.
/// Speaks the OpenAI-compatible `/audio/speech` dialect.
pub struct GroqTtsRepository {
    client: Client,
    api_key: String,
    base_url: String,
    picker: Arc<dyn VoicePicker>,
}

impl GroqTtsRepository {
    pub fn new(
        api_key: &str,
        base_url: &str,
        timeout: Duration,
        picker: Arc<dyn VoicePicker>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::from_reqwest(TtsVendor::Groq, e))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            picker,
        })
    }

    fn speech_url(&self) -> String {
        format!("{}/openai/v1/audio/speech", self.base_url)
    }

    fn models_url(&self) -> String {
        format!("{}/openai/v1/models", self.base_url)
    }

    /// The robotic character keeps its punctuation as explicit pauses
    fn prepare_text(text: &str, character_id: &str) -> String {
        if is_robotic(character_id) {
            robotic_cadence(text)
        } else {
            sanitize_for_speech(text)
        }
    }
}

#[async_trait]
impl TtsRepository for GroqTtsRepository {
    fn vendor(&self) -> TtsVendor {
        TtsVendor::Groq
    }

    async fn synthesize(
        &self,
        text: &str,
        character_id: &str,
        params: &SynthesisParams,
    ) -> Result<GenerationResult, ProviderError> {
        let start_time = std::time::Instant::now();

        let prepared = Self::prepare_text(text, character_id);
        if prepared.is_empty() {
            return Err(ProviderError::EmptyText);
        }

        let voice = VOICES.select(character_id, params.gender, self.picker.as_ref());
        let request = SpeechRequest {
            model: MODEL,
            input: &prepared,
            voice,
            response_format: "wav",
            speed: compute_speed(character_id, params.voice_style, params.speed_multiplier),
        };

        tracing::debug!(
            voice = voice,
            model = MODEL,
            speed = request.speed,
            robotic = is_robotic(character_id),
            text_length = prepared.len(),
            "Calling Groq speech API"
        );

        let response = self
            .client
            .post(self.speech_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(TtsVendor::Groq, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                vendor: TtsVendor::Groq,
                status: status.as_u16(),
                body,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| ProviderError::InvalidResponse {
                vendor: TtsVendor::Groq,
                message: format!("Failed to read audio: {}", e),
            })?;
        if audio.is_empty() {
            return Err(ProviderError::InvalidResponse {
                vendor: TtsVendor::Groq,
                message: "empty audio body".to_string(),
            });
        }

        tracing::info!(
            provider = "groq",
            voice = voice,
            character_id = character_id,
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio.len(),
            "TTS synthesis completed"
        );

        Ok(GenerationResult::from_audio(&audio, "audio/wav", text))
    }

    async fn test_credential(&self) -> bool {
        match self
            .client
            .get(self.models_url())
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Groq credential test failed");
                false
            }
        }
    }
}
