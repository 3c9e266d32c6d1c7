use super::tts_repository::{ProviderError, SynthesisParams, TtsRepository};
use crate::domain::tts::{
    character::{compute_speed, VoicePicker, VoiceTable},
    text::{sanitize_for_speech, split_into_batches},
    GenerationResult, TtsVendor,
};
use async_openai::{
    config::OpenAIConfig,
    types::{CreateSpeechRequest, SpeechModel, Voice},
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::sync::Arc;
use std::time::Duration;

/// OpenAI has a limit of 4096 characters per request
const MAX_BATCH_SIZE: usize = 4096;

const VOICES: VoiceTable = VoiceTable {
    characters: &[
        ("razor", "nova"),
        ("venom", "onyx"),
        ("silk", "echo"),
        ("cypher", "alloy"),
    ],
    male: &["onyx", "echo", "fable"],
    female: &["nova", "shimmer", "alloy"],
    default_voice: "alloy",
};

/// OpenAI TTS implementation of TTS repository
pub struct OpenAiTtsRepository {
    client: Client<OpenAIConfig>,
    model: String,
    picker: Arc<dyn VoicePicker>,
}

impl OpenAiTtsRepository {
    /// `hd` selects `tts-1-hd` over the faster `tts-1`
    pub fn new(
        api_key: &str,
        api_base: Option<&str>,
        hd: bool,
        picker: Arc<dyn VoicePicker>,
    ) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }

        let model = if hd { "tts-1-hd" } else { "tts-1" };

        // A 429 is a failed attempt, the fallback chain moves on
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Self {
            client: Client::with_config(config).with_backoff(no_retry),
            model: model.to_string(),
            picker,
        }
    }

    fn parse_voice(voice: &str) -> Voice {
        match voice {
            "alloy" => Voice::Alloy,
            "echo" => Voice::Echo,
            "fable" => Voice::Fable,
            "onyx" => Voice::Onyx,
            "nova" => Voice::Nova,
            "shimmer" => Voice::Shimmer,
            _ => Voice::Alloy,
        }
    }

    /// Call OpenAI TTS API to synthesize a single text batch
    async fn call_openai(&self, text: &str, voice: &str, speed: f32) -> Result<Vec<u8>, ProviderError> {
        tracing::debug!(
            model = %self.model,
            voice = voice,
            speed = speed,
            text_length = text.len(),
            "Calling OpenAI TTS API"
        );

        let model = match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        };

        let request = CreateSpeechRequest {
            model,
            input: text.to_string(),
            voice: Self::parse_voice(voice),
            response_format: None, // Defaults to MP3
            speed: Some(speed),
        };

        let response = self
            .client
            .audio()
            .speech(request)
            .await
            .map_err(|e| ProviderError::Sdk {
                vendor: TtsVendor::OpenAi,
                message: e.to_string(),
            })?;

        Ok(response.bytes.to_vec())
    }
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    fn vendor(&self) -> TtsVendor {
        TtsVendor::OpenAi
    }

    async fn synthesize(
        &self,
        text: &str,
        character_id: &str,
        params: &SynthesisParams,
    ) -> Result<GenerationResult, ProviderError> {
        let start_time = std::time::Instant::now();

        let cleaned = sanitize_for_speech(text);
        if cleaned.is_empty() {
            return Err(ProviderError::EmptyText);
        }

        let voice = VOICES.select(character_id, params.gender, self.picker.as_ref());
        let speed = compute_speed(character_id, params.voice_style, params.speed_multiplier);

        let batches = split_into_batches(&cleaned, MAX_BATCH_SIZE);
        let mut audio = Vec::new();
        for batch in &batches {
            audio.extend(self.call_openai(batch, voice, speed).await?);
        }

        if audio.is_empty() {
            return Err(ProviderError::InvalidResponse {
                vendor: TtsVendor::OpenAi,
                message: "empty audio body".to_string(),
            });
        }

        tracing::info!(
            provider = "openai",
            model = %self.model,
            voice = voice,
            character_id = character_id,
            latency_ms = start_time.elapsed().as_millis(),
            batch_count = batches.len(),
            audio_size_bytes = audio.len(),
            "TTS synthesis completed"
        );

        Ok(GenerationResult::from_audio(&audio, "audio/mpeg", text))
    }

    async fn test_credential(&self) -> bool {
        match self.client.models().list().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "OpenAI credential test failed");
                false
            }
        }
    }
}
