use super::tts_repository::{ProviderError, SynthesisParams, TtsRepository};
use crate::domain::tts::{
    character::{compute_speed, VoicePicker, VoiceTable},
    text::sanitize_for_speech,
    GenerationResult, TtsVendor, VoiceStyle,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
const MODEL_ID: &str = "eleven_multilingual_v2";

/// ElevenLabs only accepts speaking rates in this range
const MIN_SPEED: f32 = 0.7;
const MAX_SPEED: f32 = 1.2;

const VOICES: VoiceTable = VoiceTable {
    characters: &[
        ("razor", "AZnzlk1XvdvUeBnXmlld"),
        ("venom", "VR6AewLTigWG4xSOukaG"),
        ("silk", "ErXwobaYiN019PkySvjV"),
        ("cypher", "yoZ06aMxZJJ28mfd3POQ"),
    ],
    male: &[
        "pNInz6obpgDQGcFmaJgB",
        "TxGEqnHWrfWFTfGW9XjX",
        "ErXwobaYiN019PkySvjV",
        "VR6AewLTigWG4xSOukaG",
    ],
    female: &[
        "21m00Tcm4TlvDq8ikWAM",
        "AZnzlk1XvdvUeBnXmlld",
        "EXAVITQu4vr4xnSDxMaL",
    ],
    default_voice: "pNInz6obpgDQGcFmaJgB",
};

#[derive(Debug, Serialize, PartialEq)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
    speed: f32,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

impl VoiceSettings {
    /// Aggressive delivery trades stability for expressiveness
    fn for_style(style: VoiceStyle, speed: f32) -> Self {
        let (stability, style_exaggeration) = match style {
            VoiceStyle::Aggressive => (0.3, 0.6),
            VoiceStyle::Confident => (0.5, 0.35),
            VoiceStyle::Smooth => (0.7, 0.2),
        };

        Self {
            stability,
            similarity_boost: 0.75,
            style: style_exaggeration,
            use_speaker_boost: true,
            speed: speed.clamp(MIN_SPEED, MAX_SPEED),
        }
    }
}

/// ElevenLabs implementation of TTS repository
pub struct ElevenLabsTtsRepository {
    client: Client,
    api_key: String,
    base_url: String,
    picker: Arc<dyn VoicePicker>,
}

impl ElevenLabsTtsRepository {
    pub fn new(
        api_key: &str,
        base_url: &str,
        timeout: Duration,
        picker: Arc<dyn VoicePicker>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::from_reqwest(TtsVendor::ElevenLabs, e))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            picker,
        })
    }

    fn speech_url(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}?output_format=mp3_44100_128",
            self.base_url,
            urlencoding::encode(voice_id)
        )
    }

    fn user_url(&self) -> String {
        format!("{}/v1/user", self.base_url)
    }
}

#[async_trait]
impl TtsRepository for ElevenLabsTtsRepository {
    fn vendor(&self) -> TtsVendor {
        TtsVendor::ElevenLabs
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

        let voice_id = VOICES.select(character_id, params.gender, self.picker.as_ref());
        let speed = compute_speed(character_id, params.voice_style, params.speed_multiplier);
        let request = SpeechRequest {
            text: &cleaned,
            model_id: MODEL_ID,
            voice_settings: VoiceSettings::for_style(params.voice_style, speed),
        };

        tracing::debug!(
            voice_id = voice_id,
            model_id = MODEL_ID,
            speed = request.voice_settings.speed,
            text_length = cleaned.len(),
            "Calling ElevenLabs text-to-speech"
        );

        let response = self
            .client
            .post(self.speech_url(voice_id))
            .header("xi-api-key", &self.api_key)
            .header("accept", "audio/mpeg")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(TtsVendor::ElevenLabs, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                vendor: TtsVendor::ElevenLabs,
                status: status.as_u16(),
                body,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| ProviderError::InvalidResponse {
                vendor: TtsVendor::ElevenLabs,
                message: format!("Failed to read audio: {}", e),
            })?;
        if audio.is_empty() {
            return Err(ProviderError::InvalidResponse {
                vendor: TtsVendor::ElevenLabs,
                message: "empty audio body".to_string(),
            });
        }

        tracing::info!(
            provider = "elevenlabs",
            voice_id = voice_id,
            character_id = character_id,
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio.len(),
            "TTS synthesis completed"
        );

        Ok(GenerationResult::from_audio(&audio, "audio/mpeg", text))
    }

    async fn test_credential(&self) -> bool {
        match self
            .client
            .get(self.user_url())
            .header("xi-api-key", &self.api_key)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "ElevenLabs credential test failed");
                false
            }
        }
    }
}
