use super::tts_repository::{ProviderError, SynthesisParams, TtsRepository};
use crate::domain::tts::{
    character::{compute_speed, VoicePicker, VoiceTable},
    text::{sanitize_for_speech, split_into_batches},
    GenerationResult, TtsVendor,
};
use async_trait::async_trait;
use aws_sdk_polly::{
    config::{BehaviorVersion, Credentials, Region},
    types::{Engine, OutputFormat, TextType, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly has a limit of 3000 characters per request
const MAX_BATCH_SIZE: usize = 3000;

const VOICES: VoiceTable = VoiceTable {
    characters: &[
        ("razor", "Kimberly"),
        ("venom", "Matthew"),
        ("silk", "Stephen"),
        ("cypher", "Joey"),
    ],
    male: &["Matthew", "Joey", "Stephen", "Gregory"],
    female: &["Joanna", "Kimberly", "Salli", "Ruth", "Danielle"],
    default_voice: "Joanna",
};

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: PollyClient,
    picker: Arc<dyn VoicePicker>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: PollyClient, picker: Arc<dyn VoicePicker>) -> Self {
        Self {
            polly_client,
            picker,
        }
    }

    /// Build a client from an `ACCESS_KEY_ID:SECRET_ACCESS_KEY` credential string
    pub fn from_credentials(
        credentials: &str,
        region: &str,
        endpoint_url: Option<&str>,
        picker: Arc<dyn VoicePicker>,
    ) -> Result<Self, ProviderError> {
        let (access_key_id, secret_access_key) = parse_credentials(credentials)?;

        let mut builder = aws_sdk_polly::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "rap-battle-backend",
            ));
        if let Some(endpoint) = endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        Ok(Self::new(PollyClient::from_conf(builder.build()), picker))
    }

    /// Call AWS Polly to synthesize a single SSML batch
    async fn call_polly(&self, ssml: &str, voice_name: &str) -> Result<Vec<u8>, ProviderError> {
        tracing::debug!(
            voice = voice_name,
            engine = "neural",
            output_format = "Mp3",
            text_length = ssml.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(ssml)
            .text_type(TextType::Ssml)
            .voice_id(VoiceId::from(voice_name))
            .output_format(OutputFormat::Mp3)
            .engine(Engine::Neural)
            .send()
            .await
            .map_err(|e| ProviderError::Sdk {
                vendor: TtsVendor::Polly,
                message: format!("{:?}", e),
            })?;

        let audio_stream = result
            .audio_stream
            .collect()
            .await
            .map_err(|e| ProviderError::InvalidResponse {
                vendor: TtsVendor::Polly,
                message: format!("Failed to read audio stream: {}", e),
            })?;

        Ok(audio_stream.into_bytes().to_vec())
    }
}

fn parse_credentials(credentials: &str) -> Result<(String, String), ProviderError> {
    match credentials.split_once(':') {
        Some((key_id, secret)) if !key_id.trim().is_empty() && !secret.trim().is_empty() => {
            Ok((key_id.trim().to_string(), secret.trim().to_string()))
        }
        _ => Err(ProviderError::InvalidCredential {
            vendor: TtsVendor::Polly,
            message: "expected ACCESS_KEY_ID:SECRET_ACCESS_KEY".to_string(),
        }),
    }
}

/// Wrap text in SSML with the speaking rate as a percentage
fn to_ssml(text: &str, speed: f32) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;");
    let rate = (speed * 100.0).round() as u32;

    format!(r#"<speak><prosody rate="{}%">{}</prosody></speak>"#, rate, escaped)
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    fn vendor(&self) -> TtsVendor {
        TtsVendor::Polly
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
            audio.extend(self.call_polly(&to_ssml(batch, speed), voice).await?);
        }

        tracing::info!(
            provider = "polly",
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
        match self.polly_client.describe_voices().send().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = ?e, "Polly credential test failed");
                false
            }
        }
    }
}
