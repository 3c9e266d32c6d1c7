use crate::domain::tts::{Gender, GenerationResult, TtsVendor, VoiceStyle};
use async_trait::async_trait;

/// Voice parameters handed to a provider for one synthesis call
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisParams {
    pub character_name: Option<String>,
    pub gender: Gender,
    pub voice_style: VoiceStyle,
    pub speed_multiplier: Option<f32>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{vendor} returned HTTP {status}: {body}")]
    Http {
        vendor: TtsVendor,
        status: u16,
        body: String,
    },
    #[error("{vendor} network error: {message}")]
    Network { vendor: TtsVendor, message: String },
    #[error("{vendor} request timed out")]
    Timeout { vendor: TtsVendor },
    #[error("{vendor} returned an invalid response: {message}")]
    InvalidResponse { vendor: TtsVendor, message: String },
    #[error("{vendor} SDK error: {message}")]
    Sdk { vendor: TtsVendor, message: String },
    #[error("{vendor} credential is malformed: {message}")]
    InvalidCredential { vendor: TtsVendor, message: String },
    #[error("nothing to synthesize")]
    EmptyText,
}

impl ProviderError {
    pub fn from_reqwest(vendor: TtsVendor, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout { vendor }
        } else {
            ProviderError::Network {
                vendor,
                message: err.to_string(),
            }
        }
    }
}

/// Repository for TTS synthesis against one vendor with one credential.
///
/// Implementations are responsible for:
/// - Vendor-specific voice selection per character
/// - Mapping the speaking rate onto the vendor's API
/// - Sanitizing text before it is sent
/// - Encoding the audio as a `data:` URL
///
/// Errors are returned as-is; callers decide whether to fall back.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    fn vendor(&self) -> TtsVendor;

    /// Synthesize `text` in the voice of `character_id`
    async fn synthesize(
        &self,
        text: &str,
        character_id: &str,
        params: &SynthesisParams,
    ) -> Result<GenerationResult, ProviderError>;

    /// Cheap authenticated call proving the credential works
    async fn test_credential(&self) -> bool;
}
