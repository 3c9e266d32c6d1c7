use super::{
    elevenlabs_tts_repository::ElevenLabsTtsRepository, groq_tts_repository::GroqTtsRepository,
    openai_tts_repository::OpenAiTtsRepository, polly_tts_repository::PollyTtsRepository,
    tts_repository::{ProviderError, TtsRepository},
};
use crate::domain::tts::{
    character::VoicePicker,
    instance_cache::{ProviderFactory, ProviderKey, ProviderMode},
    TtsVendor,
};
use crate::infrastructure::config::VendorEndpoints;
use std::sync::Arc;
use std::time::Duration;

/// Builds real vendor clients from a credential
pub struct VendorProviderFactory {
    endpoints: VendorEndpoints,
    timeout: Duration,
    picker: Arc<dyn VoicePicker>,
}

impl VendorProviderFactory {
    pub fn new(endpoints: VendorEndpoints, timeout: Duration, picker: Arc<dyn VoicePicker>) -> Self {
        Self {
            endpoints,
            timeout,
            picker,
        }
    }
}

impl ProviderFactory for VendorProviderFactory {
    fn create(&self, key: &ProviderKey) -> Result<Arc<dyn TtsRepository>, ProviderError> {
        let instance: Arc<dyn TtsRepository> = match key.vendor {
            TtsVendor::ElevenLabs => Arc::new(ElevenLabsTtsRepository::new(
                &key.api_key,
                &self.endpoints.elevenlabs_base_url,
                self.timeout,
                self.picker.clone(),
            )?),
            TtsVendor::OpenAi => Arc::new(OpenAiTtsRepository::new(
                &key.api_key,
                self.endpoints.openai_base_url.as_deref(),
                key.mode != Some(ProviderMode::Standard),
                self.picker.clone(),
            )),
            TtsVendor::Groq => Arc::new(GroqTtsRepository::new(
                &key.api_key,
                &self.endpoints.groq_base_url,
                self.timeout,
                self.picker.clone(),
            )?),
            TtsVendor::Polly => Arc::new(PollyTtsRepository::from_credentials(
                &key.api_key,
                &self.endpoints.polly_region,
                self.endpoints.polly_endpoint_url.as_deref(),
                self.picker.clone(),
            )?),
        };

        Ok(instance)
    }
}
