use super::character::{is_robotic, resolve_gender};
use super::dto::{GenerationOptions, GenerationResult};
use super::error::TtsServiceError;
use super::fallback::{first_success, Candidate, Credential, Phase};
use super::instance_cache::{ProviderInstanceCache, ProviderKey, ProviderMode};
use super::vendor::TtsVendor;
use crate::domain::user::User;
use crate::infrastructure::config::{TtsConfig, UnknownUserPolicy};
use crate::infrastructure::repositories::{ProviderError, SynthesisParams, UserRepository};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

/// Longest text accepted by the HTTP surface
pub const MAX_TEXT_CHARS: usize = 5000;

/// Picks a vendor and credential for each request and falls back on failure
pub struct TtsService {
    user_repo: Arc<dyn UserRepository>,
    instances: Arc<ProviderInstanceCache>,
    config: TtsConfig,
    cache: Option<Cache<String, GenerationResult>>,
}

impl TtsService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        instances: Arc<ProviderInstanceCache>,
        config: TtsConfig,
    ) -> Self {
        let cache = if config.cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(100)
                    .time_to_idle(Duration::from_secs(30 * 60)) // 30 minutes, refreshes on access
                    .build(),
            )
        } else {
            None
        };

        Self {
            user_repo,
            instances,
            config,
            cache,
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Generate speech for `text` in the voice of `options.character_id`.
    ///
    /// Never fails: when every attempt is exhausted the result carries an
    /// empty `audio_url` and the estimated duration.
    async fn generate(
        &self,
        text: &str,
        user_id: Uuid,
        options: &GenerationOptions,
    ) -> GenerationResult;

    /// Check the user's own key for `vendor` with a cheap vendor call
    async fn test_user_api_key(&self, user_id: Uuid, vendor: TtsVendor) -> bool;

    /// Drop warm provider clients after a credential change.
    /// Instances are not tracked per user, so every instance is dropped.
    fn clear_user_instances(&self, user_id: Uuid);
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn generate(
        &self,
        text: &str,
        user_id: Uuid,
        options: &GenerationOptions,
    ) -> GenerationResult {
        let span = tracing::info_span!(
            "tts_generate",
            user_id = %user_id,
            character_id = %options.character_id,
            character_name = options.character_name.as_deref().unwrap_or(""),
        );

        self.generate_inner(text, user_id, options)
            .instrument(span)
            .await
    }

    async fn test_user_api_key(&self, user_id: Uuid, vendor: TtsVendor) -> bool {
        let Some(user) = self.load_user(user_id).await else {
            tracing::info!(user_id = %user_id, vendor = %vendor, "Key test for unknown user");
            return false;
        };
        let Some(api_key) = user.api_key_for(vendor) else {
            tracing::info!(user_id = %user_id, vendor = %vendor, "No user key to test");
            return false;
        };

        let instance = match self.instances.get_instance(&self.provider_key(vendor, api_key)) {
            Ok(instance) => instance,
            Err(e) => {
                tracing::warn!(user_id = %user_id, vendor = %vendor, error = %e, "Could not build provider for key test");
                return false;
            }
        };

        let valid = tokio::time::timeout(self.config.vendor_timeout(), instance.test_credential())
            .await
            .unwrap_or(false);

        tracing::info!(user_id = %user_id, vendor = %vendor, valid = valid, "User API key tested");
        valid
    }

    /// Cached audio goes too: it was produced under the old preference and keys
    fn clear_user_instances(&self, user_id: Uuid) {
        tracing::info!(user_id = %user_id, "Clearing provider instances after credential change");
        self.instances.invalidate_all();
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}

impl TtsService {
    async fn generate_inner(
        &self,
        text: &str,
        user_id: Uuid,
        options: &GenerationOptions,
    ) -> GenerationResult {
        let start_time = Instant::now();

        tracing::info!(
            voice_style = %options.voice_style,
            text_length = text.chars().count(),
            "TTS generation request"
        );

        let cache_key = Self::cache_key(text, user_id, options);
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&cache_key).await {
                tracing::info!(duration = cached.duration, "TTS cache hit - returning cached audio");
                return cached;
            }
        }

        let user = self.load_user(user_id).await;
        if user.is_none() && self.config.unknown_user_policy == UnknownUserPolicy::Reject {
            tracing::warn!("Unknown user rejected, returning silent result");
            return GenerationResult::silent(text);
        }

        let plan = self.build_plan(user.as_ref(), &options.character_id);
        let params = SynthesisParams {
            character_name: options.character_name.clone(),
            gender: resolve_gender(&options.character_id, options.gender),
            voice_style: options.voice_style,
            speed_multiplier: options.speed_multiplier,
        };

        let outcome = first_success(plan, |vendor, credential| {
            self.attempt(vendor, credential, text, &options.character_id, &params)
        })
        .await;

        let Some(success) = outcome else {
            tracing::warn!(
                latency_ms = start_time.elapsed().as_millis(),
                "All TTS vendors exhausted, returning silent result"
            );
            return GenerationResult::silent(text);
        };

        tracing::info!(
            phase = %success.candidate.phase,
            vendor = %success.candidate.vendor,
            credential_origin = ?success.candidate.credential.as_ref().map(|c| c.origin),
            duration = success.value.duration,
            latency_ms = start_time.elapsed().as_millis(),
            "TTS generation succeeded"
        );

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, success.value.clone()).await;
        }

        success.value
    }

    /// A storage error is logged and treated as an unknown user
    async fn load_user(&self, user_id: Uuid) -> Option<User> {
        match self.user_repo.find_by_id(user_id).await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "User lookup failed");
                None
            }
        }
    }

    /// Ordered candidates: character override, then preference, then system chain
    fn build_plan(&self, user: Option<&User>, character_id: &str) -> Vec<Candidate> {
        let mut plan = Vec::new();

        if is_robotic(character_id) {
            plan.push(Candidate::new(
                Phase::CharacterOverride,
                TtsVendor::Groq,
                self.credential_for(user, TtsVendor::Groq),
            ));
        }

        if let Some(user) = user {
            let preference = user
                .preferred_tts_service
                .unwrap_or(self.config.default_service);
            if let Some(vendor) = preference.vendor() {
                plan.push(Candidate::new(
                    Phase::Preference,
                    vendor,
                    self.credential_for(Some(user), vendor),
                ));
            }
        }

        plan.extend(self.config.fallback_order.iter().map(|vendor| {
            Candidate::new(
                Phase::SystemChain,
                *vendor,
                self.config
                    .system_credentials
                    .get(*vendor)
                    .map(Credential::system),
            )
        }));

        plan
    }

    /// User key first, process-wide key second
    fn credential_for(&self, user: Option<&User>, vendor: TtsVendor) -> Option<Credential> {
        user.and_then(|u| u.api_key_for(vendor))
            .map(Credential::user)
            .or_else(|| {
                self.config
                    .system_credentials
                    .get(vendor)
                    .map(Credential::system)
            })
    }

    fn provider_key(&self, vendor: TtsVendor, api_key: &str) -> ProviderKey {
        let key = ProviderKey::new(vendor, api_key);
        match vendor {
            TtsVendor::OpenAi if self.config.openai_hd => key.with_mode(ProviderMode::HighDefinition),
            TtsVendor::OpenAi => key.with_mode(ProviderMode::Standard),
            _ => key,
        }
    }

    async fn attempt(
        &self,
        vendor: TtsVendor,
        credential: Credential,
        text: &str,
        character_id: &str,
        params: &SynthesisParams,
    ) -> Result<GenerationResult, ProviderError> {
        let instance = self
            .instances
            .get_instance(&self.provider_key(vendor, &credential.secret))?;

        tracing::info!(
            vendor = %vendor,
            credential_origin = %credential.origin,
            "Attempting TTS vendor"
        );

        match tokio::time::timeout(
            self.config.vendor_timeout(),
            instance.synthesize(text, character_id, params),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout { vendor }),
        }
    }

    fn cache_key(text: &str, user_id: Uuid, options: &GenerationOptions) -> String {
        format!(
            "{}:{}:{}:{:?}:{}:{}",
            user_id,
            options.character_id,
            options.voice_style,
            options.gender,
            options.speed_multiplier.unwrap_or(1.0),
            text
        )
    }
}

/// Reject requests the HTTP surface must not forward
pub fn validate_request(text: &str, options: &GenerationOptions) -> Result<(), TtsServiceError> {
    if text.trim().is_empty() {
        return Err(TtsServiceError::Invalid("Text must not be empty".to_string()));
    }

    let length = text.chars().count();
    if length > MAX_TEXT_CHARS {
        return Err(TtsServiceError::TooLarge(format!(
            "Text has {} characters, maximum is {}",
            length, MAX_TEXT_CHARS
        )));
    }

    if let Some(speed) = options.speed_multiplier {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(TtsServiceError::Invalid(
                "speedMultiplier must be a positive number".to_string(),
            ));
        }
    }

    Ok(())
}
