pub mod character;
pub mod dto;
pub mod error;
pub mod fallback;
pub mod instance_cache;
pub mod service;
pub mod text;
pub mod vendor;

pub use dto::{Gender, GenerationOptions, GenerationResult, VoiceStyle};
pub use error::TtsServiceError;
pub use instance_cache::{CacheScope, ProviderFactory, ProviderInstanceCache, ProviderKey, ProviderMode};
pub use service::{TtsService, TtsServiceApi};
pub use vendor::{CredentialOrigin, TtsServicePreference, TtsVendor};
