pub mod elevenlabs_tts_repository;
pub mod groq_tts_repository;
pub mod openai_tts_repository;
pub mod polly_tts_repository;
pub mod provider_factory;
pub mod tts_repository;
pub mod user_repository;

pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use groq_tts_repository::GroqTtsRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use provider_factory::VendorProviderFactory;
pub use tts_repository::{ProviderError, SynthesisParams, TtsRepository};
pub use user_repository::{PostgresUserRepository, UserRepository};
