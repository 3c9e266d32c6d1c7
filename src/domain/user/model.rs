use crate::domain::tts::{TtsServicePreference, TtsVendor};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub preferred_tts_service: Option<TtsServicePreference>,
    pub elevenlabs_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    /// `ACCESS_KEY_ID:SECRET_ACCESS_KEY`
    pub polly_credentials: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            preferred_tts_service: None,
            elevenlabs_api_key: None,
            openai_api_key: None,
            groq_api_key: None,
            polly_credentials: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The user's own credential for a vendor. Blank values count as absent.
    pub fn api_key_for(&self, vendor: TtsVendor) -> Option<&str> {
        let key = match vendor {
            TtsVendor::ElevenLabs => self.elevenlabs_api_key.as_deref(),
            TtsVendor::OpenAi => self.openai_api_key.as_deref(),
            TtsVendor::Groq => self.groq_api_key.as_deref(),
            TtsVendor::Polly => self.polly_credentials.as_deref(),
        };
        key.map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&mut self, vendor: TtsVendor, key: Option<String>) {
        let key = key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());
        match vendor {
            TtsVendor::ElevenLabs => self.elevenlabs_api_key = key,
            TtsVendor::OpenAi => self.openai_api_key = key,
            TtsVendor::Groq => self.groq_api_key = key,
            TtsVendor::Polly => self.polly_credentials = key,
        }
    }

    pub fn configured_vendors(&self) -> Vec<TtsVendor> {
        TtsVendor::ALL
            .into_iter()
            .filter(|vendor| self.api_key_for(*vendor).is_some())
            .collect()
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("preferred_tts_service", &self.preferred_tts_service)
            .field("configured_vendors", &self.configured_vendors())
            .finish()
    }
}
