use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// External text-to-speech vendors the service can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsVendor {
    /// Voice-cloning capable
    ElevenLabs,
    /// Premium quality
    OpenAi,
    /// Fast, OpenAI-compatible speech endpoint
    Groq,
    /// AWS Polly, general purpose fallback
    Polly,
}

impl TtsVendor {
    pub const ALL: [TtsVendor; 4] = [
        TtsVendor::ElevenLabs,
        TtsVendor::OpenAi,
        TtsVendor::Groq,
        TtsVendor::Polly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TtsVendor::ElevenLabs => "elevenlabs",
            TtsVendor::OpenAi => "openai",
            TtsVendor::Groq => "groq",
            TtsVendor::Polly => "polly",
        }
    }
}

impl std::fmt::Display for TtsVendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TtsVendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "elevenlabs" => Ok(TtsVendor::ElevenLabs),
            "openai" => Ok(TtsVendor::OpenAi),
            "groq" => Ok(TtsVendor::Groq),
            "polly" => Ok(TtsVendor::Polly),
            other => Err(format!("Unknown TTS service: {}", other)),
        }
    }
}

/// The user's stored choice of TTS service.
/// `System` means "no personal choice, use the system fallback chain".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TtsServicePreference {
    System,
    ElevenLabs,
    OpenAi,
    Groq,
    Polly,
}

impl TtsServicePreference {
    /// The vendor this preference points at, `None` for `System`
    pub fn vendor(&self) -> Option<TtsVendor> {
        match self {
            TtsServicePreference::System => None,
            TtsServicePreference::ElevenLabs => Some(TtsVendor::ElevenLabs),
            TtsServicePreference::OpenAi => Some(TtsVendor::OpenAi),
            TtsServicePreference::Groq => Some(TtsVendor::Groq),
            TtsServicePreference::Polly => Some(TtsVendor::Polly),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self.vendor() {
            Some(vendor) => vendor.as_str(),
            None => "system",
        }
    }
}

impl From<TtsVendor> for TtsServicePreference {
    fn from(vendor: TtsVendor) -> Self {
        match vendor {
            TtsVendor::ElevenLabs => TtsServicePreference::ElevenLabs,
            TtsVendor::OpenAi => TtsServicePreference::OpenAi,
            TtsVendor::Groq => TtsServicePreference::Groq,
            TtsVendor::Polly => TtsServicePreference::Polly,
        }
    }
}

impl std::fmt::Display for TtsServicePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TtsServicePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("system") {
            return Ok(TtsServicePreference::System);
        }
        TtsVendor::from_str(s).map(TtsServicePreference::from)
    }
}

/// Where a credential used for an attempt came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOrigin {
    User,
    System,
}

impl std::fmt::Display for CredentialOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialOrigin::User => write!(f, "user"),
            CredentialOrigin::System => write!(f, "system"),
        }
    }
}
