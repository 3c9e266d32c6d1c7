use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

/// Characters per second used to estimate speech duration
pub const CHARACTERS_PER_SECOND: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceStyle {
    Aggressive,
    #[default]
    Confident,
    Smooth,
}

impl VoiceStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceStyle::Aggressive => "aggressive",
            VoiceStyle::Confident => "confident",
            VoiceStyle::Smooth => "smooth",
        }
    }
}

impl std::fmt::Display for VoiceStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-request options for speech generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    pub character_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub voice_style: VoiceStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_multiplier: Option<f32>,
}

impl GenerationOptions {
    pub fn for_character(character_id: impl Into<String>) -> Self {
        Self {
            character_id: character_id.into(),
            character_name: None,
            gender: None,
            voice_style: VoiceStyle::default(),
            speed_multiplier: None,
        }
    }
}

/// Outcome of a generation request.
/// An empty `audio_url` means no audio could be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub audio_url: String,
    pub duration: u32,
}

impl GenerationResult {
    /// The "no audio" result returned once every attempt is exhausted
    pub fn silent(text: &str) -> Self {
        Self {
            audio_url: String::new(),
            duration: estimate_duration_seconds(text),
        }
    }

    /// Build a result from raw audio bytes
    pub fn from_audio(audio: &[u8], mime_type: &str, text: &str) -> Self {
        Self {
            audio_url: encode_audio_data_url(audio, mime_type),
            duration: estimate_duration_seconds(text),
        }
    }

    pub fn has_audio(&self) -> bool {
        !self.audio_url.is_empty()
    }
}

/// Duration estimated from text length, not measured from audio
pub fn estimate_duration_seconds(text: &str) -> u32 {
    (text.chars().count() / CHARACTERS_PER_SECOND) as u32
}

/// Encode audio as a self-contained `data:` URL
pub fn encode_audio_data_url(audio: &[u8], mime_type: &str) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(audio))
}
