use super::dto::{Gender, VoiceStyle};
use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// The robotic battler. Always voiced by Groq with a mechanical cadence.
pub const ROBOTIC_CHARACTER_ID: &str = "cypher";

pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterProfile {
    pub id: &'static str,
    pub gender: Gender,
    pub base_speed: f32,
}

const CHARACTERS: &[CharacterProfile] = &[
    CharacterProfile {
        id: "razor",
        gender: Gender::Female,
        base_speed: 1.05,
    },
    CharacterProfile {
        id: "venom",
        gender: Gender::Male,
        base_speed: 0.95,
    },
    CharacterProfile {
        id: "silk",
        gender: Gender::Male,
        base_speed: 1.0,
    },
    CharacterProfile {
        id: ROBOTIC_CHARACTER_ID,
        gender: Gender::Male,
        base_speed: 0.9,
    },
];

pub fn character_profile(character_id: &str) -> Option<&'static CharacterProfile> {
    CHARACTERS.iter().find(|c| c.id == character_id)
}

pub fn is_robotic(character_id: &str) -> bool {
    character_id == ROBOTIC_CHARACTER_ID
}

/// Requested gender wins, then the character's own, then male
pub fn resolve_gender(character_id: &str, requested: Option<Gender>) -> Gender {
    requested
        .or_else(|| character_profile(character_id).map(|c| c.gender))
        .unwrap_or(Gender::Male)
}

pub fn style_modifier(style: VoiceStyle) -> f32 {
    match style {
        VoiceStyle::Aggressive => 1.1,
        VoiceStyle::Confident => 1.0,
        VoiceStyle::Smooth => 0.9,
    }
}

/// Final speaking rate: base(character) * style * user multiplier, clamped to [0.5, 2.0]
pub fn compute_speed(character_id: &str, style: VoiceStyle, multiplier: Option<f32>) -> f32 {
    let base = character_profile(character_id)
        .map(|c| c.base_speed)
        .unwrap_or(1.0);
    let multiplier = multiplier
        .filter(|m| m.is_finite() && *m > 0.0)
        .unwrap_or(1.0);

    (base * style_modifier(style) * multiplier).clamp(MIN_SPEED, MAX_SPEED)
}

/// Source of randomness for voice selection on unknown characters
pub trait VoicePicker: Send + Sync {
    /// Return an index in `0..len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

pub struct RandomVoicePicker {
    rng: Mutex<StdRng>,
}

impl RandomVoicePicker {
    pub fn from_os_rng() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl VoicePicker for RandomVoicePicker {
    fn pick(&self, len: usize) -> usize {
        self.rng.lock().random_range(0..len)
    }
}

/// A vendor's voice catalogue: fixed voices for known characters,
/// gender-partitioned pools for everyone else
#[derive(Debug, Clone, Copy)]
pub struct VoiceTable {
    pub characters: &'static [(&'static str, &'static str)],
    pub male: &'static [&'static str],
    pub female: &'static [&'static str],
    pub default_voice: &'static str,
}

impl VoiceTable {
    pub fn select(&self, character_id: &str, gender: Gender, picker: &dyn VoicePicker) -> &'static str {
        if let Some((_, voice)) = self.characters.iter().find(|(id, _)| *id == character_id) {
            return voice;
        }

        let pool = match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
        };
        if pool.is_empty() {
            return self.default_voice;
        }

        let index = picker.pick(pool.len());
        pool.get(index).copied().unwrap_or(self.default_voice)
    }
}
