use crate::domain::tts::{TtsServicePreference, TtsVendor};
use crate::infrastructure::repositories::{elevenlabs_tts_repository, groq_tts_repository};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub tts: TtsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// What to do when a generation request names a user that does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownUserPolicy {
    /// Skip user-specific paths and continue with system credentials
    Fallback,
    /// Stop immediately with the silent result
    Reject,
}

/// Process-wide vendor credentials, consulted when a user has none
#[derive(Clone, Default)]
pub struct SystemCredentials {
    pub elevenlabs: Option<String>,
    pub openai: Option<String>,
    pub groq: Option<String>,
    /// `ACCESS_KEY_ID:SECRET_ACCESS_KEY`
    pub polly: Option<String>,
}

impl SystemCredentials {
    pub fn get(&self, vendor: TtsVendor) -> Option<&str> {
        match vendor {
            TtsVendor::ElevenLabs => self.elevenlabs.as_deref(),
            TtsVendor::OpenAi => self.openai.as_deref(),
            TtsVendor::Groq => self.groq.as_deref(),
            TtsVendor::Polly => self.polly.as_deref(),
        }
    }

    pub fn configured_vendors(&self) -> Vec<TtsVendor> {
        TtsVendor::ALL
            .into_iter()
            .filter(|vendor| self.get(*vendor).is_some())
            .collect()
    }
}

impl std::fmt::Debug for SystemCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemCredentials")
            .field("configured", &self.configured_vendors())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct VendorEndpoints {
    pub elevenlabs_base_url: String,
    pub groq_base_url: String,
    /// `None` keeps the SDK default
    pub openai_base_url: Option<String>,
    pub polly_region: String,
    pub polly_endpoint_url: Option<String>,
}

impl Default for VendorEndpoints {
    fn default() -> Self {
        Self {
            elevenlabs_base_url: elevenlabs_tts_repository::DEFAULT_BASE_URL.to_string(),
            groq_base_url: groq_tts_repository::DEFAULT_BASE_URL.to_string(),
            openai_base_url: None,
            polly_region: "eu-west-1".to_string(),
            polly_endpoint_url: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TtsConfig {
    pub system_credentials: SystemCredentials,
    pub default_service: TtsServicePreference,
    pub fallback_order: Vec<TtsVendor>,
    pub unknown_user_policy: UnknownUserPolicy,
    pub vendor_timeout_secs: u64,
    pub openai_hd: bool,
    pub endpoints: VendorEndpoints,
    pub cache_enabled: bool,
    pub voice_seed: Option<u64>,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            system_credentials: SystemCredentials::default(),
            default_service: TtsServicePreference::Groq,
            fallback_order: vec![
                TtsVendor::ElevenLabs,
                TtsVendor::OpenAi,
                TtsVendor::Groq,
                TtsVendor::Polly,
            ],
            unknown_user_policy: UnknownUserPolicy::Fallback,
            vendor_timeout_secs: 30,
            openai_hd: true,
            endpoints: VendorEndpoints::default(),
            cache_enabled: false,
            voice_seed: None,
        }
    }
}

impl TtsConfig {
    pub fn vendor_timeout(&self) -> Duration {
        Duration::from_secs(self.vendor_timeout_secs)
    }

    /// Build from any variable source; `lookup` returns `None` for unset names
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = TtsConfig::default();

        let polly = match (non_empty("AWS_ACCESS_KEY_ID"), non_empty("AWS_SECRET_ACCESS_KEY")) {
            (Some(key_id), Some(secret)) => Some(format!("{}:{}", key_id, secret)),
            _ => None,
        };
        let system_credentials = SystemCredentials {
            elevenlabs: non_empty("ELEVENLABS_API_KEY"),
            openai: non_empty("OPENAI_API_KEY"),
            groq: non_empty("GROQ_API_KEY"),
            polly,
        };

        let default_service = match non_empty("DEFAULT_TTS_SERVICE") {
            Some(value) => value.parse::<TtsServicePreference>()?,
            None => defaults.default_service,
        };

        let fallback_order = match non_empty("TTS_FALLBACK_ORDER") {
            Some(value) => parse_fallback_order(&value)?,
            None => defaults.fallback_order,
        };

        let unknown_user_policy = match non_empty("TTS_UNKNOWN_USER_POLICY").as_deref() {
            None | Some("fallback") => UnknownUserPolicy::Fallback,
            Some("reject") => UnknownUserPolicy::Reject,
            Some(other) => return Err(format!("Invalid TTS_UNKNOWN_USER_POLICY: {}", other)),
        };

        let vendor_timeout_secs = match non_empty("TTS_VENDOR_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| format!("Invalid TTS_VENDOR_TIMEOUT_SECS: {}", value))?,
            None => defaults.vendor_timeout_secs,
        };

        let voice_seed = match non_empty("TTS_VOICE_SEED") {
            Some(value) => Some(
                value
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid TTS_VOICE_SEED: {}", value))?,
            ),
            None => None,
        };

        let endpoints = VendorEndpoints {
            elevenlabs_base_url: non_empty("ELEVENLABS_BASE_URL")
                .unwrap_or(defaults.endpoints.elevenlabs_base_url),
            groq_base_url: non_empty("GROQ_BASE_URL").unwrap_or(defaults.endpoints.groq_base_url),
            openai_base_url: non_empty("OPENAI_BASE_URL"),
            polly_region: non_empty("AWS_REGION").unwrap_or(defaults.endpoints.polly_region),
            polly_endpoint_url: non_empty("POLLY_ENDPOINT_URL"),
        };

        Ok(Self {
            system_credentials,
            default_service,
            fallback_order,
            unknown_user_policy,
            vendor_timeout_secs,
            openai_hd: parse_bool(non_empty("OPENAI_TTS_HD"), defaults.openai_hd),
            endpoints,
            cache_enabled: parse_bool(non_empty("TTS_CACHE_ENABLED"), defaults.cache_enabled),
            voice_seed,
        })
    }
}

/// Comma separated vendor names; duplicates are dropped, order is kept
pub fn parse_fallback_order(value: &str) -> Result<Vec<TtsVendor>, String> {
    let mut order = Vec::new();
    for name in value.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let vendor = name.parse::<TtsVendor>()?;
        if !order.contains(&vendor) {
            order.push(vendor);
        }
    }
    Ok(order)
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            jwt_secret: env::var("JWT_SECRET")?,
            environment: match env::var("ENVIRONMENT").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            tts: TtsConfig::from_lookup(|name| env::var(name).ok())?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Log filter used when `RUST_LOG` is unset
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_development() {
            "rap_battle_backend=debug,tower_http=debug"
        } else {
            "rap_battle_backend=info,tower_http=info"
        }
    }
}
