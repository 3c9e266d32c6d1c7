use async_trait::async_trait;
use rap_battle_backend::{
    domain::{
        tts::{GenerationResult, ProviderFactory, ProviderKey, TtsVendor},
        user::User,
    },
    error::{AppError, AppResult},
    infrastructure::repositories::{ProviderError, SynthesisParams, TtsRepository, UserRepository},
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
    healthy: AtomicBool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            healthy: AtomicBool::new(true),
        }
    }

    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().insert(user.id, user);
    }

    pub fn get(&self, user_id: Uuid) -> Option<User> {
        self.users.lock().unwrap().get(&user_id).cloned()
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(self.get(user_id))
    }

    async fn update_tts_settings(&self, user: &User) -> AppResult<User> {
        self.insert(user.clone());
        Ok(user.clone())
    }

    async fn check_connection(&self) -> AppResult<()> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::Internal("database unreachable".to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VendorCall {
    pub vendor: TtsVendor,
    pub api_key: String,
    pub text: String,
    pub character_id: String,
    pub params: SynthesisParams,
}

/// Keys starting with `bad` fail every call, all other keys succeed
pub struct FakeVendor {
    key: ProviderKey,
    calls: Arc<Mutex<Vec<VendorCall>>>,
}

#[async_trait]
impl TtsRepository for FakeVendor {
    fn vendor(&self) -> TtsVendor {
        self.key.vendor
    }

    async fn synthesize(
        &self,
        text: &str,
        character_id: &str,
        params: &SynthesisParams,
    ) -> Result<GenerationResult, ProviderError> {
        self.calls.lock().unwrap().push(VendorCall {
            vendor: self.key.vendor,
            api_key: self.key.api_key.clone(),
            text: text.to_string(),
            character_id: character_id.to_string(),
            params: params.clone(),
        });

        if self.key.api_key.starts_with("bad") {
            return Err(ProviderError::Http {
                vendor: self.key.vendor,
                status: 503,
                body: "overloaded".to_string(),
            });
        }

        Ok(GenerationResult::from_audio(
            self.key.vendor.as_str().as_bytes(),
            "audio/mpeg",
            text,
        ))
    }

    async fn test_credential(&self) -> bool {
        !self.key.api_key.starts_with("bad")
    }
}

#[derive(Default)]
pub struct FakeVendorFactory {
    pub calls: Arc<Mutex<Vec<VendorCall>>>,
}

impl ProviderFactory for FakeVendorFactory {
    fn create(&self, key: &ProviderKey) -> Result<Arc<dyn TtsRepository>, ProviderError> {
        Ok(Arc::new(FakeVendor {
            key: key.clone(),
            calls: self.calls.clone(),
        }))
    }
}
