use super::fakes::InMemoryUserRepository;
use anyhow::Result;
use rap_battle_backend::domain::{
    tts::{TtsServicePreference, TtsVendor},
    user::User,
};
use std::sync::Arc;

pub struct TestFixtures {
    users: Arc<InMemoryUserRepository>,
}

impl TestFixtures {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self { users }
    }

    pub async fn create_user(&self, email: &str) -> Result<User> {
        let user = User::new(email);
        self.users.insert(user.clone());
        Ok(user)
    }

    pub async fn create_user_with_keys(
        &self,
        email: &str,
        preferred: Option<TtsServicePreference>,
        keys: &[(TtsVendor, &str)],
    ) -> Result<User> {
        let mut user = User::new(email);
        user.preferred_tts_service = preferred;
        for (vendor, key) in keys {
            user.set_api_key(*vendor, Some(key.to_string()));
        }
        self.users.insert(user.clone());
        Ok(user)
    }
}
