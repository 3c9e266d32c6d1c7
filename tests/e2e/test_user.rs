use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use rap_battle_backend::domain::tts::{ProviderKey, TtsServicePreference, TtsVendor};
use serde_json::json;

#[tokio::test]
async fn it_should_require_auth_for_settings() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/api/me/tts-settings").await.unwrap();

    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("Missing authorization header");
}

#[tokio::test]
async fn it_should_reject_tokens_for_unknown_users() {
    let ctx = TestContext::new().await.unwrap();
    let token = ctx.token_for(&uuid::Uuid::new_v4());

    let response = ctx
        .client
        .get_with_auth("/api/me/tts-settings", &token)
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("User not found");
}

#[tokio::test]
async fn it_should_return_default_settings_for_new_user() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.fixtures.create_user("mc@example.com").await.unwrap();

    let response = ctx
        .client
        .get_with_auth("/api/me/tts-settings", &ctx.token_for(&user.id))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.unwrap(),
        json!({ "preferredTtsService": "groq", "configuredServices": [] })
    );
}

#[tokio::test]
async fn it_should_update_preference_and_keys_without_echoing_them() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.fixtures.create_user("mc@example.com").await.unwrap();

    let response = ctx
        .client
        .put_with_auth(
            "/api/me/tts-settings",
            &json!({
                "preferredTtsService": "elevenlabs",
                "apiKeys": { "elevenlabs": "el_user_key", "groq": "gsk_user_key" }
            }),
            &ctx.token_for(&user.id),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert!(!String::from_utf8_lossy(&response.body_bytes).contains("el_user_key"));
    assert_eq!(
        response.body.unwrap(),
        json!({
            "preferredTtsService": "elevenlabs",
            "configuredServices": ["elevenlabs", "groq"]
        })
    );

    let stored = ctx.users.get(user.id).unwrap();
    assert_eq!(stored.preferred_tts_service, Some(TtsServicePreference::ElevenLabs));
    assert_eq!(stored.api_key_for(TtsVendor::Groq), Some("gsk_user_key"));
}

#[tokio::test]
async fn it_should_remove_key_given_empty_string() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx
        .fixtures
        .create_user_with_keys("mc@example.com", None, &[(TtsVendor::OpenAi, "sk-user")])
        .await
        .unwrap();

    let response = ctx
        .client
        .put_with_auth(
            "/api/me/tts-settings",
            &json!({ "apiKeys": { "openai": "" } }),
            &ctx.token_for(&user.id),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(ctx.users.get(user.id).unwrap().openai_api_key, None);
}

#[tokio::test]
async fn it_should_reject_unknown_service_names() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.fixtures.create_user("mc@example.com").await.unwrap();
    let token = ctx.token_for(&user.id);

    let response = ctx
        .client
        .put_with_auth(
            "/api/me/tts-settings",
            &json!({ "preferredTtsService": "bark" }),
            &token,
        )
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Unknown TTS service: bark");

    let response = ctx
        .client
        .put_with_auth(
            "/api/me/tts-settings",
            &json!({ "apiKeys": { "bark": "key" } }),
            &token,
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn it_should_drop_warm_provider_instances_after_update() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.fixtures.create_user("mc@example.com").await.unwrap();
    let token = ctx.token_for(&user.id);

    ctx.instances
        .get_instance(&ProviderKey::new(TtsVendor::Groq, "gsk_system"))
        .unwrap();
    assert_eq!(ctx.instances.len(), 1);

    ctx.client
        .put_with_auth(
            "/api/me/tts-settings",
            &json!({ "preferredTtsService": "system" }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    assert!(ctx.instances.is_empty());
}
