use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use rap_battle_backend::domain::tts::{Gender, TtsServicePreference, TtsVendor, VoiceStyle};
use rap_battle_backend::infrastructure::config::{
    SystemCredentials, TtsConfig, UnknownUserPolicy,
};
use serde_json::json;

#[tokio::test]
async fn it_should_require_auth_for_generation() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx
        .client
        .post("/api/tts/generate", &json!({ "text": "yo", "characterId": "silk" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(ctx.vendor_calls().is_empty());
}

#[tokio::test]
async fn it_should_force_groq_for_the_robotic_character() {
    let ctx = TestContext::with_system_credentials(SystemCredentials {
        elevenlabs: Some("el_system".to_string()),
        groq: Some("gsk_system".to_string()),
        ..SystemCredentials::default()
    })
    .await
    .unwrap();
    let user = ctx
        .fixtures
        .create_user_with_keys(
            "mc@example.com",
            Some(TtsServicePreference::ElevenLabs),
            &[(TtsVendor::ElevenLabs, "el_user")],
        )
        .await
        .unwrap();

    let response = ctx
        .client
        .post_with_auth(
            "/api/tts/generate",
            &json!({ "text": "yo", "characterId": "cypher", "characterName": "Cypher" }),
            &ctx.token_for(&user.id),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.unwrap(),
        json!({ "audioUrl": "data:audio/mpeg;base64,Z3JvcQ==", "duration": 0 })
    );
    let calls = ctx.vendor_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].vendor, TtsVendor::Groq);
    assert_eq!(calls[0].api_key, "gsk_system");
    assert_eq!(calls[0].params.character_name.as_deref(), Some("Cypher"));
}

#[tokio::test]
async fn it_should_use_preferred_vendor_with_user_key() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx
        .fixtures
        .create_user_with_keys(
            "mc@example.com",
            Some(TtsServicePreference::Polly),
            &[(TtsVendor::Polly, "AKIA:user")],
        )
        .await
        .unwrap();

    let response = ctx
        .client
        .post_with_auth(
            "/api/tts/generate",
            &json!({
                "text": "Razor cuts through the beat like a blade",
                "characterId": "razor",
                "voiceStyle": "aggressive",
                "speedMultiplier": 1.2
            }),
            &ctx.token_for(&user.id),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.unwrap();
    assert_eq!(body["audioUrl"], "data:audio/mpeg;base64,cG9sbHk=");
    assert_eq!(body["duration"], 2);

    let calls = ctx.vendor_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].api_key, "AKIA:user");
    assert_eq!(calls[0].params.gender, Gender::Female);
    assert_eq!(calls[0].params.voice_style, VoiceStyle::Aggressive);
    assert_eq!(calls[0].params.speed_multiplier, Some(1.2));
}

#[tokio::test]
async fn it_should_fall_back_to_system_chain_when_preference_fails() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx
        .fixtures
        .create_user_with_keys(
            "mc@example.com",
            Some(TtsServicePreference::OpenAi),
            &[(TtsVendor::OpenAi, "bad_user_key")],
        )
        .await
        .unwrap();

    let response = ctx
        .client
        .post_with_auth(
            "/api/tts/generate",
            &json!({ "text": "second verse", "characterId": "venom" }),
            &ctx.token_for(&user.id),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.unwrap()["audioUrl"],
        "data:audio/mpeg;base64,Z3JvcQ=="
    );

    let calls = ctx.vendor_calls();
    assert_eq!(
        calls.iter().map(|c| c.vendor).collect::<Vec<_>>(),
        vec![TtsVendor::OpenAi, TtsVendor::Groq]
    );
    assert_eq!(calls[0].text, calls[1].text);
    assert_eq!(calls[0].params, calls[1].params);
}

#[tokio::test]
async fn it_should_return_silent_result_when_no_vendor_is_available() {
    let ctx = TestContext::with_system_credentials(SystemCredentials::default())
        .await
        .unwrap();
    let user = ctx.fixtures.create_user("mc@example.com").await.unwrap();
    let text = "no keys anywhere in this whole battle";

    let response = ctx
        .client
        .post_with_auth(
            "/api/tts/generate",
            &json!({ "text": text, "characterId": "silk" }),
            &ctx.token_for(&user.id),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.unwrap(),
        json!({ "audioUrl": "", "duration": text.chars().count() / 15 })
    );
    assert!(ctx.vendor_calls().is_empty());
}

#[tokio::test]
async fn it_should_return_silent_result_when_every_vendor_fails() {
    let ctx = TestContext::with_system_credentials(SystemCredentials {
        elevenlabs: Some("bad_el".to_string()),
        openai: Some("bad_sk".to_string()),
        groq: Some("bad_gsk".to_string()),
        polly: Some("bad:polly".to_string()),
    })
    .await
    .unwrap();
    let user = ctx.fixtures.create_user("mc@example.com").await.unwrap();

    let response = ctx
        .client
        .post_with_auth(
            "/api/tts/generate",
            &json!({ "text": "everyone is down today", "characterId": "silk" }),
            &ctx.token_for(&user.id),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.unwrap()["audioUrl"], "");
    // Preference (groq) plus the four chain vendors, groq's system key only once
    assert_eq!(ctx.vendor_calls().len(), 4);
}

#[tokio::test]
async fn it_should_validate_generation_requests() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.fixtures.create_user("mc@example.com").await.unwrap();
    let token = ctx.token_for(&user.id);

    let response = ctx
        .client
        .post_with_auth(
            "/api/tts/generate",
            &json!({ "text": "   ", "characterId": "silk" }),
            &token,
        )
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Text must not be empty");

    let response = ctx
        .client
        .post_with_auth(
            "/api/tts/generate",
            &json!({ "text": "a".repeat(5001), "characterId": "silk" }),
            &token,
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);

    let response = ctx
        .client
        .post_with_auth(
            "/api/tts/generate",
            &json!({ "text": "bars", "characterId": "silk", "speedMultiplier": -1.0 }),
            &token,
        )
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("speedMultiplier");

    assert!(ctx.vendor_calls().is_empty());
}

#[tokio::test]
async fn it_should_test_the_users_stored_key() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx
        .fixtures
        .create_user_with_keys(
            "mc@example.com",
            None,
            &[(TtsVendor::Groq, "gsk_user"), (TtsVendor::OpenAi, "bad_user")],
        )
        .await
        .unwrap();
    let token = ctx.token_for(&user.id);

    for (service, valid) in [("groq", true), ("openai", false), ("elevenlabs", false)] {
        let response = ctx
            .client
            .post_with_auth("/api/tts/test-key", &json!({ "service": service }), &token)
            .await
            .unwrap();

        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.body.unwrap(),
            json!({ "service": service, "valid": valid })
        );
    }
}

#[tokio::test]
async fn it_should_reject_unknown_service_in_key_test() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.fixtures.create_user("mc@example.com").await.unwrap();

    let response = ctx
        .client
        .post_with_auth(
            "/api/tts/test-key",
            &json!({ "service": "bark" }),
            &ctx.token_for(&user.id),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Unknown TTS service: bark");
}

#[tokio::test]
async fn it_should_use_new_keys_immediately_after_settings_update() {
    let ctx = TestContext::with_tts_config(TtsConfig {
        system_credentials: SystemCredentials::default(),
        unknown_user_policy: UnknownUserPolicy::Reject,
        ..TtsConfig::default()
    })
    .await
    .unwrap();
    let user = ctx.fixtures.create_user("mc@example.com").await.unwrap();
    let token = ctx.token_for(&user.id);
    let request = json!({ "text": "fresh key fresh bars", "characterId": "silk" });

    let before = ctx
        .client
        .post_with_auth("/api/tts/generate", &request, &token)
        .await
        .unwrap();
    assert_eq!(before.body.unwrap()["audioUrl"], "");

    ctx.client
        .put_with_auth(
            "/api/me/tts-settings",
            &json!({ "preferredTtsService": "openai", "apiKeys": { "openai": "sk-user" } }),
            &token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let after = ctx
        .client
        .post_with_auth("/api/tts/generate", &request, &token)
        .await
        .unwrap();
    assert_eq!(after.body.unwrap()["audioUrl"], "data:audio/mpeg;base64,b3BlbmFp");
}
