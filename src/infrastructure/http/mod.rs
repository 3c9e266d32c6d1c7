use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::domain::auth::JwtManager;
use crate::infrastructure::config::Config;
use crate::{
    controllers::{health, tts::TtsController, user::UserController},
    infrastructure::auth::{auth_middleware, request_id_middleware},
};

use crate::infrastructure::repositories::UserRepository;

/// Build the application router with every route and layer attached
pub fn build_router(
    user_repo: Arc<dyn UserRepository>,
    jwt_manager: Arc<JwtManager>,
    tts_controller: Arc<TtsController>,
    user_controller: Arc<UserController>,
) -> Router {
    let auth_state = (user_repo.clone(), jwt_manager);

    // TTS routes (require authentication)
    let tts_routes = Router::new()
        .route("/api/tts/generate", post(TtsController::generate))
        .route("/api/tts/test-key", post(TtsController::test_key))
        .with_state(tts_controller)
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ));

    // Account settings routes (require authentication)
    let user_routes = Router::new()
        .route(
            "/api/me/tts-settings",
            get(UserController::get_tts_settings).put(UserController::update_tts_settings),
        )
        .with_state(user_controller)
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(user_repo)
        .merge(tts_routes)
        .merge(user_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware)),
        )
}

/// Start the HTTP server on the configured address
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
