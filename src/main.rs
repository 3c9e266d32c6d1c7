use rap_battle_backend::controllers::{tts::TtsController, user::UserController};
use rap_battle_backend::domain::auth::JwtManager;
use rap_battle_backend::domain::tts::{
    character::{RandomVoicePicker, VoicePicker},
    ProviderInstanceCache, TtsService, TtsServiceApi,
};
use rap_battle_backend::domain::user::UserService;
use rap_battle_backend::infrastructure::config::{Config, LogFormat};
use rap_battle_backend::infrastructure::db::{check_connection, create_pool};
use rap_battle_backend::infrastructure::http::{build_router, start_http_server};
use rap_battle_backend::infrastructure::repositories::{
    PostgresUserRepository, UserRepository, VendorProviderFactory,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting Rap Battle Backend on {}:{}",
        config.host,
        config.port
    );

    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    tracing::info!(
        system_vendors = ?config.tts.system_credentials.configured_vendors(),
        fallback_order = ?config.tts.fallback_order,
        default_service = %config.tts.default_service,
        unknown_user_policy = ?config.tts.unknown_user_policy,
        vendor_timeout_secs = config.tts.vendor_timeout_secs,
        "TTS configuration loaded"
    );
    if config.tts.system_credentials.configured_vendors().is_empty() {
        tracing::warn!("No system TTS credentials configured; only user keys can produce audio");
    }

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Repositories
    let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));

    // 2. Provider clients, built lazily per credential
    let picker: Arc<dyn VoicePicker> = match config.tts.voice_seed {
        Some(seed) => Arc::new(RandomVoicePicker::seeded(seed)),
        None => Arc::new(RandomVoicePicker::from_os_rng()),
    };
    let factory = Arc::new(VendorProviderFactory::new(
        config.tts.endpoints.clone(),
        config.tts.vendor_timeout(),
        picker,
    ));
    let instances = Arc::new(ProviderInstanceCache::new(factory));

    // 3. Services
    let tts_service: Arc<dyn TtsServiceApi> = Arc::new(TtsService::new(
        user_repo.clone(),
        instances,
        config.tts.clone(),
    ));
    let user_service = Arc::new(UserService::new(
        user_repo.clone(),
        tts_service.clone(),
        config.tts.default_service,
    ));

    // 4. Controllers
    let tts_controller = Arc::new(TtsController::new(tts_service));
    let user_controller = Arc::new(UserController::new(user_service));
    let jwt_manager = Arc::new(JwtManager::new(config.jwt_secret.clone()));

    let app = build_router(user_repo, jwt_manager, tts_controller, user_controller);
    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.default_log_filter().into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
