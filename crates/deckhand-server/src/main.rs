use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod auth;
mod config;
mod models;
mod routes;

use adapters::{OpenAiChatClient, PgConversationRepository, PgPresentationRepository};
use anyhow::Context;
use application::{ConversationService, DeckService};
use auth::ApiKey;
use config::ServerConfig;
use deckhand::ChatCompletionProvider;

/// Type aliases for application services with concrete repository implementations
pub type AppConversationService = ConversationService<PgConversationRepository>;
pub type AppDeckService = DeckService<PgPresentationRepository>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub conversation_service: Arc<AppConversationService>,
    pub deck_service: Arc<AppDeckService>,
    pub config: Arc<ServerConfig>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Deckhand API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("Deckhand API initializing...");

    // Local runs may keep settings in .env
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_lookup(|key| {
        secrets.get(key).or_else(|| std::env::var(key).ok())
    })
    .context("Invalid server configuration")?;

    let api_key = ApiKey::new(config.api_key.clone());
    if api_key.is_enabled() {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!("No DECKHAND_API_KEY set - authentication disabled");
    }

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let llm: Arc<dyn ChatCompletionProvider> = Arc::new(
        OpenAiChatClient::new(&config.openai).context("Failed to build chat completion client")?,
    );
    tracing::info!(
        "Chat completion provider: {} ({})",
        llm.provider_name(),
        llm.model_id()
    );

    // Initialize application services
    let conversation_repo = Arc::new(PgConversationRepository::new(pool.clone()));
    let presentation_repo = Arc::new(PgPresentationRepository::new(pool.clone()));
    let conversation_service = Arc::new(ConversationService::new(
        conversation_repo,
        llm.clone(),
        config.conversation.clone(),
    ));
    let deck_service = Arc::new(DeckService::new(
        presentation_repo,
        llm,
        config.deck.clone(),
    ));

    // Create application state
    let state = AppState {
        conversation_service,
        deck_service,
        config: Arc::new(config),
    };

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::conversation::router())
        .merge(routes::deck::router())
        .layer(middleware::from_fn_with_state(api_key, auth::auth_middleware));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    // Build router with shared state
    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state);

    tracing::info!("Swagger UI: /swagger-ui");
    tracing::info!("Deckhand API ready");

    Ok(router.into())
}
