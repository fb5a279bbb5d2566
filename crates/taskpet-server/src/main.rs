use axum::{extract::FromRef, routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

mod adapters;
mod application;
mod jobs;
mod seed;
#[cfg(test)]
mod testing;

use adapters::{
    LinePushNotifier, OpenAiCommentGenerator, PgCharacterKindRepository, PgCharacterRepository,
    PgTaskEventRepository, PgTaskLedger, PgTaskRepository, PgTitleRepository, PgUserRepository,
};
use application::{CharacterService, CompletionService, TaskService, TitleUnlocker};
use jobs::{JobScheduler, SchedulerConfig};

/// Type aliases for application services with concrete adapter implementations
pub type AppCharacterService =
    CharacterService<PgCharacterRepository, PgCharacterKindRepository, PgUserRepository>;
pub type AppTaskService = TaskService<PgTaskRepository, PgTaskLedger>;
pub type AppTitleUnlocker =
    TitleUnlocker<PgTaskEventRepository, PgCharacterRepository, PgTitleRepository>;
pub type AppCompletionService = CompletionService<
    PgTaskLedger,
    PgTaskRepository,
    PgCharacterRepository,
    PgCharacterKindRepository,
    PgTaskEventRepository,
    PgTitleRepository,
    OpenAiCommentGenerator,
>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub character_service: Arc<AppCharacterService>,
    pub task_service: Arc<AppTaskService>,
    pub completion_service: Arc<AppCompletionService>,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> PgPool {
        state.pool.clone()
    }
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
        message: "Taskpet API is running - your pet is waiting".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("🥚 Taskpet API initializing...");

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("✅ Database migrations completed");

    // Repositories
    let character_repo = Arc::new(PgCharacterRepository::new(pool.clone()));
    let kind_repo = Arc::new(PgCharacterKindRepository::new(pool.clone()));
    let task_repo = Arc::new(PgTaskRepository::new(pool.clone()));
    let event_repo = Arc::new(PgTaskEventRepository::new(pool.clone()));
    let title_repo = Arc::new(PgTitleRepository::new(pool.clone()));
    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let ledger = Arc::new(PgTaskLedger::new(pool.clone()));

    // Master data
    seed::seed_character_kinds(kind_repo.clone())
        .await
        .expect("Failed to seed character kinds");
    seed::seed_titles(title_repo.clone())
        .await
        .expect("Failed to seed titles");

    // External services
    let openai_key = secrets.get("OPENAI_API_KEY").unwrap_or_default();
    if openai_key.is_empty() {
        tracing::warn!("⚠️  No OPENAI_API_KEY set - pet comments will be silent");
    }
    let comment_generator = Arc::new(OpenAiCommentGenerator::new(openai_key));

    let messaging_token = secrets.get("LINE_MESSAGING_TOKEN").unwrap_or_default();
    if messaging_token.is_empty() {
        tracing::warn!("⚠️  No LINE_MESSAGING_TOKEN set - push notifications will fail");
    }
    let notifier = Arc::new(LinePushNotifier::new(messaging_token));

    // Application services
    let title_unlocker = Arc::new(TitleUnlocker::new(
        event_repo.clone(),
        character_repo.clone(),
        title_repo.clone(),
    ));
    let character_service = Arc::new(CharacterService::new(
        character_repo.clone(),
        kind_repo.clone(),
        user_repo.clone(),
    ));
    let task_service = Arc::new(TaskService::new(task_repo.clone(), ledger.clone()));
    let completion_service = Arc::new(CompletionService::new(
        ledger,
        task_repo.clone(),
        character_repo.clone(),
        kind_repo,
        comment_generator,
        title_unlocker,
    ));

    // Daily batch scheduler
    let scheduler_config = secrets
        .get("JOB_INTERVAL_SECS")
        .and_then(|s| s.parse().ok())
        .map(|secs| SchedulerConfig {
            interval: std::time::Duration::from_secs(secs),
            ..SchedulerConfig::default()
        });

    JobScheduler::new(
        character_repo,
        task_repo,
        user_repo,
        notifier,
        scheduler_config,
    )
    .start();
    tracing::info!("📅 Job scheduler started");

    let state = AppState {
        pool,
        character_service,
        task_service,
        completion_service,
    };

    let router = Router::new()
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state);

    tracing::info!("✅ Taskpet API ready");

    Ok(router.into())
}
