use std::sync::Arc;

use sea_orm::Database;
use tera::Tera;
use tracing::info;

use nippo_web::actions::registry;
use nippo_web::config::WebConfig;
use nippo_web::controller::scope::{ApplicationScope, attr};
use nippo_web::infra::session::{MemorySessionStore, RedisSessionStore, SessionBackend};
use nippo_web::router::build_router;
use nippo_web::state::AppState;
use nippo_web::usecase::employee::BootstrapAdminUseCase;

#[tokio::main]
async fn main() {
    nippo_core::tracing::init_tracing();

    let config = WebConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let sessions = match &config.redis_url {
        Some(url) => {
            let pool = deadpool_redis::Config::from_url(url)
                .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                .expect("failed to create Redis pool");
            info!("sessions stored in Redis");
            SessionBackend::Redis(RedisSessionStore {
                pool,
                ttl_secs: config.session_ttl.as_secs(),
            })
        }
        None => {
            info!("sessions stored in memory");
            SessionBackend::Memory(MemorySessionStore::new(config.session_ttl))
        }
    };

    let templates = Tera::new(&format!("{}/**/*.html", config.templates_dir))
        .expect("failed to load templates");

    let application = ApplicationScope::new()
        .with(attr::ROWS_PER_PAGE, &config.rows_per_page)
        .with(attr::SITE_TITLE, &config.site_title);

    let state = AppState {
        db,
        sessions,
        templates: Arc::new(templates),
        dispatcher: Arc::new(registry()),
        application: Arc::new(application),
        context_path: config.context_path,
    };

    if let Some(admin) = &config.initial_admin {
        let usecase = BootstrapAdminUseCase {
            repo: state.employee_repo(),
        };
        match usecase
            .execute(&admin.code, &admin.name, &admin.password)
            .await
            .expect("failed to create initial administrator")
        {
            Some(created) => info!(code = %created.code, "initial administrator created"),
            None => info!("employees exist, skipping initial administrator"),
        }
    }

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.web_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("web service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
