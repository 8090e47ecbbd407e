//! Glico Controle Backend
//!
//! REST backend for a single-user diabetes companion: onboarding quiz,
//! glucose log, daily checklist, reminders, statistics and bundled reading
//! material, persisted as one SQLite-backed document snapshot.

mod api;
mod config;
mod content;
mod db;
mod errors;
mod flow;
mod models;
mod search;
mod stats;
mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use content::Content;
use db::Repository;
use flow::Session;
use search::EbookSearch;
use store::DocumentStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub store: Arc<DocumentStore>,
    pub session: Arc<Session>,
    pub content: Arc<Content>,
    pub search: Arc<EbookSearch>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the database, hydrate the document and build the content index.
    pub async fn build(config: Config) -> Result<Self, errors::AppError> {
        let pool = db::init_database(&config.db_path).await?;
        let repo = Repository::new(pool);

        let store = DocumentStore::open(repo.clone(), config.snapshot_key.clone()).await?;

        let content = Content::load()?;
        let search = EbookSearch::open()?;
        search.rebuild(&content.ebook).await?;

        Ok(Self {
            repo: Arc::new(repo),
            store: Arc::new(store),
            session: Arc::new(Session::new()),
            content: Arc::new(content),
            search: Arc::new(search),
            config: Arc::new(config),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let (config, config_warnings) = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!("Starting Glico Controle Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.admin_email == config::DEFAULT_ADMIN_EMAIL {
        tracing::warn!("Using the default admin email (GLYCO_ADMIN_EMAIL not set)");
    }

    let bind_addr = config.bind_addr;
    let state = AppState::build(config).await?;

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Datastore
        .route("/datastore", get(api::get_datastore))
        .route("/datastore/revision", get(api::get_revision))
        // Screen flow
        .route("/session", get(api::get_session))
        .route("/session/screen", put(api::set_screen))
        .route("/session/tab", put(api::set_tab))
        .route("/quiz", get(api::get_quiz))
        .route("/quiz/draft", put(api::update_quiz_draft))
        .route("/quiz/toggle", post(api::toggle_quiz_option))
        .route("/quiz/next", post(api::quiz_next))
        .route("/quiz/back", post(api::quiz_back))
        .route("/payment/confirm", post(api::confirm_payment))
        // Dashboard
        .route("/home", get(api::get_home))
        .route("/glucose", get(api::list_glucose).post(api::add_glucose))
        .route("/tasks/today", get(api::get_today_tasks))
        .route("/tasks/{id}", put(api::update_task))
        .route("/reminders", get(api::list_reminders).post(api::create_reminder))
        .route("/records", get(api::get_records))
        .route("/records/export", get(api::export_records))
        .route("/summaries/{date}", get(api::get_daily_summary))
        .route("/profile", get(api::get_profile).put(api::update_profile))
        // Content
        .route("/ebook", get(api::get_ebook))
        .route("/ebook/chapters/{id}", get(api::get_chapter))
        .route("/ebook/pages/{page}", put(api::turn_page))
        .route("/ebook/search", get(api::search_ebook))
        .route("/meals", get(api::list_meal_days))
        .route("/meals/{day}", get(api::get_meal_day));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
