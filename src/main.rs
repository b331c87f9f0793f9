//src/main.rs

use axum::{
    routing::{get, patch},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Settings};
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // RUST_LOG sobrescreve o nível padrão
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let warranty_routes = Router::new()
        .route("/"
               ,get(handlers::warranty::list_warranties)
               .post(handlers::warranty::create_warranty)
        )
        .route("/{id}"
               ,get(handlers::warranty::get_warranty)
               .put(handlers::warranty::update_warranty)
               .delete(handlers::warranty::delete_warranty)
        );

    let unit_routes = Router::new()
        .route("/{id}/produtos"
               ,get(handlers::units::list_unit_products)
               .post(handlers::units::add_unit_product)
        );

    let ticket_routes = Router::new()
        .route("/"
               ,get(handlers::tickets::list_tickets)
               .post(handlers::tickets::create_ticket)
        )
        .route("/{id}"
               ,get(handlers::tickets::get_ticket)
               .put(handlers::tickets::update_ticket)
        )
        .route("/{id}/status", patch(handlers::tickets::update_ticket_status));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .nest("/api/garantias", warranty_routes)
        .nest("/api/unidades", unit_routes)
        .nest("/api/chamados", ticket_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    let listener = TcpListener::bind(&settings.app_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
