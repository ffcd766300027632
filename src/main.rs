//src/main.rs

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::{AppState, Config};
use crate::docs::ApiDoc;

/// Rotas da API (sem CORS/trace, que ficam no `main`).
pub fn app_router(app_state: AppState) -> Router {
    let tenant_routes = Router::new()
        .route(
            "/",
            get(handlers::tenants::list_tenants).post(handlers::tenants::create_tenant),
        )
        .route(
            "/{id}",
            patch(handlers::tenants::update_tenant).delete(handlers::tenants::delete_tenant),
        );

    let record_routes = Router::new()
        .route(
            "/",
            get(handlers::records::list_records).put(handlers::records::save_record),
        )
        .route("/recent", get(handlers::records::recent_records))
        .route("/previous", get(handlers::records::previous_record))
        .route("/export.csv", get(handlers::records::export_csv));

    let invoice_routes = Router::new()
        .route("/", get(handlers::invoice::get_invoice))
        .route("/pdf", get(handlers::invoice::get_invoice_pdf));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(handlers::health::health))
        .nest("/api/tenants", tenant_routes)
        .nest("/api/records", record_routes)
        .nest("/api/invoice", invoice_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = origin
        .parse()
        .with_context(|| format!("CORS_ORIGIN inválido: {origin}"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT_LANGUAGE]))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializa o logger (RUST_LOG, padrão "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new(&config)
        .await
        .context("Falha ao inicializar o estado da aplicação")?;

    if config.seed_tenants {
        db::seed::seed_tenants_if_empty(app_state.store.as_ref()).await?;
    }

    let app = app_router(app_state)
        .layer(cors_layer(&config.cors_origin)?)
        .layer(TraceLayer::new_for_http());

    // Inicia o servidor
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {addr}"))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}
