// src/main.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
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

use crate::config::AppState;
use crate::middleware::auth::{admin_guard, auth_guard};

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Garante um admin para o primeiro login (credenciais via ambiente)
    let admin_name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin User".to_owned());
    let admin_email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_owned());
    let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_owned());
    app_state
        .auth_service
        .ensure_admin(&admin_name, &admin_email, &admin_password)
        .await
        .expect("Falha ao criar o usuário admin inicial.");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // CRUD de agentes (admin apenas)
    let agent_routes = Router::new()
        .route(
            "/",
            get(handlers::agents::get_all_agents).post(handlers::agents::create_agent),
        )
        .route(
            "/{id}",
            put(handlers::agents::update_agent).delete(handlers::agents::delete_agent),
        );

    // Upload e listagem de leads (admin apenas).
    // Limite de 16 MB para a planilha enviada.
    let lead_routes = Router::new()
        .route(
            "/upload",
            post(handlers::leads::upload_leads).layer(DefaultBodyLimit::max(16 * 1024 * 1024)),
        )
        .route("/", get(handlers::leads::get_all_leads))
        .route("/by-agent", get(handlers::leads::get_leads_by_agent));

    // Guardas: primeiro o token, depois o papel
    let admin_only = Router::new()
        .nest("/api/agents", agent_routes)
        .nest("/api/leads", lead_routes)
        .layer(axum_middleware::from_fn(admin_guard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(admin_only)
        .with_state(app_state);

    // Inicia o servidor
    let port = std::env::var("PORT").unwrap_or_else(|_| "5000".to_owned());
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
