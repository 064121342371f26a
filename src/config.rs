// src/config.rs

use std::path::PathBuf;
use std::{env, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{LeadRepository, UserRepository},
    services::{agents::AgentService, auth::AuthService, leads::LeadService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    // Diretório dos arquivos temporários de upload
    pub upload_dir: PathBuf,
    pub auth_service: AuthService,
    pub agent_service: AgentService,
    pub lead_service: LeadService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| env::temp_dir());

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let agent_service = AgentService::new(user_repo.clone());
        let lead_service = LeadService::new(db_pool.clone(), user_repo, lead_repo);

        Ok(Self {
            db_pool,
            upload_dir,
            auth_service,
            agent_service,
            lead_service,
        })
    }
}
