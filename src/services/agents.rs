// src/services/agents.rs

use bcrypt::hash;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        agents::{CreateAgentPayload, UpdateAgentPayload},
        auth::{User, UserRole},
    },
};

// Serviço fino sobre o repositório: regras do CRUD de agentes
#[derive(Clone)]
pub struct AgentService {
    user_repo: UserRepository,
}

impl AgentService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    pub async fn list_agents(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_agents().await
    }

    pub async fn create_agent(&self, payload: CreateAgentPayload) -> Result<User, AppError> {
        // Hashing fora do runtime async (bcrypt é CPU-bound)
        let password = payload.password;
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo
            .create_user(
                &payload.name,
                &payload.email,
                &hashed_password,
                Some(&payload.mobile_number),
                Some(&payload.country_code),
                UserRole::Agent,
            )
            .await
    }

    pub async fn update_agent(
        &self,
        id: Uuid,
        payload: UpdateAgentPayload,
    ) -> Result<User, AppError> {
        self.user_repo
            .update_agent(
                id,
                payload.name.as_deref(),
                payload.email.as_deref(),
                payload.mobile_number.as_deref(),
                payload.country_code.as_deref(),
                payload.is_active,
            )
            .await?
            .ok_or(AppError::AgentNotFound)
    }

    pub async fn delete_agent(&self, id: Uuid) -> Result<(), AppError> {
        if !self.user_repo.delete_agent(id).await? {
            return Err(AppError::AgentNotFound);
        }
        Ok(())
    }
}
