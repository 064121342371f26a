// src/db/user_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{User, UserRole},
};

const USER_COLUMNS: &str = r#"
    id, name, email, password_hash, mobile_number, country_code,
    role, is_active, created_at, updated_at
"#;

// O repositório de usuários, responsável por todas as interações com a
// tabela 'users' (admins e agentes vivem na mesma tabela, separados pelo
// enum user_role).
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Roster de distribuição: só agentes ativos.
    // A ordem é fixada (created_at, id) para a distribuição ser reprodutível.
    pub async fn find_active_agents(&self) -> Result<Vec<User>, AppError> {
        let agents = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE role = 'agent' AND is_active = TRUE
            ORDER BY created_at, id
            "#
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(agents)
    }

    // Todos os agentes, ativos ou não (tela de gestão)
    pub async fn list_agents(&self) -> Result<Vec<User>, AppError> {
        let agents = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE role = 'agent'
            ORDER BY created_at, id
            "#
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(agents)
    }

    // Cria um novo usuário (agente ou admin de seed).
    // Com tratamento de erro específico para e-mails duplicados.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        mobile_number: Option<&str>,
        country_code: Option<&str>,
        role: UserRole,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, mobile_number, country_code, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(mobile_number)
        .bind(country_code)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(user)
    }

    // Atualização parcial via COALESCE: campos None ficam como estão.
    // Restrita a role = 'agent' para o admin não se editar por aqui.
    pub async fn update_agent(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        mobile_number: Option<&str>,
        country_code: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<User>, AppError> {
        let maybe_agent = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                name          = COALESCE($2, name),
                email         = COALESCE($3, email),
                mobile_number = COALESCE($4, mobile_number),
                country_code  = COALESCE($5, country_code),
                is_active     = COALESCE($6, is_active),
                updated_at    = NOW()
            WHERE id = $1 AND role = 'agent'
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(mobile_number)
        .bind(country_code)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(maybe_agent)
    }

    // Remove um agente; retorna false quando o ID não existe.
    // Agente que já recebeu leads não pode ser removido (a FK de
    // leads.assigned_to barra o DELETE): a saída é desativá-lo.
    pub async fn delete_agent(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'agent'")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::AgentHasLeads;
                    }
                }
                e.into()
            })?;
        Ok(result.rows_affected() > 0)
    }

    // Usado pelo seed de inicialização para saber se já existe um admin
    pub async fn any_admin_exists(&self) -> Result<bool, AppError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE role = 'admin')")
                .fetch_one(&self.pool)
                .await?;
        Ok(exists.0)
    }
}
