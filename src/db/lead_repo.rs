// src/db/lead_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::leads::{AgentLeadCountRow, Lead, LeadDetailRow, LeadFilters, UploadBatch},
};

// Repositório de lotes e leads. As escritas recebem um Executor genérico
// para poderem rodar dentro da transação aberta pelo serviço de upload.
#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Cria o registro do lote. Precisa existir antes dos leads que o
    // referenciam.
    pub async fn create_batch<'e, E>(
        &self,
        executor: E,
        filename: &str,
        total_leads: i32,
        uploaded_by: Uuid,
    ) -> Result<UploadBatch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let batch = sqlx::query_as::<_, UploadBatch>(
            r#"
            INSERT INTO upload_batches (filename, total_leads, uploaded_by)
            VALUES ($1, $2, $3)
            RETURNING id, filename, total_leads, uploaded_by, created_at
            "#,
        )
        .bind(filename)
        .bind(total_leads)
        .bind(uploaded_by)
        .fetch_one(executor)
        .await?;

        Ok(batch)
    }

    // Uma linha do resumo embutido do lote (um agente, sua contagem, e a
    // posição que preserva a ordem do roster no momento do upload)
    pub async fn add_distribution_entry<'e, E>(
        &self,
        executor: E,
        batch_id: Uuid,
        agent: Uuid,
        assigned_count: i32,
        position: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO batch_distributions (batch_id, agent, assigned_count, position)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(batch_id)
        .bind(agent)
        .bind(assigned_count)
        .bind(position)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn create_lead<'e, E>(
        &self,
        executor: E,
        first_name: &str,
        phone: &str,
        notes: &str,
        assigned_to: Uuid,
        upload_batch: Uuid,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (first_name, phone, notes, assigned_to, upload_batch)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, first_name, phone, notes, assigned_to, upload_batch,
                      status, created_at, updated_at
            "#,
        )
        .bind(first_name)
        .bind(phone)
        .bind(notes)
        .bind(assigned_to)
        .bind(upload_batch)
        .fetch_one(executor)
        .await?;

        Ok(lead)
    }

    // Listagem com as referências já resolvidas (agente e lote), mais
    // recente primeiro. Filtros opcionais via `$n IS NULL OR ...`.
    pub async fn list_leads(&self, filters: &LeadFilters) -> Result<Vec<LeadDetailRow>, AppError> {
        let rows = sqlx::query_as::<_, LeadDetailRow>(
            r#"
            SELECT
                l.id, l.first_name, l.phone, l.notes, l.status, l.created_at,
                u.id AS agent_id, u.name AS agent_name, u.email AS agent_email,
                b.id AS batch_id, b.filename AS batch_filename,
                b.created_at AS batch_created_at
            FROM leads l
            JOIN users u ON u.id = l.assigned_to
            JOIN upload_batches b ON b.id = l.upload_batch
            WHERE ($1::uuid IS NULL OR l.assigned_to = $1)
              AND ($2::lead_status IS NULL OR l.status = $2)
              AND ($3::uuid IS NULL OR l.upload_batch = $3)
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(filters.agent_id)
        .bind(filters.status)
        .bind(filters.batch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // Contagem total de leads por agente (só agentes que têm leads)
    pub async fn count_leads_by_agent(&self) -> Result<Vec<AgentLeadCountRow>, AppError> {
        let rows = sqlx::query_as::<_, AgentLeadCountRow>(
            r#"
            SELECT
                u.id AS agent_id, u.name AS agent_name, u.email AS agent_email,
                COUNT(l.id) AS total_count
            FROM leads l
            JOIN users u ON u.id = l.assigned_to
            GROUP BY u.id, u.name, u.email, u.created_at
            ORDER BY u.created_at, u.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // Os N leads mais recentes de cada agente, via window function
    pub async fn recent_leads_per_agent(&self, limit: i64) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(
            r#"
            SELECT id, first_name, phone, notes, assigned_to, upload_batch,
                   status, created_at, updated_at
            FROM (
                SELECT l.*,
                       ROW_NUMBER() OVER (
                           PARTITION BY l.assigned_to
                           ORDER BY l.created_at DESC, l.id
                       ) AS rn
                FROM leads l
            ) ranked
            WHERE rn <= $1
            ORDER BY assigned_to, created_at DESC
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(leads)
    }

}
