// src/models/leads.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// Mapeia o CREATE TYPE lead_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Lost,
    Converted,
}

// Um lead persistido, vindo do banco
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub first_name: String,
    // Texto, nunca número: preserva zeros à esquerda e formatação
    pub phone: String,
    pub notes: String,
    pub assigned_to: Uuid,
    pub upload_batch: Uuid,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Uma linha válida do arquivo, ainda não persistida
#[derive(Debug, Clone, PartialEq)]
pub struct LeadRow {
    pub first_name: String,
    pub phone: String,
    pub notes: String,
}

// O lote de upload (imutável após a criação)
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadBatch {
    pub id: Uuid,
    pub filename: String,
    pub total_leads: i32,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}

// --- LISTAGEM ---

// Filtros da listagem de leads (query string)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LeadFilters {
    pub agent_id: Option<Uuid>,
    pub status: Option<LeadStatus>,
    pub batch_id: Option<Uuid>,
}

// Linha "achatada" do JOIN leads + users + upload_batches
#[derive(Debug, sqlx::FromRow)]
pub struct LeadDetailRow {
    pub id: Uuid,
    pub first_name: String,
    pub phone: String,
    pub notes: String,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub agent_id: Uuid,
    pub agent_name: String,
    pub agent_email: String,
    pub batch_id: Uuid,
    pub batch_filename: String,
    pub batch_created_at: DateTime<Utc>,
}

// Referência resolvida ao agente, aninhada na resposta
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchRef {
    pub id: Uuid,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

// Um lead como a listagem devolve: referências já resolvidas
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadView {
    pub id: Uuid,
    pub first_name: String,
    pub phone: String,
    pub notes: String,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub assigned_to: AgentRef,
    pub upload_batch: BatchRef,
}

impl From<LeadDetailRow> for LeadView {
    fn from(row: LeadDetailRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            phone: row.phone,
            notes: row.notes,
            status: row.status,
            created_at: row.created_at,
            assigned_to: AgentRef {
                id: row.agent_id,
                name: row.agent_name,
                email: row.agent_email,
            },
            upload_batch: BatchRef {
                id: row.batch_id,
                filename: row.batch_filename,
                created_at: row.batch_created_at,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeadListResponse {
    pub success: bool,
    pub leads: Vec<LeadView>,
}

// --- AGREGAÇÃO POR AGENTE (dashboard) ---

#[derive(Debug, sqlx::FromRow)]
pub struct AgentLeadCountRow {
    pub agent_id: Uuid,
    pub agent_name: String,
    pub agent_email: String,
    pub total_count: i64,
}

// Por agente: contagem total + os 10 leads mais recentes
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadsByAgentEntry {
    pub agent: AgentRef,
    pub total_count: i64,
    pub leads: Vec<Lead>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LeadsByAgentResponse {
    pub success: bool,
    pub data: Vec<LeadsByAgentEntry>,
}

// --- RESPOSTA DO UPLOAD ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentDistribution {
    pub agent_name: String,
    pub agent_email: String,
    pub assigned_count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub total_leads: usize,
    pub total_agents: usize,
    pub distribution: Vec<AgentDistribution>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub summary: UploadSummary,
}
