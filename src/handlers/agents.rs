// src/handlers/agents.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::agents::{CreateAgentPayload, UpdateAgentPayload},
};

// GET /api/agents
#[utoipa::path(
    get,
    path = "/api/agents",
    tag = "Agents",
    responses(
        (status = 200, description = "Lista de agentes (senha nunca é serializada)"),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Restrito a administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_all_agents(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let agents = app_state.agent_service.list_agents().await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "success": true, "agents": agents })),
    ))
}

// POST /api/agents
#[utoipa::path(
    post,
    path = "/api/agents",
    tag = "Agents",
    request_body = CreateAgentPayload,
    responses(
        (status = 201, description = "Agente criado"),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_agent(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateAgentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let agent = app_state.agent_service.create_agent(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Agent created successfully",
            "agent": agent,
        })),
    ))
}

// PUT /api/agents/{id}
#[utoipa::path(
    put,
    path = "/api/agents/{id}",
    tag = "Agents",
    request_body = UpdateAgentPayload,
    params(("id" = Uuid, Path, description = "ID do agente")),
    responses(
        (status = 200, description = "Agente atualizado"),
        (status = 404, description = "Agente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_agent(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAgentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let agent = app_state.agent_service.update_agent(id, payload).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Agent updated successfully",
            "agent": agent,
        })),
    ))
}

// DELETE /api/agents/{id}
#[utoipa::path(
    delete,
    path = "/api/agents/{id}",
    tag = "Agents",
    params(("id" = Uuid, Path, description = "ID do agente")),
    responses(
        (status = 200, description = "Agente removido"),
        (status = 404, description = "Agente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_agent(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.agent_service.delete_agent(id).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Agent deleted successfully",
        })),
    ))
}
