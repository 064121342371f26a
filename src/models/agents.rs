// src/models/agents.rs

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

// Dados para cadastro de um novo agente
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Maria Souza")]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "maria@example.com")]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, message = "Mobile number is required"))]
    #[schema(example = "11987654321")]
    pub mobile_number: String,

    #[validate(length(min = 1, message = "Country code is required"))]
    #[schema(example = "+55")]
    pub country_code: String,
}

// Atualização parcial: só o que vier preenchido é alterado
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgentPayload {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    pub mobile_number: Option<String>,
    pub country_code: Option<String>,

    // Permite desativar o agente sem removê-lo do histórico
    pub is_active: Option<bool>,
}
