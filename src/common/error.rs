// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// O contrato do frontend é sempre {"success": false, "message": ...}.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Rejeições do upload de leads (400) ---
    #[error("Nenhum arquivo recebido")]
    MissingFile,

    #[error("Arquivo sem dados válidos")]
    NoValidData,

    #[error("{0} linha(s) sem FirstName ou Phone")]
    InvalidRows(usize),

    #[error("Nenhum agente ativo")]
    NoActiveAgents,

    // --- Autenticação / autorização ---
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso restrito a administradores")]
    AdminOnly,

    // --- CRUD de agentes ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Agente não encontrado")]
    AgentNotFound,

    #[error("Agente possui leads atribuídos")]
    AgentHasLeads,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Leitura do CSV enviado (erro de I/O ou CSV malformado)
    #[error("Erro ao ler o arquivo: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Erro de I/O: {0}")]
    IoError(#[from] std::io::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "success": false,
                    "message": "One or more fields are invalid",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Rejeição de upload com contagem de linhas inválidas no corpo.
            AppError::InvalidRows(count) => {
                let body = Json(json!({
                    "success": false,
                    "message": "Invalid data format. Ensure all rows have FirstName and Phone fields.",
                    "invalidRows": count,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::MissingFile => (StatusCode::BAD_REQUEST, "Please upload a file"),
            AppError::NoValidData => {
                (StatusCode::BAD_REQUEST, "No valid data found in the file")
            }
            AppError::NoActiveAgents => (
                StatusCode::BAD_REQUEST,
                "No active agents found. Please add agents before uploading leads.",
            ),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid email or password"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Please authenticate"),
            AppError::AdminOnly => (
                StatusCode::FORBIDDEN,
                "Access denied. Admin privileges required.",
            ),
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Agent with this email already exists")
            }
            AppError::AgentNotFound => (StatusCode::NOT_FOUND, "Agent not found"),
            AppError::AgentHasLeads => (
                StatusCode::CONFLICT,
                "Agent has leads assigned. Deactivate the agent instead of deleting it.",
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),

            // Todos os outros erros (banco, I/O, CSV, etc.) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error processing request")
            }
        };

        // Resposta padrão para erros que só têm uma mensagem.
        let body = Json(json!({ "success": false, "message": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn invalid_rows_rejection_carries_the_count_in_the_body() {
        let response = AppError::InvalidRows(3).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], Value::Bool(false));
        assert_eq!(body["invalidRows"], Value::from(3));
        assert!(body["message"].as_str().unwrap().contains("FirstName"));
    }

    #[tokio::test]
    async fn deleting_an_agent_with_leads_is_a_conflict_not_a_500() {
        let response = AppError::AgentHasLeads.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["success"], Value::Bool(false));
        assert!(body["message"].as_str().unwrap().contains("Deactivate"));
    }

    #[test]
    fn upload_rejections_map_to_400() {
        for err in [
            AppError::MissingFile,
            AppError::NoValidData,
            AppError::NoActiveAgents,
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn auth_errors_map_to_401_and_403() {
        assert_eq!(
            AppError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::AdminOnly.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
