// src/handlers/leads.rs

use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::{error::AppError, upload::TempUpload},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::leads::{LeadFilters, LeadListResponse, LeadsByAgentResponse, UploadResponse},
};

// POST /api/leads/upload
//
// Máquina de estados de um upload: recebido -> parseado -> validado ->
// roster conferido -> distribuído -> persistido -> respondido. O arquivo
// temporário fica no guard `TempUpload`; o Drop dele apaga o arquivo em
// qualquer caminho de saída (sucesso, cada rejeição e erro inesperado).
#[utoipa::path(
    post,
    path = "/api/leads/upload",
    tag = "Leads",
    request_body(content_type = "multipart/form-data",
        description = "Campo 'file': planilha CSV, XLSX ou XLS com colunas FirstName, Phone e Notes"),
    responses(
        (status = 200, description = "Leads distribuídos entre os agentes ativos", body = UploadResponse),
        (status = 400, description = "Sem arquivo, sem dados válidos, linhas inválidas ou nenhum agente ativo"),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Restrito a administradores"),
        (status = 500, description = "Erro inesperado ao processar o arquivo")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_leads(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (original_name, bytes) = read_file_field(&mut multipart).await?;

    // Daqui em diante o arquivo existe em disco e o guard garante a limpeza
    let upload = TempUpload::persist(&app_state.upload_dir, &original_name, &bytes).await?;

    let summary = app_state
        .lead_service
        .process_upload(&upload, user.0.id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            success: true,
            message: "File uploaded and leads distributed successfully".to_owned(),
            summary,
        }),
    ))
}

// Procura o campo 'file' no multipart. Só a ausência do campo é "sem
// arquivo" (400); falha de leitura do corpo (malformado, acima do limite)
// é erro da classe inesperada, não "Please upload a file".
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| anyhow::anyhow!("Falha ao ler o multipart: {}", e))?
    {
        if field.name() == Some("file") {
            let original_name = field.file_name().unwrap_or("upload").to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| anyhow::anyhow!("Falha ao ler o multipart: {}", e))?;
            return Ok((original_name, bytes.to_vec()));
        }
    }

    Err(AppError::MissingFile)
}

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    params(LeadFilters),
    responses(
        (status = 200, description = "Leads com agente e lote resolvidos, mais recentes primeiro", body = LeadListResponse),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Restrito a administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_all_leads(
    State(app_state): State<AppState>,
    Query(filters): Query<LeadFilters>,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state.lead_service.list_leads(&filters).await?;

    Ok((
        StatusCode::OK,
        Json(LeadListResponse {
            success: true,
            leads,
        }),
    ))
}

// GET /api/leads/by-agent
#[utoipa::path(
    get,
    path = "/api/leads/by-agent",
    tag = "Leads",
    responses(
        (status = 200, description = "Por agente: contagem total e os 10 leads mais recentes", body = LeadsByAgentResponse),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Restrito a administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_leads_by_agent(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let data = app_state.lead_service.leads_by_agent().await?;

    Ok((
        StatusCode::OK,
        Json(LeadsByAgentResponse {
            success: true,
            data,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{Request, header};

    const BOUNDARY: &str = "XTESTBOUNDARY";

    async fn multipart_from(body: &str) -> Multipart {
        let request = Request::builder()
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body.to_owned()))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn file_field_is_extracted_with_its_original_name() {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"leads.csv\"\r\n\r\n\
             FirstName,Phone\r\nAna,11999990000\r\n\
             \r\n--{BOUNDARY}--\r\n"
        );
        let mut multipart = multipart_from(&body).await;

        let (name, bytes) = read_file_field(&mut multipart).await.unwrap();
        assert_eq!(name, "leads.csv");
        assert!(!bytes.is_empty());
    }

    #[tokio::test]
    async fn missing_file_field_is_rejected_as_missing_file() {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"other\"\r\n\r\n\
             valor\r\n\
             --{BOUNDARY}--\r\n"
        );
        let mut multipart = multipart_from(&body).await;

        let err = read_file_field(&mut multipart).await.unwrap_err();
        assert!(matches!(err, AppError::MissingFile));
    }

    #[tokio::test]
    async fn broken_multipart_body_is_not_reported_as_missing_file() {
        // Corpo truncado: a parte começa mas o boundary final nunca chega
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"leads.csv\"\r\n\r\n\
             FirstName,Phone"
        );
        let mut multipart = multipart_from(&body).await;

        let err = read_file_field(&mut multipart).await.unwrap_err();
        assert!(matches!(err, AppError::InternalServerError(_)));
    }
}
