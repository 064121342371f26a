// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Agents ---
        handlers::agents::get_all_agents,
        handlers::agents::create_agent,
        handlers::agents::update_agent,
        handlers::agents::delete_agent,

        // --- Leads ---
        handlers::leads::upload_leads,
        handlers::leads::get_all_leads,
        handlers::leads::get_leads_by_agent,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::PublicUser,
            models::auth::LoginPayload,
            models::auth::LoginResponse,

            // --- Agents ---
            models::agents::CreateAgentPayload,
            models::agents::UpdateAgentPayload,

            // --- Leads ---
            models::leads::LeadStatus,
            models::leads::Lead,
            models::leads::UploadBatch,
            models::leads::AgentRef,
            models::leads::BatchRef,
            models::leads::LeadView,
            models::leads::LeadListResponse,
            models::leads::LeadsByAgentEntry,
            models::leads::LeadsByAgentResponse,
            models::leads::AgentDistribution,
            models::leads::UploadSummary,
            models::leads::UploadResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Login do administrador"),
        (name = "Agents", description = "Gestão do roster de agentes"),
        (name = "Leads", description = "Upload, distribuição e listagem de leads")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
