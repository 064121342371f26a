// src/services/leads.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, upload::TempUpload},
    db::{LeadRepository, UserRepository},
    models::{
        auth::User,
        leads::{
            AgentDistribution, AgentRef, LeadFilters, LeadRow, LeadView, LeadsByAgentEntry,
            UploadSummary,
        },
    },
    services::{
        distribute::{AgentAssignment, distribute_leads},
        parse::{RawRow, parse_upload},
    },
};

#[derive(Clone)]
pub struct LeadService {
    pool: PgPool,
    user_repo: UserRepository,
    lead_repo: LeadRepository,
}

impl LeadService {
    pub fn new(pool: PgPool, user_repo: UserRepository, lead_repo: LeadRepository) -> Self {
        Self {
            pool,
            user_repo,
            lead_repo,
        }
    }

    // O fluxo inteiro de um upload: parse -> validação -> roster ->
    // distribuição -> persistência -> resumo. O arquivo temporário pertence
    // ao handler (guard); aqui só lemos o caminho.
    //
    // Lote, resumo e leads são gravados numa transação só: ou o upload
    // inteiro entra, ou nada entra.
    pub async fn process_upload(
        &self,
        upload: &TempUpload,
        uploaded_by: Uuid,
    ) -> Result<UploadSummary, AppError> {
        // Parse em thread de bloqueio: leitura de arquivo é I/O síncrono
        let path = upload.path().to_path_buf();
        let extension = upload.extension().to_owned();
        let raw_rows = tokio::task::spawn_blocking(move || parse_upload(&path, &extension))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de parse: {}", e))??;

        if raw_rows.is_empty() {
            return Err(AppError::NoValidData);
        }

        // Tudo ou nada: uma linha inválida rejeita o arquivo inteiro
        let (rows, invalid_count) = partition_rows(raw_rows);
        if invalid_count > 0 {
            return Err(AppError::InvalidRows(invalid_count));
        }

        let agents = self.user_repo.find_active_agents().await?;
        if agents.is_empty() {
            return Err(AppError::NoActiveAgents);
        }

        let total_leads = rows.len();
        let distribution = distribute_leads(rows, &agents);

        let mut tx = self.pool.begin().await?;

        // O lote precisa existir antes dos leads que o referenciam
        let batch = self
            .lead_repo
            .create_batch(
                &mut *tx,
                upload.original_name(),
                total_leads as i32,
                uploaded_by,
            )
            .await?;

        // Resumo embutido: um registro por agente, mesmo com contagem zero
        for (position, assignment) in distribution.iter().enumerate() {
            self.lead_repo
                .add_distribution_entry(
                    &mut *tx,
                    batch.id,
                    assignment.agent_id,
                    assignment.leads.len() as i32,
                    position as i32,
                )
                .await?;
        }

        for assignment in &distribution {
            for lead in &assignment.leads {
                self.lead_repo
                    .create_lead(
                        &mut *tx,
                        &lead.first_name,
                        &lead.phone,
                        &lead.notes,
                        assignment.agent_id,
                        batch.id,
                    )
                    .await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            "📥 Lote {} persistido: {} leads para {} agentes",
            batch.id,
            total_leads,
            agents.len()
        );

        Ok(build_summary(&agents, &distribution, total_leads))
    }

    pub async fn list_leads(&self, filters: &LeadFilters) -> Result<Vec<LeadView>, AppError> {
        let rows = self.lead_repo.list_leads(filters).await?;
        Ok(rows.into_iter().map(LeadView::from).collect())
    }

    // Agregação do dashboard: por agente, contagem total + 10 leads mais
    // recentes.
    pub async fn leads_by_agent(&self) -> Result<Vec<LeadsByAgentEntry>, AppError> {
        let counts = self.lead_repo.count_leads_by_agent().await?;
        let recent = self.lead_repo.recent_leads_per_agent(10).await?;

        let mut by_agent: HashMap<Uuid, Vec<_>> = HashMap::new();
        for lead in recent {
            by_agent.entry(lead.assigned_to).or_default().push(lead);
        }

        Ok(counts
            .into_iter()
            .map(|row| LeadsByAgentEntry {
                leads: by_agent.remove(&row.agent_id).unwrap_or_default(),
                agent: AgentRef {
                    id: row.agent_id,
                    name: row.agent_name,
                    email: row.agent_email,
                },
                total_count: row.total_count,
            })
            .collect())
    }
}

// Particiona as linhas cruas: válidas viram LeadRow, inválidas só contam.
// Uma linha é inválida quando FirstName ou Phone está ausente ou vazio;
// Notes é sempre opcional e vira string vazia quando falta.
fn partition_rows(raw_rows: Vec<RawRow>) -> (Vec<LeadRow>, usize) {
    let mut valid = Vec::with_capacity(raw_rows.len());
    let mut invalid_count = 0;

    for row in raw_rows {
        let first_name = row.get("FirstName").map(String::as_str).unwrap_or("");
        let phone = row.get("Phone").map(String::as_str).unwrap_or("");

        if first_name.is_empty() || phone.is_empty() {
            invalid_count += 1;
            continue;
        }

        valid.push(LeadRow {
            first_name: first_name.to_owned(),
            phone: phone.to_owned(),
            notes: row.get("Notes").cloned().unwrap_or_default(),
        });
    }

    (valid, invalid_count)
}

// Resumo da resposta: nome/e-mail/contagem por agente, na ordem do roster
fn build_summary(
    agents: &[User],
    distribution: &[AgentAssignment],
    total_leads: usize,
) -> UploadSummary {
    let entries = agents
        .iter()
        .zip(distribution)
        .map(|(agent, assignment)| AgentDistribution {
            agent_name: agent.name.clone(),
            agent_email: agent.email.clone(),
            assigned_count: assignment.leads.len(),
        })
        .collect();

    UploadSummary {
        total_leads,
        total_agents: agents.len(),
        distribution: entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::UserRole;
    use chrono::Utc;

    fn raw_row(first_name: &str, phone: &str, notes: Option<&str>) -> RawRow {
        let mut row = RawRow::new();
        if !first_name.is_empty() {
            row.insert("FirstName".into(), first_name.into());
        }
        row.insert("Phone".into(), phone.into());
        if let Some(notes) = notes {
            row.insert("Notes".into(), notes.into());
        }
        row
    }

    #[test]
    fn rows_missing_required_fields_are_counted_invalid() {
        let rows = vec![
            raw_row("Ana", "11999990000", Some("VIP")),
            raw_row("", "21888880000", None),  // sem FirstName
            raw_row("Bruno", "", None),        // Phone vazio
            raw_row("Clara", "31777770000", None),
        ];

        let (valid, invalid) = partition_rows(rows);
        assert_eq!(invalid, 2);
        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0].first_name, "Ana");
        assert_eq!(valid[1].first_name, "Clara");
    }

    #[test]
    fn notes_defaults_to_empty_string() {
        let (valid, invalid) = partition_rows(vec![raw_row("Ana", "11999990000", None)]);
        assert_eq!(invalid, 0);
        assert_eq!(valid[0].notes, "");
    }

    #[test]
    fn valid_rows_keep_their_order() {
        let rows = vec![
            raw_row("A", "1", None),
            raw_row("B", "2", None),
            raw_row("C", "3", None),
        ];

        let (valid, _) = partition_rows(rows);
        let names: Vec<_> = valid.iter().map(|r| r.first_name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn summary_follows_roster_order_and_counts() {
        let agents: Vec<User> = (0..3)
            .map(|n| User {
                id: Uuid::new_v4(),
                name: format!("Agent {n}"),
                email: format!("agent{n}@example.com"),
                password_hash: "x".into(),
                mobile_number: None,
                country_code: None,
                role: UserRole::Agent,
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .collect();

        let rows: Vec<LeadRow> = (0..10)
            .map(|i| LeadRow {
                first_name: format!("Lead {i}"),
                phone: format!("{i}"),
                notes: String::new(),
            })
            .collect();

        let distribution = distribute_leads(rows, &agents);
        let summary = build_summary(&agents, &distribution, 10);

        assert_eq!(summary.total_leads, 10);
        assert_eq!(summary.total_agents, 3);

        let counts: Vec<_> = summary
            .distribution
            .iter()
            .map(|d| d.assigned_count)
            .collect();
        assert_eq!(counts, [4, 3, 3]);
        assert_eq!(counts.iter().sum::<usize>(), 10);
        assert_eq!(summary.distribution[0].agent_name, "Agent 0");
    }
}
