// src/services/distribute.rs

use uuid::Uuid;

use crate::models::{auth::User, leads::LeadRow};

// O grupo de leads que coube a um agente
#[derive(Debug, Clone, PartialEq)]
pub struct AgentAssignment {
    pub agent_id: Uuid,
    pub leads: Vec<LeadRow>,
}

// Divide N leads entre M agentes, na ordem em que chegaram.
//
// Cada agente recebe floor(N/M) leads; os N % M primeiros agentes recebem
// um a mais. Os grupos são fatias consecutivas da entrada, então a
// concatenação dos grupos na ordem dos agentes reproduz a ordem original.
// Função pura: mesmo roster + mesmas linhas => mesma distribuição, sempre.
//
// Pré-condição: `agents` não pode ser vazio (o orquestrador rejeita o
// upload antes de chegar aqui quando não há agente ativo).
pub fn distribute_leads(leads: Vec<LeadRow>, agents: &[User]) -> Vec<AgentAssignment> {
    let total_leads = leads.len();
    let total_agents = agents.len();
    let per_agent = total_leads / total_agents;
    let remainder = total_leads % total_agents;

    let mut distribution = Vec::with_capacity(total_agents);
    let mut remaining = leads.into_iter();

    for (i, agent) in agents.iter().enumerate() {
        let count = per_agent + usize::from(i < remainder);
        distribution.push(AgentAssignment {
            agent_id: agent.id,
            leads: remaining.by_ref().take(count).collect(),
        });
    }

    distribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::UserRole;
    use chrono::Utc;

    fn agent(n: usize) -> User {
        User {
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
        }
    }

    fn rows(n: usize) -> Vec<LeadRow> {
        (0..n)
            .map(|i| LeadRow {
                first_name: format!("Lead {i}"),
                phone: format!("{i:011}"),
                notes: String::new(),
            })
            .collect()
    }

    fn sizes(distribution: &[AgentAssignment]) -> Vec<usize> {
        distribution.iter().map(|d| d.leads.len()).collect()
    }

    #[test]
    fn ten_leads_three_agents_split_4_3_3() {
        let agents: Vec<_> = (0..3).map(agent).collect();
        let distribution = distribute_leads(rows(10), &agents);

        assert_eq!(sizes(&distribution), [4, 3, 3]);
        // Grupos seguem a ordem do roster
        for (assignment, agent) in distribution.iter().zip(&agents) {
            assert_eq!(assignment.agent_id, agent.id);
        }
    }

    #[test]
    fn groups_cover_every_lead_exactly_once_in_order() {
        let agents: Vec<_> = (0..4).map(agent).collect();
        let input = rows(11);
        let distribution = distribute_leads(input.clone(), &agents);

        let concatenated: Vec<_> = distribution.into_iter().flat_map(|d| d.leads).collect();
        assert_eq!(concatenated, input);
    }

    #[test]
    fn group_sizes_differ_by_at_most_one() {
        for (n, m) in [(0, 1), (1, 5), (7, 3), (10, 3), (100, 7), (5, 5), (3, 8)] {
            let agents: Vec<_> = (0..m).map(agent).collect();
            let distribution = distribute_leads(rows(n), &agents);

            let sizes = sizes(&distribution);
            assert_eq!(distribution.len(), m, "n={n} m={m}");
            assert_eq!(sizes.iter().sum::<usize>(), n, "n={n} m={m}");

            let max = sizes.iter().max().unwrap();
            let min = sizes.iter().min().unwrap();
            assert!(max - min <= 1, "n={n} m={m} sizes={sizes:?}");
        }
    }

    #[test]
    fn distribution_is_deterministic() {
        let agents: Vec<_> = (0..3).map(agent).collect();
        let first = distribute_leads(rows(8), &agents);
        let second = distribute_leads(rows(8), &agents);
        assert_eq!(first, second);
    }

    #[test]
    fn fewer_leads_than_agents_leaves_trailing_agents_empty() {
        let agents: Vec<_> = (0..5).map(agent).collect();
        let distribution = distribute_leads(rows(2), &agents);

        assert_eq!(sizes(&distribution), [1, 1, 0, 0, 0]);
    }
}
