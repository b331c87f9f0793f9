// src/models/ticket.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const STATUS_OPEN: &str = "ABERTO";
pub const STATUS_FINISHED: &str = "FINALIZADO";

/// Rótulo gravado no chamado no momento da abertura.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WarrantyCoverage {
    #[serde(rename = "DENTRO_DA_GARANTIA")]
    Covered,
    #[serde(rename = "FORA_DA_GARANTIA")]
    NotCovered,
}

impl WarrantyCoverage {
    pub fn from_eligibility(covered: bool) -> Self {
        if covered {
            WarrantyCoverage::Covered
        } else {
            WarrantyCoverage::NotCovered
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WarrantyCoverage::Covered => "DENTRO_DA_GARANTIA",
            WarrantyCoverage::NotCovered => "FORA_DA_GARANTIA",
        }
    }
}

// --- Chamado ---
// `warranty_check` é um retrato do momento da criação e não é recalculado.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub product_id: Option<Uuid>,
    #[schema(example = "INFILTRACAO")]
    pub ticket_type: Option<String>,
    pub description: Option<String>,
    #[schema(example = "ABERTO")]
    pub status: String,
    #[schema(example = "DENTRO_DA_GARANTIA")]
    pub warranty_check: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Filtros opcionais da listagem (query string)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketFilter {
    pub unit_id: Option<Uuid>,
    pub ticket_type: Option<String>,
    pub status: Option<String>,
}

// Linha do GROUP BY status
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TicketStatusCount {
    pub status: String,
    pub total: i64,
}
