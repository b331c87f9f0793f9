// src/models/dashboard.rs

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// 1. Indicadores (os cards do topo)
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_units: usize,
    pub valid_warranties: usize,   // Cada trilha conta separadamente
    pub expired_warranties: usize,
    pub expiring_soon: usize,      // Subconjunto das válidas
    pub open_tickets: usize,
    pub finished_tickets: usize,
    pub upcoming_maintenance: Vec<UpcomingMaintenance>,
}

// 2. Próximos preventivos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingMaintenance {
    pub unit_id: Uuid,
    pub product_id: Uuid,
    #[schema(example = "Apto 101")]
    pub unit: String,
    #[schema(example = "Aquecedor a gás")]
    pub product: String,
    #[schema(example = "2024-03-31")]
    pub due_date: NaiveDate,
    #[schema(example = 6)]
    pub interval_months: u32,
}
