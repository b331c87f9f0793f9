// src/models/property.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Empreendimento ---
// A data de entrega das chaves é imutável depois de definida.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub id: Uuid,
    #[schema(example = "Residencial Jardim das Flores")]
    pub name: String,
    #[schema(example = "2023-01-15")]
    pub handover_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

// --- Unidade ---
// Quando presente, a data de instalação da unidade substitui a entrega das chaves.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: Uuid,
    pub building_id: Uuid,
    #[schema(example = "Apto 101")]
    pub number: Option<String>,
    pub install_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Unit {
    /// Rótulo exibido no dashboard: o número da unidade ou, na falta dele, o ID.
    pub fn label(&self) -> String {
        self.number.clone().unwrap_or_else(|| self.id.to_string())
    }
}
