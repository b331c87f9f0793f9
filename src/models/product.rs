// src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Produto (catálogo) ---
// Os prazos são em meses. O banco rejeita valores negativos.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Esquadria de alumínio")]
    pub name: String,
    #[schema(example = 12)]
    pub abnt_warranty_months: Option<i32>,
    #[schema(example = 24)]
    pub manufacturer_warranty_months: Option<i32>,
    #[schema(example = 6)]
    pub maintenance_interval_months: Option<i32>,
    pub created_at: DateTime<Utc>,
}

fn as_months(value: Option<i32>) -> Option<u32> {
    value.and_then(|m| u32::try_from(m).ok())
}

impl Product {
    pub fn abnt_months(&self) -> Option<u32> {
        as_months(self.abnt_warranty_months)
    }

    pub fn manufacturer_months(&self) -> Option<u32> {
        as_months(self.manufacturer_warranty_months)
    }

    pub fn maintenance_months(&self) -> Option<u32> {
        as_months(self.maintenance_interval_months)
    }
}
