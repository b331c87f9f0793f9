// src/models/warranty.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{
    product::Product,
    property::{Building, Unit},
};

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WarrantyStatus {
    #[serde(rename = "VALIDA")]
    Valid,
    #[serde(rename = "EXPIRADA")]
    Expired,
}

// --- Vínculo Unidade x Produto (unidade_produto_garantia) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitProductLink {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub product_id: Uuid,
    #[schema(example = "2024-03-10")]
    pub install_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Janelas de garantia calculadas para as duas trilhas (ABNT e fábrica).
/// Trilha sem prazo configurado fica sem data e sem status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyWindows {
    pub abnt_expires_on: Option<NaiveDate>,
    pub abnt_status: Option<WarrantyStatus>,
    pub manufacturer_expires_on: Option<NaiveDate>,
    pub manufacturer_status: Option<WarrantyStatus>,
}

// Resposta enriquecida (join manual + datas calculadas)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyDetail {
    #[serde(flatten)]
    pub link: UnitProductLink,
    pub unit: Option<Unit>,
    pub product: Option<Product>,
    pub building: Option<Building>,
    #[schema(example = "2023-01-15")]
    pub base_date: NaiveDate,
    #[serde(flatten)]
    pub windows: WarrantyWindows,
}
