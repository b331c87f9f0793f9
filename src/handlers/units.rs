// src/handlers/units.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::{get_connection, today},
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::warranty::WarrantyDetail,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddUnitProductPayload {
    pub product_id: Uuid,

    #[schema(example = "2024-03-10")]
    pub install_date: Option<NaiveDate>,

    #[validate(length(max = 2000, message = "max_length"))]
    pub notes: Option<String>,
}

// GET /api/unidades/{id}/produtos
#[utoipa::path(
    get,
    path = "/api/unidades/{id}/produtos",
    tag = "Unidades",
    params(("id" = Uuid, Path, description = "ID da Unidade")),
    responses(
        (status = 200, description = "Produtos da unidade com garantias calculadas", body = Vec<WarrantyDetail>),
        (status = 404, description = "Unidade não encontrada")
    )
)]
pub async fn list_unit_products(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(unit_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {

    let mut conn = get_connection(&app_state)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let products = app_state.warranty_service
        .list_for_unit(&mut *conn, unit_id, today())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(products)))
}

// POST /api/unidades/{id}/produtos
// Mesmo fluxo de POST /api/garantias, com a unidade vinda da rota.
#[utoipa::path(
    post,
    path = "/api/unidades/{id}/produtos",
    tag = "Unidades",
    request_body = AddUnitProductPayload,
    params(("id" = Uuid, Path, description = "ID da Unidade")),
    responses(
        (status = 201, description = "Produto vinculado à unidade", body = WarrantyDetail),
        (status = 404, description = "Unidade ou produto não encontrado"),
        (status = 409, description = "Produto já vinculado à unidade")
    )
)]
pub async fn add_unit_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(unit_id): Path<Uuid>,
    Json(payload): Json<AddUnitProductPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut conn = get_connection(&app_state)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let detail = app_state.warranty_service
        .create(
            &mut *conn,
            unit_id,
            payload.product_id,
            payload.install_date,
            payload.notes.as_deref(),
            today(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(detail)))
}
