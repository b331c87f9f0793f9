// src/handlers/warranty.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
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

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyQuery {
    pub unit_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWarrantyPayload {
    pub unit_id: Uuid,
    pub product_id: Uuid,

    // Sem data: herda a data de instalação da unidade
    #[schema(example = "2024-03-10")]
    pub install_date: Option<NaiveDate>,

    #[validate(length(max = 2000, message = "max_length"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWarrantyPayload {
    #[schema(example = "2024-03-10")]
    pub install_date: Option<NaiveDate>,

    #[validate(length(max = 2000, message = "max_length"))]
    pub notes: Option<String>,
}

// =============================================================================
//  HANDLERS
// =============================================================================

// GET /api/garantias
#[utoipa::path(
    get,
    path = "/api/garantias",
    tag = "Garantias",
    params(
        ("unitId" = Option<Uuid>, Query, description = "Filtra por unidade"),
        ("productId" = Option<Uuid>, Query, description = "Filtra por produto")
    ),
    responses(
        (status = 200, description = "Vínculos com datas de garantia calculadas", body = Vec<WarrantyDetail>)
    )
)]
pub async fn list_warranties(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<WarrantyQuery>,
) -> Result<impl IntoResponse, ApiError> {

    let mut conn = get_connection(&app_state)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let warranties = app_state.warranty_service
        .list(&mut *conn, query.unit_id, query.product_id, today())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(warranties)))
}

// GET /api/garantias/{id}
#[utoipa::path(
    get,
    path = "/api/garantias/{id}",
    tag = "Garantias",
    params(("id" = Uuid, Path, description = "ID do vínculo")),
    responses(
        (status = 200, description = "Garantia encontrada", body = WarrantyDetail),
        (status = 404, description = "Garantia não encontrada")
    )
)]
pub async fn get_warranty(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {

    let mut conn = get_connection(&app_state)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let warranty = app_state.warranty_service
        .get(&mut *conn, id, today())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(warranty)))
}

// POST /api/garantias
#[utoipa::path(
    post,
    path = "/api/garantias",
    tag = "Garantias",
    request_body = CreateWarrantyPayload,
    responses(
        (status = 201, description = "Garantia registrada", body = WarrantyDetail),
        (status = 404, description = "Unidade ou produto não encontrado"),
        (status = 409, description = "Já existe garantia para a unidade e produto")
    )
)]
pub async fn create_warranty(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateWarrantyPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut conn = get_connection(&app_state)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let warranty = app_state.warranty_service
        .create(
            &mut *conn,
            payload.unit_id,
            payload.product_id,
            payload.install_date,
            payload.notes.as_deref(),
            today(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(warranty)))
}

// PUT /api/garantias/{id}
#[utoipa::path(
    put,
    path = "/api/garantias/{id}",
    tag = "Garantias",
    request_body = UpdateWarrantyPayload,
    params(("id" = Uuid, Path, description = "ID do vínculo")),
    responses(
        (status = 200, description = "Garantia atualizada e recalculada", body = WarrantyDetail),
        (status = 404, description = "Garantia não encontrada")
    )
)]
pub async fn update_warranty(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWarrantyPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut conn = get_connection(&app_state)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let warranty = app_state.warranty_service
        .update(&mut *conn, id, payload.install_date, payload.notes.as_deref(), today())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(warranty)))
}

// DELETE /api/garantias/{id}
#[utoipa::path(
    delete,
    path = "/api/garantias/{id}",
    tag = "Garantias",
    params(("id" = Uuid, Path, description = "ID do vínculo")),
    responses(
        (status = 200, description = "Garantia removida"),
        (status = 404, description = "Garantia não encontrada")
    )
)]
pub async fn delete_warranty(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {

    let mut conn = get_connection(&app_state)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    app_state.warranty_service
        .delete(&mut *conn, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    let message = if locale.is_portuguese() { "Garantia removida com sucesso" } else { "Warranty removed" };
    Ok((StatusCode::OK, Json(json!({ "message": message }))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::handler::Handler;

    fn assert_handler<H, T>(_: H)
    where
        H: Handler<T, AppState>,
    {
    }

    #[test]
    fn warranty_handlers_fit_the_router() {
        assert_handler(list_warranties);
        assert_handler(get_warranty);
        assert_handler(create_warranty);
        assert_handler(update_warranty);
        assert_handler(delete_warranty);
    }

    #[test]
    fn create_payload_accepts_missing_install_date() {
        let payload: CreateWarrantyPayload = serde_json::from_value(json!({
            "unitId": Uuid::nil(),
            "productId": Uuid::nil(),
        }))
        .unwrap();

        assert!(payload.install_date.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn create_payload_rejects_huge_notes() {
        let payload = CreateWarrantyPayload {
            unit_id: Uuid::nil(),
            product_id: Uuid::nil(),
            install_date: None,
            notes: Some("x".repeat(2001)),
        };
        assert!(payload.validate().is_err());
    }
}
