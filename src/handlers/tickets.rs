// src/handlers/tickets.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
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
    models::ticket::{Ticket, TicketFilter},
    services::ticket_service::NewTicket,
};

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketPayload {
    pub unit_id: Uuid,

    // Com produto informado, o chamado recebe o retrato da garantia
    pub product_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "invalid_length"))]
    #[schema(example = "INFILTRACAO")]
    pub ticket_type: Option<String>,

    #[validate(length(max = 5000, message = "max_length"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 50, message = "invalid_length"))]
    #[schema(example = "ABERTO")]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketPayload {
    #[validate(length(min = 1, max = 100, message = "invalid_length"))]
    pub ticket_type: Option<String>,

    #[validate(length(max = 5000, message = "max_length"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 50, message = "invalid_length"))]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketStatusPayload {
    #[validate(length(min = 1, max = 50, message = "required"))]
    #[schema(example = "FINALIZADO")]
    pub status: String,
}

// =============================================================================
//  HANDLERS
// =============================================================================

// GET /api/chamados
#[utoipa::path(
    get,
    path = "/api/chamados",
    tag = "Chamados",
    params(
        ("unitId" = Option<Uuid>, Query, description = "Filtra por unidade"),
        ("ticketType" = Option<String>, Query, description = "Filtra por tipo"),
        ("status" = Option<String>, Query, description = "Filtra por status")
    ),
    responses(
        (status = 200, description = "Chamados (mais recentes primeiro)", body = Vec<Ticket>)
    )
)]
pub async fn list_tickets(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<TicketFilter>,
) -> Result<impl IntoResponse, ApiError> {

    let mut conn = get_connection(&app_state)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let tickets = app_state.ticket_service
        .list(&mut *conn, &filter)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(tickets)))
}

// GET /api/chamados/{id}
#[utoipa::path(
    get,
    path = "/api/chamados/{id}",
    tag = "Chamados",
    params(("id" = Uuid, Path, description = "ID do Chamado")),
    responses(
        (status = 200, description = "Chamado encontrado", body = Ticket),
        (status = 404, description = "Chamado não encontrado")
    )
)]
pub async fn get_ticket(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {

    let mut conn = get_connection(&app_state)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let ticket = app_state.ticket_service
        .get(&mut *conn, id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ticket)))
}

// POST /api/chamados
#[utoipa::path(
    post,
    path = "/api/chamados",
    tag = "Chamados",
    request_body = CreateTicketPayload,
    responses(
        (status = 201, description = "Chamado aberto com validação de garantia", body = Ticket),
        (status = 422, description = "Unidade ou produto inexistente")
    )
)]
pub async fn create_ticket(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateTicketPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut conn = get_connection(&app_state)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let new_ticket = NewTicket {
        unit_id: payload.unit_id,
        product_id: payload.product_id,
        ticket_type: payload.ticket_type,
        description: payload.description,
        status: payload.status,
    };

    let ticket = app_state.ticket_service
        .create(&mut *conn, new_ticket, today())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

// PUT /api/chamados/{id}
#[utoipa::path(
    put,
    path = "/api/chamados/{id}",
    tag = "Chamados",
    request_body = UpdateTicketPayload,
    params(("id" = Uuid, Path, description = "ID do Chamado")),
    responses(
        (status = 200, description = "Chamado atualizado", body = Ticket),
        (status = 404, description = "Chamado não encontrado")
    )
)]
pub async fn update_ticket(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTicketPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut conn = get_connection(&app_state)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let ticket = app_state.ticket_service
        .update(
            &mut *conn,
            id,
            payload.ticket_type.as_deref(),
            payload.description.as_deref(),
            payload.status.as_deref(),
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ticket)))
}

// PATCH /api/chamados/{id}/status
#[utoipa::path(
    patch,
    path = "/api/chamados/{id}/status",
    tag = "Chamados",
    request_body = UpdateTicketStatusPayload,
    params(("id" = Uuid, Path, description = "ID do Chamado")),
    responses(
        (status = 200, description = "Status atualizado", body = Ticket),
        (status = 400, description = "Status é obrigatório"),
        (status = 404, description = "Chamado não encontrado")
    )
)]
pub async fn update_ticket_status(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTicketStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {

    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut conn = get_connection(&app_state)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let ticket = app_state.ticket_service
        .update_status(&mut *conn, id, &payload.status)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(ticket)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::handler::Handler;
    use serde_json::json;

    fn assert_handler<H, T>(_: H)
    where
        H: Handler<T, AppState>,
    {
    }

    #[test]
    fn ticket_handlers_fit_the_router() {
        assert_handler(list_tickets);
        assert_handler(get_ticket);
        assert_handler(create_ticket);
        assert_handler(update_ticket);
        assert_handler(update_ticket_status);
    }

    #[test]
    fn empty_status_is_rejected() {
        let payload: UpdateTicketStatusPayload = serde_json::from_value(json!({ "status": "" })).unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("status"));
    }

    #[test]
    fn ticket_without_product_is_valid() {
        let payload: CreateTicketPayload = serde_json::from_value(json!({
            "unitId": Uuid::nil(),
            "description": "Vazamento no banheiro"
        }))
        .unwrap();

        assert!(payload.product_id.is_none());
        assert!(payload.validate().is_ok());
    }
}
