// src/handlers/dashboard.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{
        db_utils::{get_connection, today},
        error::ApiError,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::dashboard::DashboardSummary,
};

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Garantias válidas/vencidas, chamados e próximos preventivos", body = DashboardSummary)
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {

    let mut conn = get_connection(&app_state)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let summary = app_state.dashboard_service
        .get_summary(&mut *conn, today())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(summary)))
}
