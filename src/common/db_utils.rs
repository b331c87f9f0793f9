use chrono::{NaiveDate, Utc};
use sqlx::{pool::PoolConnection, Postgres};

use crate::common::error::AppError;
use crate::config::AppState;

/// Adquire uma conexão da pool. Erro de pool vira AppError::DatabaseError.
pub(crate) async fn get_connection(app_state: &AppState) -> Result<PoolConnection<Postgres>, AppError> {
    let conn = app_state.db_pool.acquire().await?;
    Ok(conn)
}

/// "Hoje" em UTC. Único ponto que lê o relógio; o resto recebe a data por parâmetro.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
