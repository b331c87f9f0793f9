// src/db/ticket_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::ticket::{Ticket, TicketFilter, TicketStatusCount},
};

// Campos ausentes mantêm o valor atual. warranty_check nunca é alterado.
const UPDATE_TICKET_SQL: &str = r#"
    UPDATE tickets
    SET ticket_type = COALESCE($2, ticket_type),
        description = COALESCE($3, description),
        status = COALESCE($4, status),
        updated_at = NOW()
    WHERE id = $1
    RETURNING *
"#;

#[derive(Clone, Default)]
pub struct TicketRepository;

impl TicketRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E, filter: &TicketFilter) -> Result<Vec<Ticket>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE ($1::uuid IS NULL OR unit_id = $1)
              AND ($2::text IS NULL OR ticket_type = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY opened_at DESC
            "#,
        )
            .bind(filter.unit_id)
            .bind(filter.ticket_type.as_deref())
            .bind(filter.status.as_deref())
            .fetch_all(executor)
            .await?;
        Ok(tickets)
    }

    /// Total de chamados por status (cards do dashboard).
    pub async fn count_by_status<'e, E>(&self, executor: E) -> Result<Vec<TicketStatusCount>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let counts = sqlx::query_as::<_, TicketStatusCount>(
            "SELECT status, COUNT(*) AS total FROM tickets GROUP BY status",
        )
            .fetch_all(executor)
            .await?;
        Ok(counts)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Ticket>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ticket = sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(ticket)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        unit_id: Uuid,
        product_id: Option<Uuid>,
        ticket_type: Option<&str>,
        description: Option<&str>,
        status: &str,
        warranty_check: Option<&str>,
    ) -> Result<Ticket, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets (unit_id, product_id, ticket_type, description, status, warranty_check)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
            .bind(unit_id)
            .bind(product_id)
            .bind(ticket_type)
            .bind(description)
            .bind(status)
            .bind(warranty_check)
            .fetch_one(executor)
            .await
            .map_err(|e| AppError::from_write(e, "unidade ou produto"))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        ticket_type: Option<&str>,
        description: Option<&str>,
        status: Option<&str>,
    ) -> Result<Option<Ticket>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ticket = sqlx::query_as::<_, Ticket>(UPDATE_TICKET_SQL)
            .bind(id)
            .bind(ticket_type)
            .bind(description)
            .bind(status)
            .fetch_optional(executor)
            .await?;
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_never_rewrites_warranty_snapshot() {
        assert!(!UPDATE_TICKET_SQL.contains("warranty_check"));
        assert!(UPDATE_TICKET_SQL.contains("status = COALESCE($4, status)"));
    }
}
