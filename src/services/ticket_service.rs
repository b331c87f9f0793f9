// src/services/ticket_service.rs

use chrono::NaiveDate;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TicketRepository,
    models::ticket::{Ticket, TicketFilter, WarrantyCoverage, STATUS_OPEN},
    services::warranty_service::WarrantyService,
};

/// Dados de abertura de chamado já validados pelo handler.
#[derive(Debug, Clone, Default)]
pub struct NewTicket {
    pub unit_id: Uuid,
    pub product_id: Option<Uuid>,
    pub ticket_type: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

// Status em branco é rejeitado; os demais chegam sem espaços nas pontas.
fn normalize_status(status: Option<&str>) -> Result<Option<&str>, AppError> {
    match status.map(str::trim) {
        Some("") => Err(AppError::BadRequest("Status é obrigatório".into())),
        other => Ok(other),
    }
}

// Erro na validação não bloqueia a abertura do chamado.
fn coverage_or_not_covered(result: Result<WarrantyCoverage, AppError>) -> WarrantyCoverage {
    result.unwrap_or_else(|e| {
        tracing::warn!("Falha ao validar garantia, chamado segue como fora da garantia: {}", e);
        WarrantyCoverage::NotCovered
    })
}

#[derive(Clone)]
pub struct TicketService {
    repo: TicketRepository,
    warranty_service: WarrantyService,
}

impl TicketService {
    pub fn new(repo: TicketRepository, warranty_service: WarrantyService) -> Self {
        Self {
            repo,
            warranty_service,
        }
    }

    pub async fn list<'e, E>(&self, executor: E, filter: &TicketFilter) -> Result<Vec<Ticket>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list(executor, filter).await
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<Ticket, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Chamado".into()))
    }

    /// Abre o chamado e grava o retrato da garantia daquele momento.
    ///
    /// Falhas na validação da garantia não impedem a abertura: o chamado sai
    /// como FORA_DA_GARANTIA. Sem produto informado não há validação.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        new_ticket: NewTicket,
        today: NaiveDate,
    ) -> Result<Ticket, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let status = normalize_status(new_ticket.status.as_deref())?.unwrap_or(STATUS_OPEN);

        let mut tx = executor.begin().await?;

        let coverage = match new_ticket.product_id {
            Some(product_id) => {
                let result = self.warranty_service
                    .check_coverage(&mut *tx, new_ticket.unit_id, product_id, today)
                    .await;
                Some(coverage_or_not_covered(result))
            }
            None => None,
        };

        let ticket = self.repo
            .create(
                &mut *tx,
                new_ticket.unit_id,
                new_ticket.product_id,
                new_ticket.ticket_type.as_deref(),
                new_ticket.description.as_deref(),
                status,
                coverage.map(|c| c.as_str()),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            ticket_id = %ticket.id,
            warranty_check = ?ticket.warranty_check,
            "Chamado aberto"
        );
        Ok(ticket)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        ticket_type: Option<&str>,
        description: Option<&str>,
        status: Option<&str>,
    ) -> Result<Ticket, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let status = normalize_status(status)?;
        self.repo
            .update(executor, id, ticket_type, description, status)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Chamado".into()))
    }

    pub async fn update_status<'e, E>(&self, executor: E, id: Uuid, status: &str) -> Result<Ticket, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.update(executor, id, None, None, Some(status)).await
    }
}
