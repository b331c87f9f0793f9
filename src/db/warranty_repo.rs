// src/db/warranty_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::warranty::UnitProductLink};

// Campos não enviados no PUT mantêm o valor atual.
const UPDATE_LINK_SQL: &str = r#"
    UPDATE unit_products
    SET install_date = COALESCE($2, install_date),
        notes = COALESCE($3, notes),
        updated_at = NOW()
    WHERE id = $1
    RETURNING *
"#;

// Tabela unit_products (vínculo unidade x produto com a data de instalação)
#[derive(Clone, Default)]
pub struct WarrantyRepository;

impl WarrantyRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Leitura
    // ---

    /// Filtros opcionais por unidade e/ou produto. Instalações mais recentes primeiro.
    pub async fn list<'e, E>(
        &self,
        executor: E,
        unit_id: Option<Uuid>,
        product_id: Option<Uuid>,
    ) -> Result<Vec<UnitProductLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let links = sqlx::query_as::<_, UnitProductLink>(
            r#"
            SELECT * FROM unit_products
            WHERE ($1::uuid IS NULL OR unit_id = $1)
              AND ($2::uuid IS NULL OR product_id = $2)
            ORDER BY install_date DESC NULLS LAST, created_at DESC
            "#,
        )
            .bind(unit_id)
            .bind(product_id)
            .fetch_all(executor)
            .await?;
        Ok(links)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<UnitProductLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let link = sqlx::query_as::<_, UnitProductLink>("SELECT * FROM unit_products WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(link)
    }

    pub async fn find_by_pair<'e, E>(
        &self,
        executor: E,
        unit_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<UnitProductLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let link = sqlx::query_as::<_, UnitProductLink>(
            "SELECT * FROM unit_products WHERE unit_id = $1 AND product_id = $2",
        )
            .bind(unit_id)
            .bind(product_id)
            .fetch_optional(executor)
            .await?;
        Ok(link)
    }

    // ---
    // Escrita
    // ---

    pub async fn create<'e, E>(
        &self,
        executor: E,
        unit_id: Uuid,
        product_id: Uuid,
        install_date: Option<NaiveDate>,
        notes: Option<&str>,
    ) -> Result<UnitProductLink, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, UnitProductLink>(
            r#"
            INSERT INTO unit_products (unit_id, product_id, install_date, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
            .bind(unit_id)
            .bind(product_id)
            .bind(install_date)
            .bind(notes)
            .fetch_one(executor)
            .await
            // A constraint uq_unit_products_pair cobre a corrida entre a checagem e o insert
            .map_err(|e| AppError::from_write(e, "unidade ou produto"))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        install_date: Option<NaiveDate>,
        notes: Option<&str>,
    ) -> Result<Option<UnitProductLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let link = sqlx::query_as::<_, UnitProductLink>(UPDATE_LINK_SQL)
            .bind(id)
            .bind(install_date)
            .bind(notes)
            .fetch_optional(executor)
            .await?;
        Ok(link)
    }

    /// Retorna `false` se nada foi removido.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM unit_products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
