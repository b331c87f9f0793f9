// src/db/property_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::property::{Building, Unit},
};

// Leitura de empreendimentos e unidades. O cadastro em si é feito por outro fluxo.
#[derive(Clone, Default)]
pub struct PropertyRepository;

impl PropertyRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_unit<'e, E>(&self, executor: E, unit_id: Uuid) -> Result<Option<Unit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let unit = sqlx::query_as::<_, Unit>("SELECT * FROM units WHERE id = $1")
            .bind(unit_id)
            .fetch_optional(executor)
            .await?;
        Ok(unit)
    }

    pub async fn find_building<'e, E>(
        &self,
        executor: E,
        building_id: Uuid,
    ) -> Result<Option<Building>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let building = sqlx::query_as::<_, Building>("SELECT * FROM buildings WHERE id = $1")
            .bind(building_id)
            .fetch_optional(executor)
            .await?;
        Ok(building)
    }

    pub async fn list_units<'e, E>(&self, executor: E) -> Result<Vec<Unit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let units = sqlx::query_as::<_, Unit>("SELECT * FROM units ORDER BY created_at ASC")
            .fetch_all(executor)
            .await?;
        Ok(units)
    }

    pub async fn list_units_by_ids<'e, E>(&self, executor: E, ids: &[Uuid]) -> Result<Vec<Unit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let units = sqlx::query_as::<_, Unit>("SELECT * FROM units WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(executor)
            .await?;
        Ok(units)
    }

    pub async fn list_buildings<'e, E>(&self, executor: E) -> Result<Vec<Building>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let buildings = sqlx::query_as::<_, Building>("SELECT * FROM buildings")
            .fetch_all(executor)
            .await?;
        Ok(buildings)
    }

    pub async fn list_buildings_by_ids<'e, E>(
        &self,
        executor: E,
        ids: &[Uuid],
    ) -> Result<Vec<Building>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let buildings = sqlx::query_as::<_, Building>("SELECT * FROM buildings WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(executor)
            .await?;
        Ok(buildings)
    }
}
