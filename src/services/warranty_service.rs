// src/services/warranty_service.rs

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{Acquire, Executor, PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductRepository, PropertyRepository, WarrantyRepository},
    models::{
        product::Product,
        property::{Building, Unit},
        ticket::WarrantyCoverage,
        warranty::{UnitProductLink, WarrantyDetail, WarrantyWindows},
    },
    services::warranty,
};

/// Monta a resposta enriquecida de um vínculo. Produto ausente deixa as janelas vazias.
pub fn enrich(
    link: UnitProductLink,
    unit: Option<&Unit>,
    building: Option<&Building>,
    product: Option<&Product>,
    today: NaiveDate,
) -> WarrantyDetail {
    let base_date = warranty::base_date_for(Some(&link), unit, building, today);
    let windows = product
        .map(|p| warranty::windows_for_product(base_date, p, today))
        .unwrap_or_else(WarrantyWindows::default);

    WarrantyDetail {
        link,
        unit: unit.cloned(),
        product: product.cloned(),
        building: building.cloned(),
        base_date,
        windows,
    }
}

fn unique_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[derive(Clone)]
pub struct WarrantyService {
    warranty_repo: WarrantyRepository,
    property_repo: PropertyRepository,
    product_repo: ProductRepository,
}

impl WarrantyService {
    pub fn new(
        warranty_repo: WarrantyRepository,
        property_repo: PropertyRepository,
        product_repo: ProductRepository,
    ) -> Self {
        Self {
            warranty_repo,
            property_repo,
            product_repo,
        }
    }

    // Join manual para um lote de vínculos (unidades, produtos e empreendimentos em 3 queries)
    async fn enrich_all(
        &self,
        conn: &mut PgConnection,
        links: Vec<UnitProductLink>,
        today: NaiveDate,
    ) -> Result<Vec<WarrantyDetail>, AppError> {
        let unit_ids = unique_ids(links.iter().map(|l| l.unit_id));
        let product_ids = unique_ids(links.iter().map(|l| l.product_id));

        let units: HashMap<Uuid, Unit> = self.property_repo
            .list_units_by_ids(&mut *conn, &unit_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let products: HashMap<Uuid, Product> = self.product_repo
            .list_by_ids(&mut *conn, &product_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let building_ids = unique_ids(units.values().map(|u| u.building_id));
        let buildings: HashMap<Uuid, Building> = self.property_repo
            .list_buildings_by_ids(&mut *conn, &building_ids)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        let details = links
            .into_iter()
            .map(|link| {
                let unit = units.get(&link.unit_id);
                let building = unit.and_then(|u| buildings.get(&u.building_id));
                let product = products.get(&link.product_id);
                enrich(link, unit, building, product, today)
            })
            .collect();

        Ok(details)
    }

    async fn enrich_one(
        &self,
        conn: &mut PgConnection,
        link: UnitProductLink,
        today: NaiveDate,
    ) -> Result<WarrantyDetail, AppError> {
        let mut details = self.enrich_all(conn, vec![link], today).await?;
        details
            .pop()
            .ok_or_else(|| AppError::InternalServerError(anyhow::anyhow!("vínculo perdido no enriquecimento")))
    }

    // --- LISTAGEM ---

    pub async fn list<'e, E>(
        &self,
        executor: E,
        unit_id: Option<Uuid>,
        product_id: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<Vec<WarrantyDetail>, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        // Snapshot consistente entre o vínculo e as entidades relacionadas
        let mut tx = executor.begin().await?;

        let links = self.warranty_repo.list(&mut *tx, unit_id, product_id).await?;
        let details = self.enrich_all(&mut *tx, links, today).await?;

        tx.commit().await?;
        Ok(details)
    }

    pub async fn list_for_unit<'e, E>(
        &self,
        executor: E,
        unit_id: Uuid,
        today: NaiveDate,
    ) -> Result<Vec<WarrantyDetail>, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.property_repo
            .find_unit(&mut *tx, unit_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Unidade".into()))?;

        let links = self.warranty_repo.list(&mut *tx, Some(unit_id), None).await?;
        let details = self.enrich_all(&mut *tx, links, today).await?;

        tx.commit().await?;
        Ok(details)
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid, today: NaiveDate) -> Result<WarrantyDetail, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let link = self.warranty_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Garantia".into()))?;
        let detail = self.enrich_one(&mut *tx, link, today).await?;

        tx.commit().await?;
        Ok(detail)
    }

    // --- CRIAÇÃO ---

    /// Cria o vínculo unidade x produto. Sem data informada, herda a data de
    /// instalação da unidade (que pode também estar vazia).
    pub async fn create<'e, E>(
        &self,
        executor: E,
        unit_id: Uuid,
        product_id: Uuid,
        install_date: Option<NaiveDate>,
        notes: Option<&str>,
        today: NaiveDate,
    ) -> Result<WarrantyDetail, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let unit = self.property_repo
            .find_unit(&mut *tx, unit_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Unidade".into()))?;

        self.product_repo
            .find_by_id(&mut *tx, product_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Produto".into()))?;

        if self.warranty_repo.find_by_pair(&mut *tx, unit_id, product_id).await?.is_some() {
            return Err(AppError::WarrantyAlreadyExists);
        }

        let stored_date = install_date.or(unit.install_date);
        let link = self.warranty_repo
            .create(&mut *tx, unit_id, product_id, stored_date, notes)
            .await?;

        let detail = self.enrich_one(&mut *tx, link, today).await?;
        tx.commit().await?;

        tracing::info!(
            link_id = %detail.link.id,
            unit_id = %unit_id,
            product_id = %product_id,
            "Garantia registrada"
        );
        Ok(detail)
    }

    // --- ATUALIZAÇÃO / REMOÇÃO ---

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        install_date: Option<NaiveDate>,
        notes: Option<&str>,
        today: NaiveDate,
    ) -> Result<WarrantyDetail, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let link = self.warranty_repo
            .update(&mut *tx, id, install_date, notes)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Garantia".into()))?;
        let detail = self.enrich_one(&mut *tx, link, today).await?;

        tx.commit().await?;
        Ok(detail)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !self.warranty_repo.delete(executor, id).await? {
            return Err(AppError::ResourceNotFound("Garantia".into()));
        }
        tracing::info!(link_id = %id, "Garantia removida");
        Ok(())
    }

    // --- ELEGIBILIDADE ---

    /// Unidade, empreendimento ou produto inexistente resulta em FORA_DA_GARANTIA.
    /// Vínculo ausente não é erro: a data base cai para unidade/empreendimento.
    pub async fn check_coverage<'e, E>(
        &self,
        executor: E,
        unit_id: Uuid,
        product_id: Uuid,
        today: NaiveDate,
    ) -> Result<WarrantyCoverage, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let unit = self.property_repo.find_unit(&mut *tx, unit_id).await?;
        let building = match &unit {
            Some(u) => self.property_repo.find_building(&mut *tx, u.building_id).await?,
            None => None,
        };
        let product = self.product_repo.find_by_id(&mut *tx, product_id).await?;
        let link = self.warranty_repo.find_by_pair(&mut *tx, unit_id, product_id).await?;

        tx.commit().await?;

        match (&unit, &building, &product) {
            (None, _, _) => tracing::warn!(%unit_id, "Unidade não encontrada na validação de garantia"),
            (Some(u), None, _) => tracing::warn!(building_id = %u.building_id, "Empreendimento não encontrado na validação de garantia"),
            (_, _, None) => tracing::warn!(%product_id, "Produto não encontrado na validação de garantia"),
            _ => {}
        }

        Ok(warranty::coverage_for(
            unit.as_ref(),
            building.as_ref(),
            product.as_ref(),
            link.as_ref(),
            today,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::warranty::WarrantyStatus;
    use chrono::Utc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn link(unit_id: Uuid, product_id: Uuid, install: Option<NaiveDate>) -> UnitProductLink {
        UnitProductLink {
            id: Uuid::new_v4(),
            unit_id,
            product_id,
            install_date: install,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn enrich_uses_unit_date_when_link_has_none() {
        let building = Building {
            id: Uuid::new_v4(),
            name: "Torre A".into(),
            handover_date: Some(d(2020, 1, 1)),
            created_at: Utc::now(),
        };
        let unit = Unit {
            id: Uuid::new_v4(),
            building_id: building.id,
            number: None,
            install_date: Some(d(2023, 5, 31)),
            created_at: Utc::now(),
        };
        let product = Product {
            id: Uuid::new_v4(),
            name: "Porta".into(),
            abnt_warranty_months: Some(9),
            manufacturer_warranty_months: None,
            maintenance_interval_months: None,
            created_at: Utc::now(),
        };

        let detail = enrich(
            link(unit.id, product.id, None),
            Some(&unit),
            Some(&building),
            Some(&product),
            d(2024, 2, 29),
        );

        assert_eq!(detail.base_date, d(2023, 5, 31));
        assert_eq!(detail.windows.abnt_expires_on, Some(d(2024, 2, 29)));
        assert_eq!(detail.windows.abnt_status, Some(WarrantyStatus::Valid));
        assert_eq!(detail.windows.manufacturer_status, None);
    }

    #[test]
    fn enrich_without_product_has_empty_windows() {
        let today = d(2024, 6, 1);
        let detail = enrich(link(Uuid::new_v4(), Uuid::new_v4(), None), None, None, None, today);

        assert_eq!(detail.base_date, today);
        assert_eq!(detail.windows, WarrantyWindows::default());
        assert!(detail.product.is_none());
    }

    #[test]
    fn unique_ids_dedups() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ids = unique_ids(vec![a, b, a, b, a].into_iter());
        assert_eq!(ids.len(), 2);
    }
}
