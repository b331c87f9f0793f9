// src/services/dashboard_service.rs

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductRepository, PropertyRepository, TicketRepository, WarrantyRepository},
    models::{
        dashboard::{DashboardSummary, UpcomingMaintenance},
        product::Product,
        property::{Building, Unit},
        ticket::{TicketStatusCount, STATUS_FINISHED, STATUS_OPEN},
        warranty::UnitProductLink,
    },
    services::warranty::{self, ForecastPolicy, TrackTally},
};

fn count_status(counts: &[TicketStatusCount], status: &str) -> usize {
    counts
        .iter()
        .filter(|c| c.status == status)
        .map(|c| usize::try_from(c.total).unwrap_or_default())
        .sum()
}

/// Agrega o dashboard sobre coleções já carregadas.
///
/// Vínculos cuja unidade ou produto não existem mais são ignorados.
pub fn build_summary(
    units: &[Unit],
    buildings: &[Building],
    links: &[UnitProductLink],
    products: &[Product],
    ticket_counts: &[TicketStatusCount],
    today: NaiveDate,
    policy: &ForecastPolicy,
) -> DashboardSummary {
    let units_by_id: HashMap<Uuid, &Unit> = units.iter().map(|u| (u.id, u)).collect();
    let buildings_by_id: HashMap<Uuid, &Building> = buildings.iter().map(|b| (b.id, b)).collect();
    let products_by_id: HashMap<Uuid, &Product> = products.iter().map(|p| (p.id, p)).collect();

    let mut tally = TrackTally::default();
    let mut upcoming = Vec::new();

    for link in links {
        let unit = units_by_id.get(&link.unit_id).copied();
        let product = products_by_id.get(&link.product_id).copied();
        let (Some(unit), Some(product)) = (unit, product) else {
            continue;
        };
        let building = buildings_by_id.get(&unit.building_id).copied();

        let base = warranty::base_date_for(Some(link), Some(unit), building, today);
        let windows = warranty::windows_for_product(base, product, today);
        tally.add(&windows, today, policy.lookahead_days);

        if let Some(due_date) = warranty::forecast_maintenance(link, product, today, policy.lookahead_days) {
            upcoming.push(UpcomingMaintenance {
                unit_id: unit.id,
                product_id: product.id,
                unit: unit.label(),
                product: product.name.clone(),
                due_date,
                interval_months: product.maintenance_months().unwrap_or_default(),
            });
        }
    }

    // sort_by_key é estável: empates mantêm a ordem dos vínculos
    upcoming.sort_by_key(|m| m.due_date);
    upcoming.truncate(policy.upcoming_limit);

    DashboardSummary {
        total_units: units.len(),
        valid_warranties: tally.valid,
        expired_warranties: tally.expired,
        expiring_soon: tally.expiring_soon,
        open_tickets: count_status(ticket_counts, STATUS_OPEN),
        finished_tickets: count_status(ticket_counts, STATUS_FINISHED),
        upcoming_maintenance: upcoming,
    }
}

#[derive(Clone)]
pub struct DashboardService {
    property_repo: PropertyRepository,
    product_repo: ProductRepository,
    warranty_repo: WarrantyRepository,
    ticket_repo: TicketRepository,
    policy: ForecastPolicy,
}

impl DashboardService {
    pub fn new(
        property_repo: PropertyRepository,
        product_repo: ProductRepository,
        warranty_repo: WarrantyRepository,
        ticket_repo: TicketRepository,
        policy: ForecastPolicy,
    ) -> Self {
        Self {
            property_repo,
            product_repo,
            warranty_repo,
            ticket_repo,
            policy,
        }
    }

    pub async fn get_summary<'e, E>(&self, executor: E, today: NaiveDate) -> Result<DashboardSummary, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        // Snapshot consistente de todas as tabelas
        let mut tx = executor.begin().await?;

        let units = self.property_repo.list_units(&mut *tx).await?;
        let buildings = self.property_repo.list_buildings(&mut *tx).await?;
        let links = self.warranty_repo.list(&mut *tx, None, None).await?;

        let mut product_ids: Vec<Uuid> = links.iter().map(|l| l.product_id).collect();
        product_ids.sort_unstable();
        product_ids.dedup();
        let products = self.product_repo.list_by_ids(&mut *tx, &product_ids).await?;

        let ticket_counts = self.ticket_repo.count_by_status(&mut *tx).await?;

        tx.commit().await?;

        let summary = build_summary(&units, &buildings, &links, &products, &ticket_counts, today, &self.policy);
        tracing::debug!(
            units = summary.total_units,
            links = links.len(),
            upcoming = summary.upcoming_maintenance.len(),
            "Dashboard calculado"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn building(handover: Option<NaiveDate>) -> Building {
        Building { id: Uuid::new_v4(), name: "Edifício".into(), handover_date: handover, created_at: Utc::now() }
    }

    fn unit(building: &Building, number: &str, install: Option<NaiveDate>) -> Unit {
        Unit {
            id: Uuid::new_v4(),
            building_id: building.id,
            number: Some(number.into()),
            install_date: install,
            created_at: Utc::now(),
        }
    }

    fn product(name: &str, abnt: Option<i32>, fabrica: Option<i32>, preventiva: Option<i32>) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.into(),
            abnt_warranty_months: abnt,
            manufacturer_warranty_months: fabrica,
            maintenance_interval_months: preventiva,
            created_at: Utc::now(),
        }
    }

    fn link(unit: &Unit, product: &Product, install: Option<NaiveDate>) -> UnitProductLink {
        UnitProductLink {
            id: Uuid::new_v4(),
            unit_id: unit.id,
            product_id: product.id,
            install_date: install,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn count(status: &str, total: i64) -> TicketStatusCount {
        TicketStatusCount { status: status.into(), total }
    }

    #[test]
    fn counts_tracks_and_tickets() {
        let today = d(2024, 6, 1);
        let b = building(Some(d(2023, 1, 15)));
        let u1 = unit(&b, "101", None);
        let u2 = unit(&b, "102", Some(d(2023, 7, 1)));

        // ABNT vencida, fábrica válida
        let esquadria = product("Esquadria", Some(12), Some(24), None);
        // ABNT vence em 2024-07-01 (dentro da janela)
        let porta = product("Porta", Some(12), None, None);

        let links = vec![link(&u1, &esquadria, None), link(&u2, &porta, None)];
        let tickets = vec![count("ABERTO", 2), count("FINALIZADO", 1), count("EM_ANDAMENTO", 4)];

        let summary = build_summary(
            &[u1, u2],
            &[b],
            &links,
            &[esquadria, porta],
            &tickets,
            today,
            &ForecastPolicy::default(),
        );

        assert_eq!(summary.total_units, 2);
        assert_eq!(summary.valid_warranties, 2);
        assert_eq!(summary.expired_warranties, 1);
        assert_eq!(summary.expiring_soon, 1);
        assert_eq!(summary.open_tickets, 2);
        assert_eq!(summary.finished_tickets, 1);
        assert!(summary.expiring_soon <= summary.valid_warranties);
    }

    #[test]
    fn upcoming_maintenance_sorted_and_truncated() {
        let today = d(2024, 1, 1);
        let b = building(None);
        let units: Vec<Unit> = (0..12).map(|i| unit(&b, &format!("{}", 100 + i), None)).collect();
        let filtro = product("Filtro", None, None, Some(1));

        // Vencimentos de 2024-01-12 a 2024-01-01, em ordem decrescente
        let links: Vec<UnitProductLink> = units
            .iter()
            .enumerate()
            .map(|(i, u)| link(u, &filtro, Some(d(2023, 12, 12 - i as u32))))
            .collect();

        let summary = build_summary(&units, &[b], &links, &[filtro], &[], today, &ForecastPolicy::default());

        assert_eq!(summary.upcoming_maintenance.len(), 10);
        let dates: Vec<NaiveDate> = summary.upcoming_maintenance.iter().map(|m| m.due_date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(dates[0], d(2024, 1, 1));
        assert_eq!(summary.upcoming_maintenance[0].unit, "111");
        assert_eq!(summary.upcoming_maintenance[0].interval_months, 1);
    }

    #[test]
    fn maintenance_outside_window_or_without_date_is_skipped() {
        let today = d(2024, 1, 1);
        let b = building(None);
        let u = unit(&b, "201", None);
        let aquecedor = product("Aquecedor", None, None, Some(6));
        let bomba = product("Bomba", None, None, Some(3));
        let sem_data = product("Sensor", None, None, Some(1));

        let links = vec![
            link(&u, &aquecedor, Some(d(2023, 10, 2))), // 2024-04-02, fora
            link(&u, &bomba, Some(d(2023, 12, 31))),    // 2024-03-31, dentro
            link(&u, &sem_data, None),
        ];

        let summary = build_summary(
            &[u],
            &[b],
            &links,
            &[aquecedor, bomba, sem_data],
            &[],
            today,
            &ForecastPolicy::default(),
        );

        assert_eq!(summary.upcoming_maintenance.len(), 1);
        assert_eq!(summary.upcoming_maintenance[0].product, "Bomba");
        assert_eq!(summary.upcoming_maintenance[0].due_date, d(2024, 3, 31));
    }

    #[test]
    fn links_with_unknown_unit_or_product_are_ignored() {
        let today = d(2024, 1, 1);
        let b = building(Some(d(2023, 6, 1)));
        let u = unit(&b, "301", None);
        let orfao = product("Removido", Some(60), None, None);
        let piso = product("Piso", Some(60), None, None);
        let outra_unidade = unit(&b, "999", None);

        let links = vec![link(&u, &orfao, None), link(&outra_unidade, &piso, None), link(&u, &piso, None)];

        let summary = build_summary(&[u], &[b], &links, &[piso], &[], today, &ForecastPolicy::default());

        assert_eq!(summary.total_units, 1);
        assert_eq!(summary.valid_warranties, 1);
        assert_eq!(summary.expired_warranties, 0);
    }

    #[test]
    fn empty_population_yields_zeroes() {
        let summary = build_summary(&[], &[], &[], &[], &[], d(2024, 1, 1), &ForecastPolicy::default());
        assert_eq!(summary.total_units, 0);
        assert_eq!(summary.valid_warranties, 0);
        assert!(summary.upcoming_maintenance.is_empty());
    }
}
