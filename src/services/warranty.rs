// src/services/warranty.rs

//! Regras de garantia e de manutenção preventiva.
//!
//! Tudo aqui é puro: nenhuma função lê o relógio ou o banco. A data de hoje
//! sempre chega por parâmetro.

use chrono::{Days, Months, NaiveDate};

use crate::models::{
    product::Product,
    property::{Building, Unit},
    ticket::WarrantyCoverage,
    warranty::{UnitProductLink, WarrantyStatus, WarrantyWindows},
};

pub const DEFAULT_LOOKAHEAD_DAYS: u64 = 90;
pub const DEFAULT_UPCOMING_LIMIT: usize = 10;

/// Parâmetros de janela usados pelo dashboard e pela previsão de preventivos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastPolicy {
    pub lookahead_days: u64,
    pub upcoming_limit: usize,
}

impl Default for ForecastPolicy {
    fn default() -> Self {
        Self {
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
        }
    }
}

/// Soma meses de calendário. Se o dia não existe no mês de destino, usa o
/// último dia desse mês (31/01 + 1 mês = 28/02 ou 29/02).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

fn window_end(today: NaiveDate, lookahead_days: u64) -> NaiveDate {
    today
        .checked_add_days(Days::new(lookahead_days))
        .unwrap_or(NaiveDate::MAX)
}

/// `today <= date <= today + lookahead_days`
pub fn within_lookahead(date: NaiveDate, today: NaiveDate, lookahead_days: u64) -> bool {
    today <= date && date <= window_end(today, lookahead_days)
}

// ---
// Data base
// ---

/// Vínculo, depois unidade, depois entrega das chaves. Sem nenhuma data
/// registrada a garantia começa hoje.
pub fn resolve_base_date(
    link_install_date: Option<NaiveDate>,
    unit_install_date: Option<NaiveDate>,
    building_handover_date: Option<NaiveDate>,
    today: NaiveDate,
) -> NaiveDate {
    link_install_date
        .or(unit_install_date)
        .or(building_handover_date)
        .unwrap_or(today)
}

/// Atalho sobre as entidades carregadas do banco.
pub fn base_date_for(
    link: Option<&UnitProductLink>,
    unit: Option<&Unit>,
    building: Option<&Building>,
    today: NaiveDate,
) -> NaiveDate {
    resolve_base_date(
        link.and_then(|l| l.install_date),
        unit.and_then(|u| u.install_date),
        building.and_then(|b| b.handover_date),
        today,
    )
}

// ---
// Janelas
// ---

fn track(base: NaiveDate, months: Option<u32>, today: NaiveDate) -> (Option<NaiveDate>, Option<WarrantyStatus>) {
    match months {
        Some(m) => {
            let expires_on = add_months(base, m);
            let status = if today <= expires_on {
                WarrantyStatus::Valid
            } else {
                WarrantyStatus::Expired
            };
            (Some(expires_on), Some(status))
        }
        None => (None, None),
    }
}

pub fn compute_windows(
    base_date: NaiveDate,
    abnt_months: Option<u32>,
    manufacturer_months: Option<u32>,
    today: NaiveDate,
) -> WarrantyWindows {
    let (abnt_expires_on, abnt_status) = track(base_date, abnt_months, today);
    let (manufacturer_expires_on, manufacturer_status) = track(base_date, manufacturer_months, today);

    WarrantyWindows {
        abnt_expires_on,
        abnt_status,
        manufacturer_expires_on,
        manufacturer_status,
    }
}

pub fn windows_for_product(base_date: NaiveDate, product: &Product, today: NaiveDate) -> WarrantyWindows {
    compute_windows(
        base_date,
        product.abnt_months(),
        product.manufacturer_months(),
        today,
    )
}

impl WarrantyWindows {
    /// Coberto se QUALQUER uma das trilhas ainda for válida.
    pub fn is_covered(&self) -> bool {
        self.abnt_status == Some(WarrantyStatus::Valid)
            || self.manufacturer_status == Some(WarrantyStatus::Valid)
    }

    fn tracks(&self) -> [(Option<NaiveDate>, Option<WarrantyStatus>); 2] {
        [
            (self.abnt_expires_on, self.abnt_status),
            (self.manufacturer_expires_on, self.manufacturer_status),
        ]
    }
}

// ---
// Elegibilidade (abertura de chamado)
// ---

pub fn is_under_warranty(
    unit: &Unit,
    building: Option<&Building>,
    product: &Product,
    link: Option<&UnitProductLink>,
    today: NaiveDate,
) -> bool {
    let base = base_date_for(link, Some(unit), building, today);
    windows_for_product(base, product, today).is_covered()
}

/// Rótulo do chamado. Unidade, empreendimento ou produto ausente resulta em
/// FORA_DA_GARANTIA; vínculo ausente só tira a data dele da cadeia.
pub fn coverage_for(
    unit: Option<&Unit>,
    building: Option<&Building>,
    product: Option<&Product>,
    link: Option<&UnitProductLink>,
    today: NaiveDate,
) -> WarrantyCoverage {
    let covered = match (unit, building, product) {
        (Some(unit), Some(building), Some(product)) => {
            is_under_warranty(unit, Some(building), product, link, today)
        }
        _ => false,
    };
    WarrantyCoverage::from_eligibility(covered)
}

// ---
// Preventivos
// ---

pub fn next_maintenance_due(link_install_date: NaiveDate, interval_months: u32) -> NaiveDate {
    add_months(link_install_date, interval_months)
}

/// Próximo preventivo, se cair dentro da janela. Vínculo sem data de
/// instalação ou produto sem periodicidade ficam de fora.
pub fn forecast_maintenance(
    link: &UnitProductLink,
    product: &Product,
    today: NaiveDate,
    lookahead_days: u64,
) -> Option<NaiveDate> {
    let installed = link.install_date?;
    let interval = product.maintenance_months()?;
    let due = next_maintenance_due(installed, interval);

    within_lookahead(due, today, lookahead_days).then_some(due)
}

// ---
// Contagem por trilha (dashboard)
// ---

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrackTally {
    pub valid: usize,
    pub expired: usize,
    pub expiring_soon: usize,
}

impl TrackTally {
    pub fn add(&mut self, windows: &WarrantyWindows, today: NaiveDate, lookahead_days: u64) {
        for (expires_on, status) in windows.tracks() {
            match (expires_on, status) {
                (Some(date), Some(WarrantyStatus::Valid)) => {
                    self.valid += 1;
                    if within_lookahead(date, today, lookahead_days) {
                        self.expiring_soon += 1;
                    }
                }
                (_, Some(WarrantyStatus::Expired)) => self.expired += 1,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn product(abnt: Option<i32>, fabrica: Option<i32>, preventiva: Option<i32>) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Produto".into(),
            abnt_warranty_months: abnt,
            manufacturer_warranty_months: fabrica,
            maintenance_interval_months: preventiva,
            created_at: Utc::now(),
        }
    }

    fn building(handover: Option<NaiveDate>) -> Building {
        Building {
            id: Uuid::new_v4(),
            name: "Edifício".into(),
            handover_date: handover,
            created_at: Utc::now(),
        }
    }

    fn unit(building_id: Uuid, install: Option<NaiveDate>) -> Unit {
        Unit {
            id: Uuid::new_v4(),
            building_id,
            number: Some("101".into()),
            install_date: install,
            created_at: Utc::now(),
        }
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
    fn add_months_clamps_to_end_of_month() {
        assert_eq!(add_months(d(2023, 1, 31), 1), d(2023, 2, 28));
        assert_eq!(add_months(d(2024, 1, 31), 1), d(2024, 2, 29));
        assert_eq!(add_months(d(2024, 3, 31), 1), d(2024, 4, 30));
        assert_eq!(add_months(d(2023, 1, 15), 12), d(2024, 1, 15));
        assert_eq!(add_months(d(2023, 8, 31), 6), d(2024, 2, 29));
    }

    #[test]
    fn zero_months_expires_on_base_date() {
        let w = compute_windows(d(2024, 5, 10), Some(0), None, d(2024, 5, 10));
        assert_eq!(w.abnt_expires_on, Some(d(2024, 5, 10)));
        assert_eq!(w.abnt_status, Some(WarrantyStatus::Valid));
    }

    #[test]
    fn expiration_day_is_still_valid() {
        let base = d(2023, 6, 1);
        let on_day = compute_windows(base, Some(12), None, d(2024, 6, 1));
        assert_eq!(on_day.abnt_status, Some(WarrantyStatus::Valid));

        let day_after = compute_windows(base, Some(12), None, d(2024, 6, 2));
        assert_eq!(day_after.abnt_status, Some(WarrantyStatus::Expired));
    }

    #[test]
    fn missing_duration_leaves_track_empty() {
        let w = compute_windows(d(2024, 1, 1), None, Some(6), d(2024, 2, 1));
        assert_eq!(w.abnt_expires_on, None);
        assert_eq!(w.abnt_status, None);
        assert_eq!(w.manufacturer_expires_on, Some(d(2024, 7, 1)));
        assert_eq!(w.manufacturer_status, Some(WarrantyStatus::Valid));
    }

    #[test]
    fn base_date_follows_priority() {
        let today = d(2024, 6, 1);
        let (d1, d2, d3) = (d(2024, 1, 1), d(2023, 1, 1), d(2022, 1, 1));

        assert_eq!(resolve_base_date(Some(d1), Some(d2), Some(d3), today), d1);
        assert_eq!(resolve_base_date(None, Some(d2), Some(d3), today), d2);
        assert_eq!(resolve_base_date(None, None, Some(d3), today), d3);
        assert_eq!(resolve_base_date(None, None, None, today), today);
    }

    #[test]
    fn covered_when_only_manufacturer_track_is_valid() {
        let windows = compute_windows(d(2022, 1, 1), Some(12), Some(36), d(2024, 6, 1));
        assert_eq!(windows.abnt_status, Some(WarrantyStatus::Expired));
        assert_eq!(windows.manufacturer_status, Some(WarrantyStatus::Valid));
        assert!(windows.is_covered());
    }

    #[test]
    fn not_covered_when_both_tracks_expired_or_absent() {
        let expired = compute_windows(d(2020, 1, 1), Some(12), Some(24), d(2024, 6, 1));
        assert!(!expired.is_covered());

        let absent = compute_windows(d(2024, 1, 1), None, None, d(2024, 6, 1));
        assert!(!absent.is_covered());
    }

    #[test]
    fn eligibility_from_building_handover() {
        let b = building(Some(d(2023, 1, 15)));
        let u = unit(b.id, None);
        let p = product(Some(12), Some(24), None);
        let l = link(u.id, p.id, None);
        let today = d(2024, 6, 1);

        let base = base_date_for(Some(&l), Some(&u), Some(&b), today);
        assert_eq!(base, d(2023, 1, 15));

        let w = windows_for_product(base, &p, today);
        assert_eq!(w.abnt_expires_on, Some(d(2024, 1, 15)));
        assert_eq!(w.abnt_status, Some(WarrantyStatus::Expired));
        assert_eq!(w.manufacturer_expires_on, Some(d(2025, 1, 15)));
        assert_eq!(w.manufacturer_status, Some(WarrantyStatus::Valid));

        assert!(is_under_warranty(&u, Some(&b), &p, Some(&l), today));
    }

    #[test]
    fn eligibility_uses_link_date_before_unit_date() {
        let b = building(Some(d(2015, 1, 1)));
        let u = unit(b.id, Some(d(2016, 1, 1)));
        let p = product(Some(12), None, None);
        let l = link(u.id, p.id, Some(d(2024, 1, 1)));
        let today = d(2024, 6, 1);

        assert!(is_under_warranty(&u, Some(&b), &p, Some(&l), today));
        assert!(!is_under_warranty(&u, Some(&b), &p, None, today));
    }

    #[test]
    fn lookahead_window_boundaries() {
        let today = d(2024, 1, 1);
        assert!(within_lookahead(d(2024, 3, 31), today, 90));
        assert!(!within_lookahead(d(2024, 4, 2), today, 90));
        assert!(within_lookahead(today, today, 90));
        assert!(!within_lookahead(d(2023, 12, 31), today, 90));
    }

    #[test]
    fn forecast_requires_install_date_and_interval() {
        let today = d(2024, 1, 1);
        let p = product(None, None, Some(3));
        let unit_id = Uuid::new_v4();

        let installed = link(unit_id, p.id, Some(d(2023, 12, 31)));
        assert_eq!(forecast_maintenance(&installed, &p, today, 90), Some(d(2024, 3, 31)));

        let no_date = link(unit_id, p.id, None);
        assert_eq!(forecast_maintenance(&no_date, &p, today, 90), None);

        let no_interval = product(Some(12), None, None);
        assert_eq!(forecast_maintenance(&installed, &no_interval, today, 90), None);
    }

    #[test]
    fn forecast_outside_window_is_dropped() {
        let today = d(2024, 1, 1);
        let p = product(None, None, Some(6));
        let l = link(Uuid::new_v4(), p.id, Some(d(2023, 10, 2)));
        // 2024-04-02: fora dos 90 dias
        assert_eq!(forecast_maintenance(&l, &p, today, 90), None);
        assert_eq!(forecast_maintenance(&l, &p, today, 120), Some(d(2024, 4, 2)));
    }

    #[test]
    fn tally_counts_each_track_independently() {
        let today = d(2024, 6, 1);
        let mut tally = TrackTally::default();

        let mixed = compute_windows(d(2023, 1, 15), Some(12), Some(24), today);
        tally.add(&mixed, today, 90);
        assert_eq!(tally, TrackTally { valid: 1, expired: 1, expiring_soon: 0 });

        let soon = compute_windows(d(2023, 7, 1), Some(12), None, today);
        tally.add(&soon, today, 90);
        assert_eq!(tally, TrackTally { valid: 2, expired: 1, expiring_soon: 1 });
        assert!(tally.expiring_soon <= tally.valid);
    }

    #[test]
    fn coverage_for_missing_references_is_not_covered() {
        let today = d(2024, 6, 1);
        let b = building(Some(d(2024, 1, 1)));
        let u = unit(b.id, None);
        let p = product(Some(60), Some(60), None);

        assert_eq!(coverage_for(Some(&u), Some(&b), Some(&p), None, today), WarrantyCoverage::Covered);
        assert_eq!(coverage_for(None, Some(&b), Some(&p), None, today), WarrantyCoverage::NotCovered);
        assert_eq!(coverage_for(Some(&u), None, Some(&p), None, today), WarrantyCoverage::NotCovered);
        assert_eq!(coverage_for(Some(&u), Some(&b), None, None, today), WarrantyCoverage::NotCovered);
    }

    #[test]
    fn coverage_for_without_link_uses_unit_dates() {
        let today = d(2024, 6, 1);
        let b = building(Some(d(2015, 1, 1)));
        let recent = unit(b.id, Some(d(2024, 1, 1)));
        let old = unit(b.id, None);
        let p = product(Some(12), None, None);

        assert_eq!(coverage_for(Some(&recent), Some(&b), Some(&p), None, today), WarrantyCoverage::Covered);
        assert_eq!(coverage_for(Some(&old), Some(&b), Some(&p), None, today), WarrantyCoverage::NotCovered);
    }
}
