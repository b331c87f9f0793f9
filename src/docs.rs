// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Garantias ---
        handlers::warranty::list_warranties,
        handlers::warranty::get_warranty,
        handlers::warranty::create_warranty,
        handlers::warranty::update_warranty,
        handlers::warranty::delete_warranty,

        // --- Unidades ---
        handlers::units::list_unit_products,
        handlers::units::add_unit_product,

        // --- Chamados ---
        handlers::tickets::list_tickets,
        handlers::tickets::get_ticket,
        handlers::tickets::create_ticket,
        handlers::tickets::update_ticket,
        handlers::tickets::update_ticket_status,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
    ),
    components(
        schemas(
            // --- Cadastros ---
            models::property::Building,
            models::property::Unit,
            models::product::Product,

            // --- Garantias ---
            models::warranty::WarrantyStatus,
            models::warranty::UnitProductLink,
            models::warranty::WarrantyWindows,
            models::warranty::WarrantyDetail,

            // --- Chamados ---
            models::ticket::WarrantyCoverage,
            models::ticket::Ticket,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::UpcomingMaintenance,

            // --- Payloads ---
            handlers::warranty::CreateWarrantyPayload,
            handlers::warranty::UpdateWarrantyPayload,
            handlers::units::AddUnitProductPayload,
            handlers::tickets::CreateTicketPayload,
            handlers::tickets::UpdateTicketPayload,
            handlers::tickets::UpdateTicketStatusPayload,
        )
    ),
    tags(
        (name = "Garantias", description = "Vínculos unidade x produto e prazos de garantia"),
        (name = "Unidades", description = "Produtos instalados por unidade"),
        (name = "Chamados", description = "Chamados de assistência técnica"),
        (name = "Dashboard", description = "Indicadores de garantias, chamados e preventivos")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_core_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/garantias"));
        assert!(paths.contains_key("/api/chamados/{id}/status"));
        assert!(paths.contains_key("/api/dashboard"));
    }
}
