pub mod dashboard_service;
pub mod ticket_service;
pub mod warranty;
pub mod warranty_service;
