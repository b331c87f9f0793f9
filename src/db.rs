pub mod property_repo;
pub use property_repo::PropertyRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod warranty_repo;
pub use warranty_repo::WarrantyRepository;
pub mod ticket_repo;
pub use ticket_repo::TicketRepository;
