pub mod dashboard;
pub mod product;
pub mod property;
pub mod ticket;
pub mod warranty;
