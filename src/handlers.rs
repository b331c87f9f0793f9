pub mod dashboard;
pub mod tickets;
pub mod units;
pub mod warranty;
