pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use handlers::ReportState;
pub use services::{DuplicateService, ReportService};
