mod duplicate_service;
mod report_service;

pub use duplicate_service::DuplicateService;
pub use report_service::ReportService;
