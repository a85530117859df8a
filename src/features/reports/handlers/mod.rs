pub mod report_handler;

pub use report_handler::{
    __path_check_duplicates, __path_create_report, __path_escalate_report, __path_get_report,
    __path_list_my_reports, __path_list_reports, __path_update_status, check_duplicates,
    create_report, escalate_report, get_report, list_my_reports, list_reports, update_status,
    ReportState,
};
