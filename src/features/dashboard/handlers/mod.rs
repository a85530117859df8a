pub mod dashboard_handler;

pub use dashboard_handler::{
    __path_get_admin_dashboard, __path_get_citizen_dashboard, get_admin_dashboard,
    get_citizen_dashboard,
};
