pub mod department_handler;

pub use department_handler::{
    __path_get_work_queue, __path_list_departments, get_work_queue, list_departments,
};
