mod department_service;

pub use department_service::DepartmentService;
