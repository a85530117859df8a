mod session_store;

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use model::Session;
pub use services::AuthService;
pub use session_store::SessionStore;
