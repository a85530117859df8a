mod marker_store;

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use marker_store::VoteMarkerStore;
pub use services::VoteService;
