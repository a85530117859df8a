pub mod auth;
pub mod dashboard;
pub mod departments;
pub mod lifecycle;
pub mod map;
pub mod reports;
pub mod votes;
