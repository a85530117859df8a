//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the client for the external report-service API.

pub mod civic_api;
