//! Core flogin library: validation, API client, session and routing.

pub mod api;
pub mod config;
pub mod forms;
pub mod logging;
pub mod routes;
pub mod session;
pub mod validation;
