//! # roster-api
//!
//! Dashboard web surface built with Axum: OAuth login, session gates,
//! attendance pages, and the admin forms.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod oauth;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
