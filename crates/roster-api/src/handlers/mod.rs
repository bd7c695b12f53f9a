//! Route handlers
//!
//! All HTTP request handlers organized by page.

pub mod auth;
pub mod health;
pub mod members;
pub mod pages;
pub mod settings;
