//! Creative Dashboard
//!
//! Backend of the marketing creative dashboard: restyles photos, composes
//! actor and product shots, and renders UGC videos through Replicate
//! predictions, and keeps the generated assets in an in-memory review library.

pub mod app_state;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
