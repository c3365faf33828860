//! Plumbing shared by Codepool services: config loading, tracing, HTTP layers,
//! health probes and sea-orm helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
