//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: Key-value persistence
//! - Adapters: HTTP server and LINE channel client
//! - Bot: Local bot logic behind the façade trait
//! - Templates: Sponsor page rendering

pub mod adapters;
pub mod bot;
pub mod config;
pub mod storage;
pub mod templates;
