//! Platform integrations

pub mod http;
pub mod line;
