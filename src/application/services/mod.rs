//! Application services - Business logic orchestration

pub mod checkin_service;

pub use checkin_service::{BoothStatus, CheckInPage, CheckInService};
