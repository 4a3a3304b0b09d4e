//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Presentation logic over bot results
//! - Errors: Domain-specific errors

pub mod errors;
pub mod services;
