//! Domain layer - Core business types with no transport dependencies
//! 
//! This layer contains:
//! - Entities: Ground game and Edison photo values
//! - Traits: Abstractions over the bot logic and its storage

pub mod entities;
pub mod traits;
