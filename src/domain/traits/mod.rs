//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod messenger;
pub mod store;

pub use bot::CoscupBot;
pub use messenger::Messenger;
pub use store::Store;
