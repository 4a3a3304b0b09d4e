//! Domain entities - Values exchanged between the HTTP layer and the bot logic

pub mod edison;
pub mod ground;
pub mod sponsor;

pub use edison::{PhotoDone, PhotoRequest};
pub use ground::{CheckInResult, GroundStatus};
pub use sponsor::{Sponsor, SponsorRoster, FINAL_SPONSOR};
