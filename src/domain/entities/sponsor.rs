use once_cell::sync::Lazy;
use serde::Serialize;

/// Sponsor id of the last stop of the ground game. It has no booth.
pub const FINAL_SPONSOR: &str = "coscup";

/// A sponsor taking part in the ground game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sponsor {
    pub id: String,
    /// Booth label shown to attendees, `None` for the final sponsor
    pub booth: Option<String>,
}

impl Sponsor {
    pub fn new(id: impl Into<String>, booth: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            booth: Some(booth.into()),
        }
    }

    pub fn final_stop() -> Self {
        Self {
            id: FINAL_SPONSOR.to_string(),
            booth: None,
        }
    }

    pub fn is_final(&self) -> bool {
        self.id == FINAL_SPONSOR
    }
}

static DEFAULT_ROSTER: Lazy<SponsorRoster> = Lazy::new(|| {
    SponsorRoster::new(vec![
        Sponsor::new("sp01", "A1"),
        Sponsor::new("sp02", "A2"),
        Sponsor::new("sp03", "A3"),
        Sponsor::new("sp04", "B1"),
        Sponsor::new("sp05", "B2"),
        Sponsor::new("sp06", "B3"),
        Sponsor::final_stop(),
    ])
});

/// Ordered list of ground game sponsors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SponsorRoster {
    sponsors: Vec<Sponsor>,
}

impl SponsorRoster {
    pub fn new(sponsors: Vec<Sponsor>) -> Self {
        Self { sponsors }
    }

    /// The roster used by the check-in pages
    pub fn default_roster() -> &'static SponsorRoster {
        &DEFAULT_ROSTER
    }

    pub fn sponsors(&self) -> &[Sponsor] {
        &self.sponsors
    }

    pub fn get(&self, id: &str) -> Option<&Sponsor> {
        self.sponsors.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Booth label for a sponsor id, if the sponsor has one
    pub fn booth_label(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(|s| s.booth.as_deref())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sponsors.iter().map(|s| s.id.as_str())
    }
}
