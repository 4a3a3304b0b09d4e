use crate::domain::entities::{CheckInResult, GroundStatus, SponsorRoster, FINAL_SPONSOR};

/// Progress at one booth, as shown on the check-in pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoothStatus {
    pub label: String,
    pub checked: bool,
}

/// Which sponsor page to render after a check-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInPage {
    Failure {
        message: String,
    },
    InProgress {
        sp_id: String,
        booths: Vec<BoothStatus>,
        remaining: usize,
    },
    Finished {
        sp_id: String,
        booths: Vec<BoothStatus>,
    },
}

/// Service turning check-in results into sponsor pages
pub struct CheckInService<'a> {
    roster: &'a SponsorRoster,
}

impl<'a> CheckInService<'a> {
    pub fn new(roster: &'a SponsorRoster) -> Self {
        Self { roster }
    }

    /// Rename sponsor ids to booth labels. The final sponsor has no booth
    /// and is left out; ids missing from the roster keep their id.
    pub fn relabel(&self, status: &GroundStatus) -> Vec<BoothStatus> {
        let mut booths: Vec<BoothStatus> = status
            .iter()
            .filter(|(id, _)| id.as_str() != FINAL_SPONSOR)
            .map(|(id, checked)| BoothStatus {
                label: self.roster.booth_label(id).unwrap_or(id).to_string(),
                checked: *checked,
            })
            .collect();
        booths.sort_by(|a, b| a.label.cmp(&b.label));
        booths
    }

    pub fn present(&self, sp_id: &str, result: CheckInResult) -> CheckInPage {
        if let Some(message) = result.error {
            return CheckInPage::Failure { message };
        }

        let booths = self.relabel(&result.status);
        let remaining = booths.iter().filter(|b| !b.checked).count();

        if remaining == 0 || sp_id == FINAL_SPONSOR {
            CheckInPage::Finished {
                sp_id: sp_id.to_string(),
                booths,
            }
        } else {
            CheckInPage::InProgress {
                sp_id: sp_id.to_string(),
                booths,
                remaining,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Sponsor;

    fn roster() -> SponsorRoster {
        SponsorRoster::new(vec![
            Sponsor::new("sp01", "A1"),
            Sponsor::new("sp02", "B2"),
            Sponsor::final_stop(),
        ])
    }

    fn status(entries: &[(&str, bool)]) -> GroundStatus {
        entries.iter().map(|(id, c)| (id.to_string(), *c)).collect()
    }

    #[test]
    fn test_relabel_drops_final_sponsor() {
        let roster = roster();
        let service = CheckInService::new(&roster);
        let booths = service.relabel(&status(&[("sp01", true), ("sp02", false), (FINAL_SPONSOR, false), ("ghost", true)]));

        let labels: Vec<&str> = booths.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["A1", "B2", "ghost"]);
    }

    #[test]
    fn test_all_checked_is_finished() {
        let roster = roster();
        let page = CheckInService::new(&roster)
            .present("sp01", CheckInResult::ok(status(&[("sp01", true), ("sp02", true), (FINAL_SPONSOR, false)])));
        assert!(matches!(page, CheckInPage::Finished { .. }));
    }

    #[test]
    fn test_final_sponsor_is_finished_even_with_remaining() {
        let roster = roster();
        let page = CheckInService::new(&roster)
            .present(FINAL_SPONSOR, CheckInResult::ok(status(&[("sp01", true), ("sp02", false), (FINAL_SPONSOR, true)])));
        assert!(matches!(page, CheckInPage::Finished { .. }));
    }

    #[test]
    fn test_remaining_is_in_progress() {
        let roster = roster();
        let page = CheckInService::new(&roster)
            .present("sp01", CheckInResult::ok(status(&[("sp01", true), ("sp02", false), (FINAL_SPONSOR, false)])));
        match page {
            CheckInPage::InProgress { remaining, sp_id, booths } => {
                assert_eq!(remaining, 1);
                assert_eq!(sp_id, "sp01");
                assert_eq!(booths.len(), 2);
            }
            other => panic!("unexpected page: {:?}", other),
        }
    }

    #[test]
    fn test_error_is_failure() {
        let roster = roster();
        let page = CheckInService::new(&roster).present("sp01", CheckInResult::failed("not a friend"));
        assert_eq!(page, CheckInPage::Failure { message: "not a friend".to_string() });
    }
}
