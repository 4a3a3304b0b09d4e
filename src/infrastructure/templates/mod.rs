//! Sponsor page rendering
//!
//! Templates are compiled into the binary. Placeholders look like
//! `{{ name }}`; values set with [`Template::set`] are HTML-escaped.

use crate::application::services::{BoothStatus, CheckInPage};

const BASE: &str = include_str!("../../../templates/sp_base.html");
const CHECKIN: &str = include_str!("../../../templates/sp_checkin.html");
const FAIL: &str = include_str!("../../../templates/sp_fail.html");
const PROGRESS: &str = include_str!("../../../templates/sp_progress.html");
const FINISH: &str = include_str!("../../../templates/sp_finish.html");
const TEST: &str = include_str!("../../../templates/sp_test.html");

pub struct Template {
    source: &'static str,
    values: Vec<(&'static str, String)>,
}

impl Template {
    pub fn new(source: &'static str) -> Self {
        Self {
            source,
            values: Vec::new(),
        }
    }

    pub fn set(self, name: &'static str, value: &str) -> Self {
        let escaped = html_escape::encode_text(value).into_owned();
        self.set_raw(name, escaped)
    }

    /// Insert pre-rendered HTML
    pub fn set_raw(mut self, name: &'static str, html: String) -> Self {
        self.values.push((name, html));
        self
    }

    pub fn render(&self) -> String {
        self.values
            .iter()
            .fold(self.source.to_string(), |page, (name, value)| {
                page.replace(&format!("{{{{ {} }}}}", name), value)
            })
    }
}

fn layout(title: &str, content: String) -> String {
    Template::new(BASE)
        .set("title", title)
        .set_raw("content", content)
        .render()
}

fn booth_list(booths: &[BoothStatus]) -> String {
    booths
        .iter()
        .map(|booth| {
            let class = if booth.checked { "checked" } else { "pending" };
            format!(
                "        <li class=\"{}\">{}</li>",
                class,
                html_escape::encode_text(&booth.label)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Landing page a sponsor's QR code points to
pub fn entry_page(sp_id: &str, booth: &str) -> String {
    let content = Template::new(CHECKIN)
        .set("booth", booth)
        .set("sp_id", sp_id)
        .render();
    layout("Check in", content)
}

pub fn check_in_page(page: &CheckInPage) -> String {
    match page {
        CheckInPage::Failure { message } => {
            let content = Template::new(FAIL).set("message", message).render();
            layout("Check-in failed", content)
        }
        CheckInPage::InProgress { booths, remaining, .. } => {
            let content = Template::new(PROGRESS)
                .set("remaining", &remaining.to_string())
                .set_raw("booths", booth_list(booths))
                .render();
            layout("Checked in", content)
        }
        CheckInPage::Finished { booths, .. } => {
            let content = Template::new(FINISH)
                .set_raw("booths", booth_list(booths))
                .render();
            layout("Finished", content)
        }
    }
}

pub fn test_page() -> String {
    layout("Test", Template::new(TEST).render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_escaped() {
        let html = Template::new("<p>{{ msg }}</p>").set("msg", "<script>x</script>").render();
        assert_eq!(html, "<p>&lt;script&gt;x&lt;/script&gt;</p>");
    }

    #[test]
    fn test_failure_page_carries_message() {
        let html = check_in_page(&CheckInPage::Failure { message: "Please add the bot".to_string() });
        assert!(html.contains("Check-in failed"));
        assert!(html.contains("Please add the bot"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_progress_page_lists_booths() {
        let html = check_in_page(&CheckInPage::InProgress {
            sp_id: "sp01".to_string(),
            booths: vec![
                BoothStatus { label: "A1".to_string(), checked: true },
                BoothStatus { label: "B2".to_string(), checked: false },
            ],
            remaining: 1,
        });
        assert!(html.contains("1 booth(s) to go"));
        assert!(html.contains("<li class=\"checked\">A1</li>"));
        assert!(html.contains("<li class=\"pending\">B2</li>"));
    }

    #[test]
    fn test_entry_and_test_pages_render() {
        let html = entry_page("sp01", "A1");
        assert!(html.contains("Booth A1"));
        assert!(test_page().contains("Sponsor pages are up"));
    }
}
