//! Plain-text rendering of contest listings

use chrono::{DateTime, Utc};

use crate::data::{Contest, ContestResult};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

fn fmt_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn render_section(title: &str, contests: &[Contest]) -> String {
    let mut out = format!("{} ({})\n", title, contests.len());
    if contests.is_empty() {
        out.push_str("  none\n");
        return out;
    }
    for contest in contests {
        out.push_str(&format!(
            "  {:<11} {:<20} {:<20} {}\n",
            contest.platform.to_lowercase(),
            fmt_time(contest.start_time),
            fmt_time(contest.end_time),
            contest.name
        ));
        if !contest.url.is_empty() {
            out.push_str(&format!("  {:<11} {}\n", "", contest.url));
        }
    }
    out
}

/// Renders a result as "Ongoing" and "Upcoming" sections under `heading`
pub fn render_table(heading: &str, result: &ContestResult) -> String {
    let mut out = format!(
        "{} (as of {})\n",
        heading,
        result.timestamp.format(TIME_FORMAT)
    );
    out.push_str(&render_section("Ongoing", &result.ongoing));
    out.push_str(&render_section("Upcoming", &result.upcoming));
    out
}
