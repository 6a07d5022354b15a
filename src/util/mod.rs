use chrono::{Local, NaiveDateTime};

/// `datetime-local` input format; also what the notes table stores in `when`.
pub(crate) const WHEN_FORMAT: &str = "%Y-%m-%dT%H:%M";

const DISPLAY_FORMAT: &str = "%B %-d, %Y at %-I:%M %p";

pub(crate) fn now_when() -> String {
    // Browser local time (chrono's wasmbind reads the JS Date offset).
    Local::now().format(WHEN_FORMAT).to_string()
}

fn parse_when(when: &str) -> Option<NaiveDateTime> {
    let when = when.trim();
    NaiveDateTime::parse_from_str(when, WHEN_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(when, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| {
            chrono::DateTime::parse_from_rfc3339(when).map(|d| d.naive_local())
        })
        .ok()
}

/// Human form of a note timestamp, e.g. "March 1, 2024 at 9:30 AM".
/// Unparseable values are shown verbatim.
pub(crate) fn format_when(when: &str) -> String {
    match parse_when(when) {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => when.to_string(),
    }
}

/// Value for a `datetime-local` input; empty if `when` is not a timestamp.
pub(crate) fn when_input_value(when: &str) -> String {
    parse_when(when)
        .map(|dt| dt.format(WHEN_FORMAT).to_string())
        .unwrap_or_default()
}

/// Plain text of an HTML body for the sidebar, cut at `max_chars`.
pub(crate) fn plain_text_preview(html: &str, max_chars: usize) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if text.chars().count() <= max_chars {
        return text;
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
