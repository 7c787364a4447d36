//! Outcome rendering
//!
//! Fixed Markdown text for chat replies. Upstream values are escaped before
//! they are interpolated.

use std::fmt::Write as _;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use sac_common::{PrivilegedUser, ServerRoleGrant};

use crate::privileges::Outcome;

static MARKDOWN_SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([_*~`>|\[\]])").expect("valid regex"));

/// Backslash-escape Markdown control characters.
pub fn escape_markdown(value: &str) -> String {
    MARKDOWN_SPECIAL.replace_all(value, r"\$1").into_owned()
}

/// Format an ISO-8601 timestamp as `dd.mm.YYYY HH:MM`.
///
/// Offsets are kept as given, not converted. A bare date renders at midnight.
pub fn format_datetime(value: &str) -> Result<String, chrono::ParseError> {
    const OUT: &str = "%d.%m.%Y %H:%M";

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.format(OUT).to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.format(OUT).to_string());
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")?;
    Ok(date.format("%d.%m.%Y 00:00").to_string())
}

fn render_user(user: &PrivilegedUser) -> String {
    let name = user.name.as_deref().map_or_else(|| "Unnamed".to_owned(), escape_markdown);
    match &user.steam_id {
        Some(steam_id) => format!("**{name}** (`{steam_id}`)"),
        None => format!("**{name}**"),
    }
}

fn render_grant(grant: &ServerRoleGrant) -> String {
    let role = escape_markdown(grant.role_label().unwrap_or("unknown role"));
    let server = escape_markdown(grant.server_label().unwrap_or("unknown server"));
    let until = match grant.date_end.as_deref() {
        None => "permanent".to_owned(),
        Some(raw) => format_datetime(raw)
            .map(|d| format!("until {d}"))
            .unwrap_or_else(|_| format!("until {}", escape_markdown(raw))),
    };

    let mut line = format!("- {role} on {server}, {until}");
    if let Some(comment) = grant.comment.as_deref().filter(|c| !c.is_empty()) {
        let _ = write!(line, " ({})", escape_markdown(comment));
    }
    line
}

/// Reply text for an outcome.
pub fn render(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Found { user, grants } => {
            let mut text = render_user(user);
            for grant in grants {
                text.push('\n');
                text.push_str(&render_grant(grant));
            }
            text
        }
        Outcome::Granted { steam_id, role } => {
            format!("Role **{}** granted to `{steam_id}`", escape_markdown(role))
        }
        Outcome::NotFound => "No such user found".to_owned(),
        Outcome::NoPermission => "You do not have permission for this request".to_owned(),
        Outcome::ServiceUnavailable => "The service is currently unavailable".to_owned(),
        Outcome::InvalidInput(reason) => escape_markdown(reason),
    }
}
