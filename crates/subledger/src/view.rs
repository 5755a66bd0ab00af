//! Plain-text rendering of controller state.

use std::fmt::Write as _;

use chrono::NaiveDate;
use subledger_core::{ServiceRegistry, Severity, StatusMessage, Subscription};

/// Renders the subscription list with positions and time left.
#[must_use]
pub fn subscriptions(
    items: &[Subscription],
    expiring: &[Subscription],
    today: NaiveDate,
) -> String {
    if items.is_empty() {
        return "No subscriptions yet. Add one with `add <service> <YYYY-MM-DD>`.".to_string();
    }

    let width = items.iter().map(|s| s.service.len()).max().unwrap_or(0);
    let mut out = String::from("My Subscriptions\n");
    for (i, sub) in items.iter().enumerate() {
        let marker = if expiring.iter().any(|e| e.id == sub.id) {
            " !"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{:>3}. {:<width$}  expires {}  ({}){marker}",
            i + 1,
            sub.service,
            sub.end_date.format("%Y-%m-%d"),
            remaining(sub, today),
        );
    }
    out.pop();
    out
}

fn remaining(sub: &Subscription, today: NaiveDate) -> String {
    match sub.days_remaining(today) {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        n if n < 0 => format!("lapsed {} day(s) ago", -n),
        n => format!("in {n} days"),
    }
}

/// Renders the known services.
#[must_use]
pub fn services(registry: &ServiceRegistry) -> String {
    registry
        .services()
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders a status message as a single line.
#[must_use]
pub fn status(message: &StatusMessage) -> String {
    let tag = match message.severity {
        Severity::Success => "ok",
        Severity::Warning => "warning",
        Severity::Error => "error",
    };
    format!("[{tag}] {}", message.text)
}
