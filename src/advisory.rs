//! Citizen-facing advisory text for a traffic status

use crate::models::TrafficStatusResponse;

pub const ADVISORY_HEADER: &str = "Roads Authority Namibia Advisory:";

const CLOSING: &str =
    "Please exercise caution and allow additional time if travelling in this area.";

/// Compose the official advisory message for a resolved status
#[must_use]
pub fn build_advisory(response: &TrafficStatusResponse) -> String {
    let level = response.congestion_level.as_str().to_lowercase();

    [
        ADVISORY_HEADER.to_string(),
        format!("{} is currently {level}.", response.location.description),
        format!(
            "Estimated impact: {}.",
            delay_text(response.estimated_delay_minutes)
        ),
        CLOSING.to_string(),
    ]
    .join(" ")
}

fn delay_text(minutes: u32) -> String {
    match minutes {
        0 | 1 => "no material delay".to_string(),
        n => format!("{n} minutes delay"),
    }
}
