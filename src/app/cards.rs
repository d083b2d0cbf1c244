use crate::core::hours::hours_today;
use crate::domain::model::DerivedView;
use chrono::NaiveDateTime;
use std::fmt::Write;
use url::Url;

pub const NO_MATCHES: &str = "No services match your filters.";
const MISSING: &str = "—";

/// Plain-text card for one result.
pub fn render_card(view: &DerivedView, now: &NaiveDateTime) -> String {
    let record = &view.record;
    let mut card = String::new();

    let _ = writeln!(card, "{}", record.name);

    let mut badges = vec![if view.is_open_now { "[Open]".to_string() } else { "[Closed]".to_string() }];
    if let Some(km) = view.distance_km {
        badges.push(format!("[{:.1} km]", km));
    }
    badges.extend(record.categories.iter().map(|c| format!("[{}]", c)));
    let _ = writeln!(card, "  {}", badges.join(" "));

    if !record.description.is_empty() {
        let _ = writeln!(card, "  {}", record.description);
    }
    let _ = writeln!(card, "  Eligibility: {}", or_missing(&record.eligibility.join(", ")));
    let _ = writeln!(card, "  Address: {}", or_missing(&record.address));
    let _ = writeln!(card, "  Hours today: {}", hours_today(record.hours.as_ref(), now));

    if !record.website.is_empty() {
        let _ = writeln!(card, "  Website: {}", record.website);
    }
    if !record.phone.is_empty() {
        let _ = writeln!(card, "  Call: tel:{}", record.phone);
    }
    if let Some(link) = directions_link(view) {
        let _ = writeln!(card, "  Directions: {}", link);
    }
    card
}

pub fn render_list(views: &[DerivedView], now: &NaiveDateTime) -> String {
    if views.is_empty() {
        return format!("{}\n", NO_MATCHES);
    }
    views
        .iter()
        .map(|v| render_card(v, now))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Maps directions to the address, or to the coordinates when there is no address.
pub fn directions_link(view: &DerivedView) -> Option<String> {
    let record = &view.record;
    let destination = if !record.address.is_empty() {
        record.address.clone()
    } else {
        let point = record.location()?;
        format!("{},{}", point.lat, point.lng)
    };
    Url::parse_with_params(
        "https://www.google.com/maps/dir/",
        &[("api", "1"), ("destination", destination.as_str())],
    )
    .ok()
    .map(|u| u.to_string())
}

fn or_missing(value: &str) -> &str {
    if value.is_empty() {
        MISSING
    } else {
        value
    }
}
