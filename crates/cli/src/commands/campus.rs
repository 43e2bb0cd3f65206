//! `campusbot map`, `campusbot events` and `campusbot prompts`: catalog views.

use campusbot_core::campus::{
    self, CampusEvent, CampusLocation, EventKind, LocationKind, QUICK_PROMPTS,
};

pub fn map(kind: Option<LocationKind>) {
    println!("🗺️  {} Campus Map", campus::CAMPUS_NAME);
    println!("=================\n");
    print!("{}", render_locations(campus::locations_of(kind)));
}

pub fn events(kind: Option<EventKind>) {
    println!("📅 Upcoming Events at {}", campus::CAMPUS_NAME);
    println!("=========================\n");
    print!("{}", render_events(campus::events_of(kind)));
}

pub fn prompts() {
    println!("Quick prompts (type /N in chat):\n");
    for (i, prompt) in QUICK_PROMPTS.iter().enumerate() {
        println!("  /{}  {} {:<16} {}", i + 1, prompt.icon, prompt.label, prompt.prompt);
    }
}

fn render_locations<'a>(locations: impl Iterator<Item = &'a CampusLocation>) -> String {
    let mut out = String::new();
    for location in locations {
        out.push_str(&format!(
            "  {} {}  [{}]  at ({}%, {}%)\n     {}\n\n",
            location.kind.icon(),
            location.name,
            location.kind,
            location.coordinates.x,
            location.coordinates.y,
            location.description,
        ));
    }
    if out.is_empty() {
        out.push_str("  No locations match.\n");
    }
    out
}

fn render_events<'a>(events: impl Iterator<Item = &'a CampusEvent>) -> String {
    let mut out = String::new();
    for event in events {
        out.push_str(&format!(
            "  {} {}  [{}]\n     {}  {}\n     {}\n\n",
            event.date, event.title, event.kind, event.time, event.location, event.description,
        ));
    }
    if out.is_empty() {
        out.push_str("  No events match.\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn food_filter_shows_only_the_cafeteria() {
        let out = render_locations(campus::locations_of(Some(LocationKind::Food)));
        assert!(out.contains("The Matrix (Cafeteria)  [food]  at (75%, 70%)"));
        assert!(!out.contains("Spartan Arena"));
    }

    #[test]
    fn events_render_date_and_place() {
        let out = render_events(campus::events_of(Some(EventKind::Sports)));
        assert!(out.contains("Nov 02 Spartans vs. Titans  [sports]"));
        assert!(out.contains("6:00 PM  Spartan Arena"));
        assert!(!out.contains("Hackathon"));
    }

    #[test]
    fn empty_listing_says_so() {
        assert_eq!(render_events(std::iter::empty()), "  No events match.\n");
        assert_eq!(render_locations(std::iter::empty()), "  No locations match.\n");
    }
}
