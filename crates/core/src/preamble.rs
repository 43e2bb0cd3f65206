//! System instruction construction.
//!
//! The preamble is rendered once per session from the static campus catalog:
//! persona first, then the knowledge base (locations and events), then tone
//! and formatting rules. It has no dynamic inputs besides the assistant's
//! display name.

use crate::campus::{CAMPUS_FULL_NAME, CAMPUS_NAME, CampusEvent, CampusLocation, EVENTS, LOCATIONS};

/// Default display name of the assistant persona.
pub const DEFAULT_ASSISTANT_NAME: &str = "SIT Bot";

/// Render the preamble from the built-in catalog.
pub fn system_instruction(assistant_name: &str) -> String {
    render(assistant_name, LOCATIONS, EVENTS)
}

/// Render the preamble from explicit rosters.
pub fn render(assistant_name: &str, locations: &[CampusLocation], events: &[CampusEvent]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "You are \"{assistant_name}\", the official AI Campus Assistant for {CAMPUS_NAME} ({CAMPUS_FULL_NAME}).\n"
    ));
    out.push_str("Your goal is to help students, faculty, and visitors navigate campus life.\n\n");

    out.push_str("**University Knowledge Base:**\n");
    out.push_str(&format!("- **Name:** {CAMPUS_NAME} ({CAMPUS_FULL_NAME})\n"));
    out.push_str("- **Mascot:** The Spartans\n");
    out.push_str("- **Colors:** Crimson and Gold\n");

    out.push_str("- **Key Locations:**\n");
    for loc in locations {
        out.push_str(&format!("  - *{}:* {}\n", loc.name, loc.description));
    }

    out.push_str("\n- **Upcoming Events:**\n");
    for event in events {
        out.push_str(&format!(
            "  - *{}:* {} at {}. {}\n",
            event.title, event.date, event.location, event.description
        ));
    }

    out.push_str("\n**Tone & Style:**\n");
    out.push_str("- Professional yet approachable.\n");
    out.push_str("- Proud of the \"Spartan Spirit\".\n");
    out.push_str("- Helpful and precise.\n");

    out.push_str("\n**Formatting:**\n");
    out.push_str("- Use Markdown.\n");
    out.push_str("- If asking about location, describe it based on the knowledge base.\n");

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_comes_first() {
        let text = system_instruction(DEFAULT_ASSISTANT_NAME);
        assert!(text.starts_with("You are \"SIT Bot\""));
        assert!(text.contains("Scholars Institute of Technology"));
    }

    #[test]
    fn every_location_and_event_is_listed() {
        let text = system_instruction(DEFAULT_ASSISTANT_NAME);
        for loc in LOCATIONS {
            assert!(text.contains(&format!("*{}:* {}", loc.name, loc.description)));
        }
        for event in EVENTS {
            assert!(text.contains(&format!(
                "*{}:* {} at {}.",
                event.title, event.date, event.location
            )));
        }
    }

    #[test]
    fn knowledge_base_precedes_style_rules() {
        let text = system_instruction(DEFAULT_ASSISTANT_NAME);
        let kb = text.find("**University Knowledge Base:**").unwrap();
        let events = text.find("**Upcoming Events:**").unwrap();
        let tone = text.find("**Tone & Style:**").unwrap();
        let fmt = text.find("**Formatting:**").unwrap();
        assert!(kb < events && events < tone && tone < fmt);
    }

    #[test]
    fn each_entry_is_its_own_line() {
        let text = render("Nova", LOCATIONS, &[]);
        let mut lines = text.lines();
        assert!(lines.next().is_some_and(|l| l.ends_with("(Scholars Institute of Technology).")));
        assert_eq!(
            lines.next(),
            Some("Your goal is to help students, faculty, and visitors navigate campus life.")
        );
        assert!(text.contains("  - *Spartan Arena:* Gym, basketball courts, and Olympic pool.\n  - *Innovation Center:*"));
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(system_instruction("Nova"), system_instruction("Nova"));
    }

    #[test]
    fn empty_rosters_still_render_sections() {
        let text = render("Nova", &[], &[]);
        assert!(text.contains("- **Key Locations:**\n\n- **Upcoming Events:**"));
    }
}
