//! The static campus catalog: locations, upcoming events and quick prompts.
//!
//! This data feeds both the assistant's preamble and the map/events views.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Short name of the institution.
pub const CAMPUS_NAME: &str = "SIT";

/// Full name of the institution.
pub const CAMPUS_FULL_NAME: &str = "Scholars Institute of Technology";

/// Greeting shown when a chat opens.
pub const WELCOME_MESSAGE: &str =
    "Welcome to SIT! I'm your Spartan Assistant. How can I help you today?";

/// Disclaimer shown under the chat input.
pub const DISCLAIMER: &str =
    "SIT Assistant can make mistakes. Check official campus sources for critical info.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Academic,
    Facility,
    Food,
}

impl LocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Academic => "academic",
            Self::Facility => "facility",
            Self::Food => "food",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Academic => "🎓",
            Self::Facility => "🏟️",
            Self::Food => "🍔",
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "academic" => Ok(Self::Academic),
            "facility" => Ok(Self::Facility),
            "food" => Ok(Self::Food),
            other => Err(format!(
                "unknown location kind '{other}' (expected academic, facility or food)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Academic,
    Social,
    Sports,
    Career,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Academic => "academic",
            Self::Social => "social",
            Self::Sports => "sports",
            Self::Career => "career",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "academic" => Ok(Self::Academic),
            "social" => Ok(Self::Social),
            "sports" => Ok(Self::Sports),
            "career" => Ok(Self::Career),
            other => Err(format!(
                "unknown event kind '{other}' (expected academic, social, sports or career)"
            )),
        }
    }
}

/// Map position as percentages from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub x: u8,
    pub y: u8,
}

/// A named place on campus.
#[derive(Debug, Clone, Serialize)]
pub struct CampusLocation {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub coordinates: Coordinates,
    pub kind: LocationKind,
}

/// An upcoming campus event.
#[derive(Debug, Clone, Serialize)]
pub struct CampusEvent {
    pub id: &'static str,
    pub title: &'static str,
    pub date: &'static str,
    pub time: &'static str,
    pub location: &'static str,
    pub description: &'static str,
    pub kind: EventKind,
}

/// A canned question offered to first-time users.
#[derive(Debug, Clone, Serialize)]
pub struct QuickPrompt {
    pub label: &'static str,
    pub prompt: &'static str,
    pub icon: &'static str,
}

pub const LOCATIONS: &[CampusLocation] = &[
    CampusLocation {
        id: "tech-park",
        name: "Tech Park (Engineering)",
        description: "Main hub for CS, AI, and Engineering. Labs open 24/7.",
        coordinates: Coordinates { x: 20, y: 20 },
        kind: LocationKind::Academic,
    },
    CampusLocation {
        id: "knowledge-hub",
        name: "Knowledge Hub (Library)",
        description: "4 floors of books and study pods. Quiet zone on Level 4.",
        coordinates: Coordinates { x: 50, y: 40 },
        kind: LocationKind::Academic,
    },
    CampusLocation {
        id: "the-matrix",
        name: "The Matrix (Cafeteria)",
        description: "Best pizza on campus. Open 7am - 10pm.",
        coordinates: Coordinates { x: 75, y: 70 },
        kind: LocationKind::Food,
    },
    CampusLocation {
        id: "spartan-arena",
        name: "Spartan Arena",
        description: "Gym, basketball courts, and Olympic pool.",
        coordinates: Coordinates { x: 80, y: 30 },
        kind: LocationKind::Facility,
    },
    CampusLocation {
        id: "innovation-center",
        name: "Innovation Center",
        description: "Startup incubator and co-working space.",
        coordinates: Coordinates { x: 30, y: 60 },
        kind: LocationKind::Academic,
    },
];

pub const EVENTS: &[CampusEvent] = &[
    CampusEvent {
        id: "1",
        title: "SIT Tech Symposium",
        date: "Oct 25",
        time: "10:00 AM",
        location: "Tech Park Auditorium",
        description: "Annual showcase of student AI and Robotics projects.",
        kind: EventKind::Academic,
    },
    CampusEvent {
        id: "2",
        title: "Career Boot Camp",
        date: "Oct 28",
        time: "2:00 PM",
        location: "Knowledge Hub, Room 101",
        description: "Resume reviews and mock interviews with industry pros.",
        kind: EventKind::Career,
    },
    CampusEvent {
        id: "3",
        title: "Spartans vs. Titans",
        date: "Nov 02",
        time: "6:00 PM",
        location: "Spartan Arena",
        description: "Championship basketball game. Free entry for students.",
        kind: EventKind::Sports,
    },
    CampusEvent {
        id: "4",
        title: "Midnight Hackathon",
        date: "Nov 05",
        time: "8:00 PM",
        location: "Innovation Center",
        description: "24-hour coding challenge. Pizza provided.",
        kind: EventKind::Academic,
    },
];

pub const QUICK_PROMPTS: &[QuickPrompt] = &[
    QuickPrompt {
        label: "Lunch Menu",
        prompt: "What's good to eat at The Matrix today?",
        icon: "🍕",
    },
    QuickPrompt {
        label: "Study Spots",
        prompt: "Where can I find a quiet place to study?",
        icon: "📖",
    },
    QuickPrompt {
        label: "Upcoming Events",
        prompt: "What events are happening on campus this week?",
        icon: "📅",
    },
    QuickPrompt {
        label: "Tech Park",
        prompt: "How do I get to the Tech Park?",
        icon: "📍",
    },
];

/// Look up a quick prompt by its 1-based position, as shown to users.
pub fn quick_prompt(number: usize) -> Option<&'static QuickPrompt> {
    number.checked_sub(1).and_then(|i| QUICK_PROMPTS.get(i))
}

/// Locations of the given kind, or all of them.
pub fn locations_of(kind: Option<LocationKind>) -> impl Iterator<Item = &'static CampusLocation> {
    LOCATIONS
        .iter()
        .filter(move |l| kind.is_none_or(|k| l.kind == k))
}

/// Events of the given kind, or all of them.
pub fn events_of(kind: Option<EventKind>) -> impl Iterator<Item = &'static CampusEvent> {
    EVENTS
        .iter()
        .filter(move |e| kind.is_none_or(|k| e.kind == k))
}
