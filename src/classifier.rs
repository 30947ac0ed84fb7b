//! Keyword-driven intent classification.
//!
//! Two passes share one algorithm. The first picks a [`Domain`] from the
//! model's intent string; the second picks a category inside that domain from
//! an ordered [`CategorySpec`] table and projects the model's parameters onto
//! the entities that category understands.
//!
//! Matching is first-hit in declaration order with no fallback: once a
//! category's indicators match, missing required entities fail the whole
//! classification instead of trying the next category.

use serde_json::{Map, Value};
use std::fmt;
use tracing::{info, warn};

/// Untyped parameters as produced by the model.
pub type Parameters = Map<String, Value>;

/// Parameters restricted to the entities of one category.
pub type Entities = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Email,
    Calendar,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Email => write!(f, "email"),
            Domain::Calendar => write!(f, "calendar"),
        }
    }
}

/// Domains in the order they are tested. Email wins when both match.
pub const DOMAIN_KEYWORDS: &[(Domain, &[&str])] = &[
    (
        Domain::Email,
        &[
            "email", "mail", "inbox", "message", "correspondence", "send", "write", "compose",
            "draft", "forward", "reply", "incoming", "outgoing", "unread", "read", "mailbox",
            "communication", "notify", "notification", "alert", "reminder", "announcement",
        ],
    ),
    (
        Domain::Calendar,
        &[
            "calendar", "schedule", "event", "meeting", "appointment", "booking", "reservation",
            "plan", "arrange", "organize", "time", "slot", "availability", "free", "busy",
            "occupied", "upcoming", "future", "date", "day", "week", "month", "agenda", "diary",
            "timetable", "program", "session", "conference", "call", "interview", "presentation",
        ],
    ),
];

/// First domain with any keyword contained in `intent`, case-insensitively.
pub fn detect_domain(intent: &str) -> Option<Domain> {
    let intent = intent.to_lowercase();
    DOMAIN_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(&intent, keywords))
        .map(|(domain, _)| *domain)
}

/// One row of a category table.
#[derive(Debug)]
pub struct CategorySpec<C: 'static> {
    pub category: C,
    pub indicators: &'static [&'static str],
    pub recognized: &'static [&'static str],
    pub required: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailCategory {
    Summarize,
    Send,
    Retrieve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCategory {
    Create,
    List,
    Availability,
}

pub const EMAIL_CATEGORIES: &[CategorySpec<EmailCategory>] = &[
    CategorySpec {
        category: EmailCategory::Summarize,
        indicators: &[
            "summarize", "summarise", "summary", "summaries", "summarization", "summarisation",
            "overview", "review", "recap", "recapitulate", "what's in", "what is in", "whats in",
            "what are my", "what are the", "unread", "inbox", "emails", "messages",
        ],
        recognized: &["count", "unread_only", "time_period"],
        required: &[],
    },
    CategorySpec {
        category: EmailCategory::Send,
        indicators: &[
            "send", "write", "compose", "draft", "create", "new email", "new message", "write to",
            "email to", "mail to", "message to", "forward", "reply", "respond", "response",
        ],
        recognized: &["to", "subject", "content", "cc", "bcc"],
        required: &["to", "subject", "content"],
    },
    CategorySpec {
        category: EmailCategory::Retrieve,
        indicators: &[
            "get", "retrieve", "fetch", "find", "search", "look up", "show me", "display", "view",
            "read", "open", "access", "specific", "particular", "certain", "this email",
        ],
        recognized: &["email_id", "search_query", "time_period"],
        required: &["email_id"],
    },
];

pub const CALENDAR_CATEGORIES: &[CategorySpec<CalendarCategory>] = &[
    CategorySpec {
        category: CalendarCategory::Create,
        indicators: &[
            "create", "schedule", "add", "book", "set up", "setup", "arrange", "plan",
        ],
        recognized: &[
            "event_title",
            "event_description",
            "start_date",
            "duration",
            "attendees",
            "location",
        ],
        required: &["event_title", "start_date"],
    },
    CategorySpec {
        category: CalendarCategory::List,
        indicators: &[
            "list", "show", "display", "view", "check", "retrieve", "get", "fetch",
        ],
        recognized: &["start_date", "end_date", "count"],
        required: &[],
    },
    CategorySpec {
        category: CalendarCategory::Availability,
        indicators: &["available", "availability", "free", "open", "when am i free"],
        recognized: &["start_date", "end_date", "duration"],
        required: &["start_date", "end_date", "duration"],
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct Classification<C> {
    pub category: C,
    pub entities: Entities,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unclassified<C> {
    /// No category's indicators occur in the intent
    NoIndicator,
    /// The first matching category lacks required entities
    MissingEntities {
        category: C,
        missing: Vec<&'static str>,
    },
}

/// Run the first-match classification over `table`.
///
/// A parameter whose value is JSON `null` counts as absent.
pub fn classify<C: Copy + fmt::Debug>(
    table: &[CategorySpec<C>],
    intent: &str,
    parameters: &Parameters,
) -> Result<Classification<C>, Unclassified<C>> {
    let intent = intent.to_lowercase();

    let Some(spec) = table
        .iter()
        .find(|spec| contains_any(&intent, spec.indicators))
    else {
        warn!("No matching intent category found for: {}", intent);
        return Err(Unclassified::NoIndicator);
    };

    let entities: Entities = spec
        .recognized
        .iter()
        .filter_map(|name| match parameters.get(*name) {
            Some(Value::Null) | None => None,
            Some(value) => Some((name.to_string(), value.clone())),
        })
        .collect();

    let missing: Vec<&'static str> = spec
        .required
        .iter()
        .copied()
        .filter(|name| !entities.contains_key(*name))
        .collect();

    if !missing.is_empty() {
        warn!(
            "Missing required entities for {:?} intent: {:?}",
            spec.category, missing
        );
        return Err(Unclassified::MissingEntities {
            category: spec.category,
            missing,
        });
    }

    info!(entities = ?entities, "Detected {:?} intent", spec.category);
    Ok(Classification {
        category: spec.category,
        entities,
    })
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
