//! Mailbox and calendar operations the dispatcher executes.
//!
//! The traits are the seam to whatever service holds the user's data; the
//! records they return are read-only snapshots.

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scheduling;

pub mod google;
#[cfg(test)]
pub mod mock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub id: String,
    pub subject: String,
    pub sender: String,
    pub recipient: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    #[serde(default)]
    pub attachments: Vec<String>,
}

impl Email {
    /// Copy with the body cut to `max_chars` characters plus `...`
    pub fn truncated(&self, max_chars: usize) -> Email {
        let mut copy = self.clone();
        if let Some((cut, _)) = self.content.char_indices().nth(max_chars) {
            copy.content = format!("{}...", &self.content[..cut]);
        }
        copy
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailSummary {
    pub total_emails: usize,
    pub unread_count: usize,
    pub recent_emails: Vec<Email>,
    pub summary: String,
}

/// Start or end of an event: a precise instant, or a whole day for all-day events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

impl EventTime {
    /// All-day values resolve to midnight UTC.
    pub fn to_utc(self) -> DateTime<Utc> {
        match self {
            EventTime::DateTime(at) => at,
            EventTime::Date(day) => day.and_time(NaiveTime::default()).and_utc(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    pub location: Option<String>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

/// Validated request to create an event.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub duration_minutes: u32,
    pub attendees: Vec<String>,
    pub location: Option<String>,
}

impl NewEvent {
    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(i64::from(self.duration_minutes))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

pub trait MailBackend {
    /// Most recent unread messages, newest first
    fn list_unread(&self, max_results: u32) -> Result<Vec<Email>>;

    fn get(&self, id: &str) -> Result<Option<Email>>;

    /// Returns whether the provider accepted the message
    fn send(&self, to: &str, subject: &str, content: &str) -> Result<bool>;
}

pub trait CalendarBackend {
    /// Events overlapping `[start, end]`, ordered by start time
    fn list_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_results: Option<u32>,
    ) -> Result<Vec<CalendarEvent>>;

    fn create_event(&self, event: &NewEvent) -> Result<CalendarEvent>;

    fn find_free_slots(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        duration_minutes: u32,
    ) -> Result<Vec<TimeSlot>> {
        let events = self.list_events(start, end, None)?;
        let busy: Vec<TimeSlot> = events
            .iter()
            .map(|event| TimeSlot {
                start: event.start.to_utc(),
                end: event.end.to_utc(),
            })
            .collect();
        Ok(scheduling::free_slots(
            start,
            end,
            busy,
            Duration::minutes(i64::from(duration_minutes)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn email(content: &str) -> Email {
        Email {
            id: "1".to_string(),
            subject: "s".to_string(),
            sender: "a@example.com".to_string(),
            recipient: "b@example.com".to_string(),
            content: content.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            is_read: false,
            attachments: vec![],
        }
    }

    #[test]
    fn test_truncated_long_content() {
        let long = "x".repeat(1200);
        let cut = email(&long).truncated(1000);
        assert_eq!(cut.content.len(), 1003);
        assert!(cut.content.ends_with("..."));
    }

    #[test]
    fn test_truncated_short_content_is_untouched() {
        let original = email("short");
        assert_eq!(original.truncated(1000), original);
        assert_eq!(email(&"y".repeat(1000)).truncated(1000).content.len(), 1000);
    }

    #[test]
    fn test_truncated_respects_char_boundaries() {
        let cut = email("héllo wörld").truncated(4);
        assert_eq!(cut.content, "héll...");
    }

    #[test]
    fn test_all_day_event_resolves_to_midnight() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(
            EventTime::Date(day).to_utc(),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_new_event_end() {
        let event = NewEvent {
            summary: "Sync".to_string(),
            description: String::new(),
            start: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
            duration_minutes: 45,
            attendees: vec![],
            location: None,
        };
        assert_eq!(event.end(), Utc.with_ymd_and_hms(2024, 6, 1, 9, 45, 0).unwrap());
    }
}
