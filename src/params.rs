//! Conversion of classified entities into typed, validated requests.
//!
//! The model emits loosely typed JSON. Nothing reaches a backend until the
//! values for its category have passed through one of these constructors.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::backend::NewEvent;
use crate::classifier::Entities;
use crate::errors::{AgentError, AgentResult};

pub const DEFAULT_EMAIL_COUNT: u32 = 5;
pub const DEFAULT_EVENT_COUNT: u32 = 5;
pub const DEFAULT_EVENT_MINUTES: u32 = 60;
pub const DEFAULT_LIST_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct SummarizeRequest {
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SendRequest {
    pub to: String,
    pub subject: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetrieveRequest {
    pub email_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListEventsRequest {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityRequest {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: u32,
}

impl SummarizeRequest {
    pub fn from_entities(entities: &Entities) -> AgentResult<Self> {
        Ok(Self {
            count: positive(entities, "count")?.unwrap_or(DEFAULT_EMAIL_COUNT),
        })
    }
}

impl SendRequest {
    pub fn from_entities(entities: &Entities) -> AgentResult<Self> {
        let to = required_text(entities, "to")?;
        if !is_email_address(&to) {
            return Err(AgentError::invalid("to", format!("'{}' is not an email address", to)));
        }
        let subject = required_text(entities, "subject")?;
        if subject.contains(&['\r', '\n'][..]) {
            return Err(AgentError::invalid("subject", "must be a single line"));
        }
        Ok(Self {
            to,
            subject,
            content: required_text(entities, "content")?,
        })
    }
}

impl RetrieveRequest {
    pub fn from_entities(entities: &Entities) -> AgentResult<Self> {
        let email_id = required_text(entities, "email_id")?;
        if !is_message_id(&email_id) {
            return Err(AgentError::invalid(
                "email_id",
                format!("'{}' is not a message id", email_id),
            ));
        }
        Ok(Self { email_id })
    }
}

impl ListEventsRequest {
    /// Absent start is `now`; absent end is seven days after the start.
    pub fn from_entities(entities: &Entities, now: DateTime<Utc>) -> AgentResult<Self> {
        let start = match text(entities, "start_date")? {
            Some(raw) => parse_start(&raw).ok_or_else(|| bad_date("start_date", &raw))?,
            None => now,
        };
        let end = match text(entities, "end_date")? {
            Some(raw) => parse_end(&raw).ok_or_else(|| bad_date("end_date", &raw))?,
            None => start + Duration::days(DEFAULT_LIST_DAYS),
        };
        ensure_ordered(start, end)?;
        Ok(Self {
            start,
            end,
            count: positive(entities, "count")?.unwrap_or(DEFAULT_EVENT_COUNT),
        })
    }
}

impl AvailabilityRequest {
    pub fn from_entities(entities: &Entities) -> AgentResult<Self> {
        let raw_start = required_text(entities, "start_date")?;
        let raw_end = required_text(entities, "end_date")?;
        let start = parse_start(&raw_start).ok_or_else(|| bad_date("start_date", &raw_start))?;
        let end = parse_end(&raw_end).ok_or_else(|| bad_date("end_date", &raw_end))?;
        ensure_ordered(start, end)?;
        let duration_minutes = positive(entities, "duration")?
            .ok_or_else(|| AgentError::invalid("duration", "is required"))?;
        Ok(Self {
            start,
            end,
            duration_minutes,
        })
    }
}

/// Build an event from `create` entities; duration defaults to an hour.
pub fn new_event(entities: &Entities) -> AgentResult<NewEvent> {
    let summary = required_text(entities, "event_title")?;
    let raw_start = required_text(entities, "start_date")?;
    let start = parse_start(&raw_start).ok_or_else(|| bad_date("start_date", &raw_start))?;

    let attendees = match entities.get("attendees") {
        None => Vec::new(),
        Some(Value::String(list)) => split_addresses(list),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(|s| s.trim().to_string())
                    .ok_or_else(|| AgentError::invalid("attendees", "expected email addresses"))
            })
            .collect::<AgentResult<Vec<_>>>()?,
        Some(_) => return Err(AgentError::invalid("attendees", "expected a list of addresses")),
    };
    if let Some(bad) = attendees.iter().find(|a| !is_email_address(a)) {
        return Err(AgentError::invalid(
            "attendees",
            format!("'{}' is not an email address", bad),
        ));
    }

    Ok(NewEvent {
        summary,
        description: text(entities, "event_description")?.unwrap_or_default(),
        start,
        duration_minutes: positive(entities, "duration")?.unwrap_or(DEFAULT_EVENT_MINUTES),
        attendees,
        location: text(entities, "location")?.filter(|l| !l.is_empty()),
    })
}

/// Parse a range start: RFC 3339, a naive datetime taken as UTC, or a date at 00:00:00.
pub fn parse_start(raw: &str) -> Option<DateTime<Utc>> {
    parse_instant(raw).or_else(|| {
        parse_date(raw).map(|day| day.and_time(NaiveTime::default()).and_utc())
    })
}

/// Parse a range end: like [`parse_start`], but a bare date means 23:59:59.
pub fn parse_end(raw: &str) -> Option<DateTime<Utc>> {
    parse_instant(raw).or_else(|| {
        parse_date(raw)
            .and_then(|day| day.and_hms_opt(23, 59, 59))
            .map(|at| at.and_utc())
    })
}

pub fn is_email_address(candidate: &str) -> bool {
    static ADDRESS: OnceLock<Regex> = OnceLock::new();
    ADDRESS
        .get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
                .expect("address pattern compiles")
        })
        .is_match(candidate)
}

/// Gmail message ids are URL-safe tokens.
pub fn is_message_id(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|at| at.and_utc())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn split_addresses(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn ensure_ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> AgentResult<()> {
    if end < start {
        return Err(AgentError::invalid("end_date", "is before start_date"));
    }
    Ok(())
}

fn bad_date(entity: &str, raw: &str) -> AgentError {
    AgentError::invalid(entity, format!("'{}' is not a date (expected YYYY-MM-DD)", raw))
}

fn text(entities: &Entities, name: &str) -> AgentResult<Option<String>> {
    match entities.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(AgentError::invalid(name, "expected text")),
    }
}

fn required_text(entities: &Entities, name: &str) -> AgentResult<String> {
    text(entities, name)?
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AgentError::invalid(name, "must not be empty"))
}

/// A count or duration: a positive integer, given as a number or numeric text.
fn positive(entities: &Entities, name: &str) -> AgentResult<Option<u32>> {
    let value = match entities.get(name) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };
    match value.and_then(|v| u32::try_from(v).ok()) {
        Some(v) if v > 0 => Ok(Some(v)),
        _ => Err(AgentError::invalid(name, "expected a positive whole number")),
    }
}
