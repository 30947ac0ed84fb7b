use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

use super::{CalendarBackend, CalendarEvent, Email, EventTime, MailBackend, NewEvent};

/// Mailbox held in memory. Clones share the record of sent messages.
#[derive(Clone, Default)]
pub struct MockMail {
    emails: Vec<Email>,
    accept: bool,
    failure: Option<String>,
    sent: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl MockMail {
    pub fn new(emails: Vec<Email>) -> Self {
        Self {
            emails,
            accept: true,
            ..Default::default()
        }
    }

    /// Every call fails with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn rejecting() -> Self {
        Self {
            accept: false,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(()),
        }
    }
}

impl MailBackend for MockMail {
    fn list_unread(&self, max_results: u32) -> Result<Vec<Email>> {
        self.check()?;
        Ok(self
            .emails
            .iter()
            .filter(|e| !e.is_read)
            .take(max_results as usize)
            .cloned()
            .collect())
    }

    fn get(&self, id: &str) -> Result<Option<Email>> {
        self.check()?;
        Ok(self.emails.iter().find(|e| e.id == id).cloned())
    }

    fn send(&self, to: &str, subject: &str, content: &str) -> Result<bool> {
        self.check()?;
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), content.to_string()));
        Ok(self.accept)
    }
}

/// Calendar held in memory. Clones share the record of created events.
#[derive(Clone, Default)]
pub struct MockCalendar {
    events: Vec<CalendarEvent>,
    failure: Option<String>,
    created: Arc<Mutex<Vec<NewEvent>>>,
    queries: Arc<Mutex<Vec<(DateTime<Utc>, DateTime<Utc>, Option<u32>)>>>,
}

impl MockCalendar {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn created(&self) -> Vec<NewEvent> {
        self.created.lock().unwrap().clone()
    }

    /// Arguments of every `list_events` call
    pub fn queries(&self) -> Vec<(DateTime<Utc>, DateTime<Utc>, Option<u32>)> {
        self.queries.lock().unwrap().clone()
    }
}

impl CalendarBackend for MockCalendar {
    fn list_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_results: Option<u32>,
    ) -> Result<Vec<CalendarEvent>> {
        self.queries.lock().unwrap().push((start, end, max_results));
        if let Some(message) = &self.failure {
            return Err(anyhow!(message.clone()));
        }
        let limit = max_results.map_or(usize::MAX, |m| m as usize);
        Ok(self
            .events
            .iter()
            .filter(|e| e.start.to_utc() < end && e.end.to_utc() > start)
            .take(limit)
            .cloned()
            .collect())
    }

    fn create_event(&self, event: &NewEvent) -> Result<CalendarEvent> {
        if let Some(message) = &self.failure {
            return Err(anyhow!(message.clone()));
        }
        let mut created = self.created.lock().unwrap();
        created.push(event.clone());
        Ok(CalendarEvent {
            id: format!("evt{}", created.len()),
            title: event.summary.clone(),
            description: Some(event.description.clone()).filter(|d| !d.is_empty()),
            start: EventTime::DateTime(event.start),
            end: EventTime::DateTime(event.end()),
            location: event.location.clone(),
            attendees: event
                .attendees
                .iter()
                .map(|email| super::Attendee {
                    email: email.clone(),
                    display_name: None,
                })
                .collect(),
        })
    }
}
