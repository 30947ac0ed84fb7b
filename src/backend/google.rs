use anyhow::{anyhow, bail, Context, Result};
use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD},
    Engine as _,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::{Attendee, CalendarBackend, CalendarEvent, Email, EventTime, MailBackend, NewEvent};
use crate::providers::configs::google::GoogleConfig;

fn build_client(config: &GoogleConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

fn endpoint(host: &str, path: &str) -> String {
    format!("{}/{}", host.trim_end_matches('/'), path)
}

fn execute(request: RequestBuilder, token: &str) -> Result<Response> {
    check(request.bearer_auth(token).send()?)
}

fn check(response: Response) -> Result<Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        status if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() => {
            Err(anyhow!("Server error: {}", status))
        }
        status => {
            let body = response.text().unwrap_or_default();
            Err(anyhow!("Request failed: {}\nBody: {}", status, body))
        }
    }
}

/// One `Name: value` header line. Non-ASCII values are RFC 2047 encoded.
fn mime_header(name: &str, value: &str) -> Result<String> {
    if value.contains(&['\r', '\n'][..]) {
        bail!("{} header must be a single line", name);
    }
    if value.is_ascii() {
        Ok(format!("{}: {}\r\n", name, value))
    } else {
        Ok(format!("{}: =?UTF-8?B?{}?=\r\n", name, STANDARD.encode(value)))
    }
}

fn plain_text_message(to: &str, subject: &str, content: &str) -> Result<String> {
    Ok(format!(
        "{}{}Content-Type: text/plain; charset=\"UTF-8\"\r\n\r\n{}",
        mime_header("To", to)?,
        mime_header("Subject", subject)?,
        content
    ))
}

/// Gmail REST adapter.
pub struct GmailClient {
    client: Client,
    config: GoogleConfig,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GmailMessage {
    id: String,
    #[serde(default)]
    label_ids: Vec<String>,
    internal_date: Option<String>,
    payload: Option<MessagePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessagePart {
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    filename: String,
    #[serde(default)]
    headers: Vec<Header>,
    body: Option<PartBody>,
    #[serde(default)]
    parts: Vec<MessagePart>,
}

#[derive(Debug, Deserialize)]
struct Header {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct PartBody {
    data: Option<String>,
}

impl MessagePart {
    fn header(&self, name: &str) -> String {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.clone())
            .unwrap_or_default()
    }

    fn data(&self) -> Option<&str> {
        self.body.as_ref().and_then(|b| b.data.as_deref())
    }

    /// Plain-text part if there is one, else the first part, else the top-level body.
    fn text(&self) -> Result<String> {
        let data = self
            .parts
            .iter()
            .find(|p| p.mime_type == "text/plain" && p.data().is_some())
            .or_else(|| self.parts.first())
            .and_then(MessagePart::data)
            .or_else(|| self.data());
        match data {
            Some(encoded) => decode_body(encoded),
            None => Ok(String::new()),
        }
    }

    fn attachments(&self) -> Vec<String> {
        self.parts
            .iter()
            .filter(|p| !p.filename.is_empty())
            .map(|p| p.filename.clone())
            .collect()
    }
}

/// Gmail bodies are base64url, with or without padding.
fn decode_body(encoded: &str) -> Result<String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim_end_matches('='))
        .context("message body is not valid base64url")?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl GmailMessage {
    fn into_email(self) -> Result<Email> {
        let payload = self.payload.unwrap_or_default();
        let timestamp = self
            .internal_date
            .as_deref()
            .and_then(|ms| ms.parse::<i64>().ok())
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .unwrap_or_default();

        Ok(Email {
            subject: payload.header("Subject"),
            sender: payload.header("From"),
            recipient: payload.header("To"),
            content: payload.text()?,
            attachments: payload.attachments(),
            timestamp,
            is_read: !self.label_ids.iter().any(|l| l == "UNREAD"),
            id: self.id,
        })
    }
}

impl GmailClient {
    pub fn new(config: GoogleConfig) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.config.gmail_host, path)
    }

    /// The id is appended as a single escaped path segment.
    fn message_url(&self, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.url("gmail/v1/users/me/messages"))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Gmail host {} cannot carry a path", self.config.gmail_host))?
            .push(id);
        Ok(url)
    }

    fn fetch(&self, id: &str) -> Result<Option<GmailMessage>> {
        let request = self
            .client
            .get(self.message_url(id)?)
            .query(&[("format", "full")]);
        let response = request.bearer_auth(&self.config.access_token).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(check(response)?.json()?))
    }
}

impl MailBackend for GmailClient {
    fn list_unread(&self, max_results: u32) -> Result<Vec<Email>> {
        let request = self
            .client
            .get(self.url("gmail/v1/users/me/messages"))
            .query(&[("q", "is:unread".to_string()), ("maxResults", max_results.to_string())]);
        let list: MessageList = execute(request, &self.config.access_token)?.json()?;
        debug!("Gmail returned {} unread message ids", list.messages.len());

        let mut emails = Vec::with_capacity(list.messages.len());
        for message in list.messages {
            match self.fetch(&message.id)? {
                Some(full) => emails.push(full.into_email()?),
                None => warn!("Message {} disappeared while listing", message.id),
            }
        }
        Ok(emails)
    }

    fn get(&self, id: &str) -> Result<Option<Email>> {
        self.fetch(id)?.map(GmailMessage::into_email).transpose()
    }

    fn send(&self, to: &str, subject: &str, content: &str) -> Result<bool> {
        let raw = URL_SAFE.encode(plain_text_message(to, subject, content)?.as_bytes());

        let response = self
            .client
            .post(self.url("gmail/v1/users/me/messages/send"))
            .bearer_auth(&self.config.access_token)
            .json(&json!({ "raw": raw }))
            .send()?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if status.is_client_error() {
            warn!("Gmail rejected message to {}: {}", to, status);
            return Ok(false);
        }
        Err(anyhow!("Server error: {}", status))
    }
}

/// Google Calendar REST adapter for the user's primary calendar.
pub struct GoogleCalendarClient {
    client: Client,
    config: GoogleConfig,
}

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<GoogleEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEvent {
    id: String,
    summary: Option<String>,
    description: Option<String>,
    start: GoogleTime,
    end: GoogleTime,
    location: Option<String>,
    #[serde(default)]
    attendees: Vec<GoogleAttendee>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleTime {
    date_time: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleAttendee {
    email: String,
    display_name: Option<String>,
}

impl GoogleTime {
    fn parse(&self) -> Result<EventTime> {
        if let Some(at) = &self.date_time {
            let parsed = DateTime::parse_from_rfc3339(at)
                .with_context(|| format!("invalid event dateTime {}", at))?;
            return Ok(EventTime::DateTime(parsed.with_timezone(&Utc)));
        }
        if let Some(day) = &self.date {
            let parsed = NaiveDate::parse_from_str(day, "%Y-%m-%d")
                .with_context(|| format!("invalid event date {}", day))?;
            return Ok(EventTime::Date(parsed));
        }
        Err(anyhow!("event time has neither dateTime nor date"))
    }
}

impl GoogleEvent {
    fn into_event(self) -> Result<CalendarEvent> {
        Ok(CalendarEvent {
            start: self.start.parse()?,
            end: self.end.parse()?,
            title: self.summary.unwrap_or_else(|| "(No title)".to_string()),
            description: self.description,
            location: self.location,
            attendees: self
                .attendees
                .into_iter()
                .map(|a| Attendee {
                    email: a.email,
                    display_name: a.display_name,
                })
                .collect(),
            id: self.id,
        })
    }
}

fn event_body(event: &NewEvent) -> Value {
    let mut body = json!({
        "summary": event.summary,
        "description": event.description,
        "start": { "dateTime": event.start.to_rfc3339(), "timeZone": "UTC" },
        "end": { "dateTime": event.end().to_rfc3339(), "timeZone": "UTC" },
        "attendees": event
            .attendees
            .iter()
            .map(|email| json!({ "email": email }))
            .collect::<Vec<_>>(),
    });
    if let Some(location) = &event.location {
        body["location"] = json!(location);
    }
    body
}

impl GoogleCalendarClient {
    pub fn new(config: GoogleConfig) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    fn events_url(&self) -> String {
        endpoint(&self.config.calendar_host, "calendar/v3/calendars/primary/events")
    }
}

impl CalendarBackend for GoogleCalendarClient {
    fn list_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_results: Option<u32>,
    ) -> Result<Vec<CalendarEvent>> {
        let mut query = vec![
            ("timeMin", start.to_rfc3339()),
            ("timeMax", end.to_rfc3339()),
            ("singleEvents", "true".to_string()),
            ("orderBy", "startTime".to_string()),
        ];
        if let Some(max) = max_results {
            query.push(("maxResults", max.to_string()));
        }

        let request = self.client.get(self.events_url()).query(&query);
        let list: EventList = execute(request, &self.config.access_token)?.json()?;
        list.items.into_iter().map(GoogleEvent::into_event).collect()
    }

    fn create_event(&self, event: &NewEvent) -> Result<CalendarEvent> {
        let request = self
            .client
            .post(self.events_url())
            .query(&[("sendUpdates", "all")])
            .json(&event_body(event));
        let created: GoogleEvent = execute(request, &self.config.access_token)?.json()?;
        created.into_event()
    }
}
