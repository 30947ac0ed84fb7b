//! Markdown rendering of dispatch outcomes and errors.

use chrono::{DateTime, Utc};

use crate::backend::{CalendarEvent, Email, EmailSummary, EventTime, TimeSlot};
use crate::dispatcher::Outcome;
use crate::errors::AgentError;

const DAY: &str = "%B %d, %Y";
const STAMP: &str = "%Y-%m-%d %H:%M";

pub fn render(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Answer(text) => text.clone(),
        Outcome::EmailSummary(summary) => email_summary(summary),
        Outcome::EmailSent { .. } => "## ✅ Email Sent Successfully".to_string(),
        Outcome::EmailSendFailed { to } => format!(
            "## ❌ Failed to Send Email\nThe mail service did not accept the message to {}.",
            to
        ),
        Outcome::EmailCancelled { to } => {
            format!("## ✉️ Email Not Sent\nThe email to {} was not sent.", to)
        }
        Outcome::Email(email) => email_details(email),
        Outcome::EmailNotFound { id } => {
            format!("## ❌ Email Not Found\nNo email with ID `{}` was found.", id)
        }
        Outcome::EventCreated(event) => event_created(event),
        Outcome::Events { start, end, events } => event_list(*start, *end, events),
        Outcome::Slots {
            start,
            end,
            duration_minutes,
            slots,
        } => free_slots(*start, *end, *duration_minutes, slots),
    }
}

/// User-facing sentence for a failed request. The session carries on after it.
pub fn render_error(err: &AgentError) -> String {
    match err {
        AgentError::ModelUnavailable(detail) => format!(
            "I'm sorry, I couldn't get a response from the AI model ({}). Please check your connection and API key, then try again.",
            detail
        ),
        AgentError::ContentTooLarge { .. } => format!("I'm sorry. {}", err),
        AgentError::MalformedAnalysis(_) => {
            "I encountered an error analyzing your request. Please try rephrasing it.".to_string()
        }
        AgentError::UnclassifiedIntent { domain } => format!(
            "## ❌ Unclear Intent\nI couldn't determine what {} action you want to perform. Please try again with more specific details.",
            domain
        ),
        AgentError::InvalidParameter { entity, reason } => format!(
            "## ❌ Invalid Request\nI couldn't use the `{}` you gave: {}. Please try again with a corrected value.",
            entity, reason
        ),
        AgentError::BackendFailure { operation, message } => {
            format!("I encountered an error while {}: {}", operation, message)
        }
    }
}

fn email_summary(summary: &EmailSummary) -> String {
    let recent: Vec<String> = summary
        .recent_emails
        .iter()
        .map(|email| {
            format!(
                "• **{}**\n  From: {}\n  Date: {}",
                email.subject,
                email.sender,
                email.timestamp.format(STAMP)
            )
        })
        .collect();

    format!(
        "## 📧 Email Summary\n\n\
         ### 📊 Overview\n\
         - **Total Emails:** {}\n\
         - **Unread Count:** {}\n\n\
         ### 📝 AI-Generated Summary\n\
         {}\n\n\
         ### 📋 Recent Emails\n\
         {}",
        summary.total_emails,
        summary.unread_count,
        summary.summary,
        recent.join("\n")
    )
}

fn email_details(email: &Email) -> String {
    let status = if email.is_read { "📖 Read" } else { "📨 Unread" };
    let mut out = format!(
        "## 📧 Email Details\n\n\
         ### Message Information\n\
         - **Subject:** {}\n\
         - **From:** {}\n\
         - **To:** {}\n\
         - **Date:** {}\n\
         - **Status:** {}\n",
        email.subject,
        email.sender,
        email.recipient,
        email.timestamp.format(STAMP),
        status
    );
    if !email.attachments.is_empty() {
        out.push_str(&format!("- **Attachments:** {}\n", email.attachments.join(", ")));
    }
    out.push_str(&format!("\n### Content\n{}", email.content));
    out
}

fn event_created(event: &CalendarEvent) -> String {
    let attendees: Vec<&str> = event.attendees.iter().map(|a| a.email.as_str()).collect();
    format!(
        "## ✅ Event Created Successfully\n\n\
         ### Event Details\n\
         - **Title:** {}\n\
         - **Start:** {}\n\
         - **End:** {}\n\
         - **Location:** {}\n\
         - **Attendees:** {}\n\
         - **Description:** {}",
        event.title,
        long_time(event.start),
        long_time(event.end),
        event.location.as_deref().unwrap_or("No location"),
        or_none(&attendees.join(", "), "No attendees"),
        or_none(event.description.as_deref().unwrap_or_default(), "No description"),
    )
}

fn event_list(start: DateTime<Utc>, end: DateTime<Utc>, events: &[CalendarEvent]) -> String {
    if events.is_empty() {
        return format!(
            "## 📅 No Events Found\n\nNo events found between {} and {}.",
            start.format(STAMP),
            end.format(STAMP)
        );
    }

    let items: Vec<String> = events
        .iter()
        .map(|event| {
            let attendees: Vec<&str> = event
                .attendees
                .iter()
                .map(|a| a.display_name.as_deref().unwrap_or(&a.email))
                .collect();
            format!(
                "• **{}**\n  📅 {}\n  📍 {}\n  👥 {}",
                event.title,
                time_range(event.start, event.end),
                event.location.as_deref().unwrap_or("No location"),
                or_none(&attendees.join(", "), "No attendees"),
            )
        })
        .collect();

    format!(
        "## 📅 Calendar Events ({} to {})\n\n{}",
        start.format(DAY),
        end.format(DAY),
        items.join("\n")
    )
}

fn free_slots(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    duration_minutes: u32,
    slots: &[TimeSlot],
) -> String {
    if slots.is_empty() {
        return format!(
            "## ⏰ No Available Slots Found\n\nNo {}-minute slots available between {} and {}.",
            duration_minutes,
            start.format(STAMP),
            end.format(STAMP)
        );
    }

    let items: Vec<String> = slots
        .iter()
        .map(|slot| format!("• {} - {}", slot.start.format(STAMP), slot.end.format(STAMP)))
        .collect();
    format!(
        "## ⏰ Available Time Slots\n\nFound {} available {}-minute slots:\n\n{}",
        slots.len(),
        duration_minutes,
        items.join("\n")
    )
}

fn long_time(time: EventTime) -> String {
    match time {
        EventTime::DateTime(at) => at.format("%B %d, %Y at %I:%M %p").to_string(),
        EventTime::Date(day) => format!("{} (all day)", day.format(DAY)),
    }
}

fn time_range(start: EventTime, end: EventTime) -> String {
    match (start, end) {
        (EventTime::DateTime(s), EventTime::DateTime(e)) => {
            format!("{} - {}", s.format("%I:%M %p"), e.format("%I:%M %p"))
        }
        _ => "All day".to_string(),
    }
}

fn or_none<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
