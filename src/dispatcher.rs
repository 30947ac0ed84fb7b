//! Turns one utterance into an [`Outcome`]: analysis, domain routing,
//! classification, validation, backend call.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::analysis::{analysis_prompt, parse_analysis, AnalysisDescriptor};
use crate::backend::{
    CalendarBackend, CalendarEvent, Email, EmailSummary, MailBackend, TimeSlot,
};
use crate::classifier::{
    classify, detect_domain, CalendarCategory, Domain, EmailCategory, CALENDAR_CATEGORIES,
    EMAIL_CATEGORIES,
};
use crate::context::RequestContext;
use crate::errors::{AgentError, AgentResult};
use crate::format::{render, render_error};
use crate::gateway::ModelGateway;
use crate::params::{
    new_event, AvailabilityRequest, ListEventsRequest, RetrieveRequest, SendRequest,
    SummarizeRequest,
};
use crate::prompt::Prompt;
use crate::providers::types::message::Message;

/// Email bodies are cut to this many characters before summarization.
pub const MAX_EMAIL_CHARS: usize = 1000;

/// Result of a successfully dispatched request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Free-text answer to a request outside both domains
    Answer(String),
    EmailSummary(EmailSummary),
    EmailSent { to: String },
    EmailSendFailed { to: String },
    /// The user declined to send
    EmailCancelled { to: String },
    Email(Email),
    EmailNotFound { id: String },
    EventCreated(CalendarEvent),
    Events {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        events: Vec<CalendarEvent>,
    },
    Slots {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        duration_minutes: u32,
        slots: Vec<TimeSlot>,
    },
}

pub struct Dispatcher {
    gateway: ModelGateway,
    mail: Box<dyn MailBackend>,
    calendar: Box<dyn CalendarBackend>,
}

fn backend_failure(operation: &'static str) -> impl FnOnce(anyhow::Error) -> AgentError {
    move |err| {
        error!("Error while {}: {:#}", operation, err);
        AgentError::backend(operation, format!("{:#}", err))
    }
}

impl Dispatcher {
    pub fn new(
        gateway: ModelGateway,
        mail: Box<dyn MailBackend>,
        calendar: Box<dyn CalendarBackend>,
    ) -> Self {
        Self {
            gateway,
            mail,
            calendar,
        }
    }

    /// Run the pipeline and render the result, successful or not.
    pub fn respond(
        &self,
        ctx: &RequestContext,
        history: &[Message],
        input: &str,
        prompt: &mut dyn Prompt,
    ) -> String {
        match self.process(ctx, history, input, prompt) {
            Ok(outcome) => render(&outcome),
            Err(err) => render_error(&err),
        }
    }

    pub fn process(
        &self,
        ctx: &RequestContext,
        history: &[Message],
        input: &str,
        prompt: &mut dyn Prompt,
    ) -> AgentResult<Outcome> {
        info!("Processing command: {}", input);

        let raw = self
            .gateway
            .complete(ctx, history, &analysis_prompt(ctx, input))?;
        info!("Raw AI analysis response: {}", raw);

        let analysis = parse_analysis(&raw).inspect_err(|err| {
            error!("Error parsing AI analysis: {}", err);
            error!("Raw AI response: {}", raw);
        })?;
        info!("Processing intent: {}", analysis.intent);

        match detect_domain(&analysis.intent) {
            Some(Domain::Email) => self.handle_email(ctx, history, &analysis, prompt),
            Some(Domain::Calendar) => self.handle_calendar(ctx, &analysis),
            None => {
                info!("No specific intent detected, answering directly");
                self.gateway
                    .complete(ctx, history, input)
                    .map(Outcome::Answer)
            }
        }
    }

    fn handle_email(
        &self,
        ctx: &RequestContext,
        history: &[Message],
        analysis: &AnalysisDescriptor,
        prompt: &mut dyn Prompt,
    ) -> AgentResult<Outcome> {
        let classified = classify(EMAIL_CATEGORIES, &analysis.intent, &analysis.parameters)
            .map_err(|_| AgentError::UnclassifiedIntent {
                domain: Domain::Email,
            })?;

        match classified.category {
            EmailCategory::Summarize => {
                let request = SummarizeRequest::from_entities(&classified.entities)?;
                info!("Requested email count: {}", request.count);
                self.summarize(ctx, history, request.count)
                    .map(Outcome::EmailSummary)
            }
            EmailCategory::Send => {
                let request = SendRequest::from_entities(&classified.entities)?;
                self.send(ctx, history, request, prompt)
            }
            EmailCategory::Retrieve => {
                let request = RetrieveRequest::from_entities(&classified.entities)?;
                info!("Retrieving email with ID: {}", request.email_id);
                match self
                    .mail
                    .get(&request.email_id)
                    .map_err(backend_failure("retrieving the email"))?
                {
                    Some(email) => Ok(Outcome::Email(email)),
                    None => {
                        warn!("No email found with ID: {}", request.email_id);
                        Ok(Outcome::EmailNotFound {
                            id: request.email_id,
                        })
                    }
                }
            }
        }
    }

    fn handle_calendar(
        &self,
        ctx: &RequestContext,
        analysis: &AnalysisDescriptor,
    ) -> AgentResult<Outcome> {
        let classified = classify(CALENDAR_CATEGORIES, &analysis.intent, &analysis.parameters)
            .map_err(|_| AgentError::UnclassifiedIntent {
                domain: Domain::Calendar,
            })?;

        match classified.category {
            CalendarCategory::Create => {
                let event = new_event(&classified.entities)?;
                info!("Creating calendar event: {}", event.summary);
                self.calendar
                    .create_event(&event)
                    .map(Outcome::EventCreated)
                    .map_err(backend_failure("creating the calendar event"))
            }
            CalendarCategory::List => {
                let request = ListEventsRequest::from_entities(&classified.entities, ctx.now)?;
                info!(
                    "Listing up to {} events from {} to {}",
                    request.count, request.start, request.end
                );
                let events = self
                    .calendar
                    .list_events(request.start, request.end, Some(request.count))
                    .map_err(backend_failure("listing calendar events"))?;
                Ok(Outcome::Events {
                    start: request.start,
                    end: request.end,
                    events,
                })
            }
            CalendarCategory::Availability => {
                let request = AvailabilityRequest::from_entities(&classified.entities)?;
                let slots = self
                    .calendar
                    .find_free_slots(request.start, request.end, request.duration_minutes)
                    .map_err(backend_failure("checking availability"))?;
                info!("Found {} free slots", slots.len());
                Ok(Outcome::Slots {
                    start: request.start,
                    end: request.end,
                    duration_minutes: request.duration_minutes,
                    slots,
                })
            }
        }
    }

    fn summarize(
        &self,
        ctx: &RequestContext,
        history: &[Message],
        count: u32,
    ) -> AgentResult<EmailSummary> {
        let emails = self
            .mail
            .list_unread(count)
            .map_err(backend_failure("summarizing emails"))?;
        info!("Retrieved {} emails", emails.len());

        if emails.is_empty() {
            warn!("No emails retrieved");
            return Err(AgentError::backend(
                "summarizing emails",
                "No emails were retrieved. Please check your Gmail API access.",
            ));
        }

        let email_texts: Vec<String> = emails
            .iter()
            .map(|email| email.truncated(MAX_EMAIL_CHARS))
            .map(|email| {
                format!(
                    "Subject: {}\nFrom: {}\nContent: {}",
                    email.subject, email.sender, email.content
                )
            })
            .collect();
        let summary_prompt = format!(
            "Please provide a concise summary (less than 500 words) of these {} emails:\n\n{}\n\nFocus on the key points and most important information.",
            emails.len(),
            email_texts.join("\n\n")
        );
        let summary = self.gateway.complete(ctx, history, &summary_prompt)?;

        Ok(EmailSummary {
            total_emails: emails.len(),
            unread_count: emails.iter().filter(|e| !e.is_read).count(),
            recent_emails: emails,
            summary,
        })
    }

    /// Review, confirm, then send. Only an explicit yes reaches the backend.
    fn send(
        &self,
        ctx: &RequestContext,
        history: &[Message],
        request: SendRequest,
        prompt: &mut dyn Prompt,
    ) -> AgentResult<Outcome> {
        info!("Starting email send process to: {}", request.to);
        let review_prompt = format!(
            "Please review this email:\nTo: {}\nSubject: {}\nContent: {}\n\nIs this appropriate to send?",
            request.to, request.subject, request.content
        );
        let review = self.gateway.complete(ctx, history, &review_prompt)?;

        prompt.hide_busy();
        prompt.render(&review);
        let confirmed = match prompt.confirm("Would you like to send this email?") {
            Ok(answer) => answer,
            Err(err) => {
                warn!("Confirmation prompt failed: {:#}", err);
                false
            }
        };
        info!("User choice for sending email: {}", confirmed);

        if !confirmed {
            return Ok(Outcome::EmailCancelled { to: request.to });
        }

        prompt.show_busy();
        let accepted = self
            .mail
            .send(&request.to, &request.subject, &request.content)
            .map_err(backend_failure("sending the email"))?;
        if accepted {
            info!("Email sent successfully");
            Ok(Outcome::EmailSent { to: request.to })
        } else {
            error!("Mail backend did not accept the message");
            Ok(Outcome::EmailSendFailed { to: request.to })
        }
    }
}
