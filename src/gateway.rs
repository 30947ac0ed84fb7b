use tracing::{debug, error};

use crate::context::RequestContext;
use crate::errors::{AgentError, AgentResult};
use crate::providers::base::Provider;
use crate::providers::types::message::Message;
use crate::providers::utils::ContextLengthExceeded;

/// Single entry point to the language model.
///
/// Every completion carries the system prompt, the supplied history and the
/// new message. Provider failures are translated once here; nothing retries.
pub struct ModelGateway {
    provider: Box<dyn Provider>,
    max_tokens: Option<i32>,
}

impl ModelGateway {
    pub fn new(provider: Box<dyn Provider>, max_tokens: Option<i32>) -> Self {
        Self {
            provider,
            max_tokens,
        }
    }

    pub fn complete(
        &self,
        ctx: &RequestContext,
        history: &[Message],
        user_message: &str,
    ) -> AgentResult<String> {
        let mut messages = history.to_vec();
        messages.push(Message::user(user_message));

        match self
            .provider
            .complete(&system_prompt(ctx), &messages, self.max_tokens)
        {
            Ok((reply, usage)) => {
                debug!(
                    message_id = reply.id(),
                    input_tokens = ?usage.input_tokens,
                    output_tokens = ?usage.output_tokens,
                    total_tokens = ?usage.total_tokens,
                    "completion received"
                );
                Ok(reply.text().to_string())
            }
            Err(err) => {
                if let Some(too_large) = err.downcast_ref::<ContextLengthExceeded>() {
                    error!("Token limit exceeded: {}", too_large);
                    return Err(AgentError::ContentTooLarge {
                        detail: too_large.0.clone(),
                    });
                }
                error!("Error getting AI response: {:#}", err);
                Err(AgentError::ModelUnavailable(format!("{:#}", err)))
            }
        }
    }
}

/// Standing instructions sent with every completion.
pub fn system_prompt(ctx: &RequestContext) -> String {
    let current_date = ctx.now.format("%B %d, %Y");
    format!(
        r#"You are a helpful calendar and email assistant that can understand natural language requests and map them to specific actions.
Current date: {current_date}

Your capabilities include:
1. Email Management:
   - Reading and summarizing emails
   - Creating and sending emails
   - Retrieving specific emails
2. Calendar Management:
   - Managing calendar events
   - Scheduling meetings
   - Checking availability

When processing requests, follow these steps:
1. Identify the user's intent and required actions
2. Extract relevant parameters (e.g., number of emails, time period)
3. Map the request to available tools and actions
4. Format the response appropriately

IMPORTANT:
- Do not hallucinate. If you don't know the answer, say so and suggest alternative actions.
- When processing dates, consider the current date ({current_date}) as reference.
- For relative dates (e.g., "next week", "tomorrow"), calculate based on the current date.
Please format your responses in markdown and be concise but informative.
If you're unsure about any action, ask for clarification."#
    )
}
