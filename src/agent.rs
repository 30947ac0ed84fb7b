use tracing::info;

use crate::context::RequestContext;
use crate::conversation::ConversationHistory;
use crate::dispatcher::Dispatcher;
use crate::prompt::Prompt;
use crate::providers::types::message::Role;

/// One conversation: its bounded history and the pipeline that answers it.
pub struct Agent {
    history: ConversationHistory,
    dispatcher: Dispatcher,
}

impl Agent {
    pub fn new(dispatcher: Dispatcher, max_history: usize) -> Self {
        Self {
            history: ConversationHistory::new(max_history),
            dispatcher,
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn reply(&mut self, input: &str, prompt: &mut dyn Prompt) -> String {
        self.reply_with(&RequestContext::new(), input, prompt)
    }

    /// Answer `input` and record both sides of the exchange.
    ///
    /// The model sees the history as it stood before this turn.
    pub fn reply_with(
        &mut self,
        ctx: &RequestContext,
        input: &str,
        prompt: &mut dyn Prompt,
    ) -> String {
        let _span = ctx.span().entered();

        let context = self.history.to_vec();
        self.history.add_message(Role::User, input);
        let response = self.dispatcher.respond(ctx, &context, input, prompt);
        self.history.add_message(Role::Assistant, &response);

        info!(history = self.history.len(), "turn complete");
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{MockCalendar, MockMail};
    use crate::gateway::ModelGateway;
    use crate::prompt::mock::MockPrompt;
    use crate::providers::mock::MockProvider;

    fn agent(provider: &MockProvider, max_history: usize) -> Agent {
        let dispatcher = Dispatcher::new(
            ModelGateway::new(Box::new(provider.clone()), None),
            Box::new(MockMail::default()),
            Box::new(MockCalendar::default()),
        );
        Agent::new(dispatcher, max_history)
    }

    #[test]
    fn test_turn_records_user_and_assistant() {
        let provider = MockProvider::new(vec![
            r#"{"intent": "small talk", "parameters": {}}"#,
            "Hello there!",
        ]);
        let mut agent = agent(&provider, 10);

        let reply = agent.reply("hi", &mut MockPrompt::default());
        assert_eq!(reply, "Hello there!");

        let messages: Vec<_> = agent.history().messages().collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role(), Role::User);
        assert_eq!(messages[0].text(), "hi");
        assert_eq!(messages[1].role(), Role::Assistant);
        assert_eq!(messages[1].text(), "Hello there!");
    }

    #[test]
    fn test_errors_are_recorded_as_replies() {
        let provider = MockProvider::new(vec!["not json"]);
        let mut agent = agent(&provider, 10);

        let reply = agent.reply("calendar please", &mut MockPrompt::default());
        assert!(reply.contains("rephrasing"));
        assert_eq!(agent.history().len(), 2);
    }

    #[test]
    fn test_history_stays_bounded() {
        let provider = MockProvider::default();
        let mut agent = agent(&provider, 3);

        for i in 0..5 {
            agent.reply(&format!("message {}", i), &mut MockPrompt::default());
            assert!(agent.history().len() <= 3);
        }
        let last = agent.history().messages().last().unwrap();
        assert_eq!(last.role(), Role::Assistant);
    }

    #[test]
    fn test_previous_turns_reach_the_model() {
        let provider = MockProvider::new(vec![
            r#"{"intent": "small talk", "parameters": {}}"#,
            "Hi!",
            r#"{"intent": "small talk", "parameters": {}}"#,
            "Still here.",
        ]);
        let mut agent = agent(&provider, 10);
        agent.reply("hello", &mut MockPrompt::default());
        agent.reply("are you there?", &mut MockPrompt::default());

        let calls = provider.calls();
        // third call is the analysis of the second turn
        let texts: Vec<&str> = calls[2].iter().map(|m| m.text()).collect();
        assert_eq!(texts[0], "hello");
        assert_eq!(texts[1], "Hi!");
        assert_eq!(texts.len(), 3);
    }
}
