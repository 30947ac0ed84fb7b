use anyhow::Result;
use tracing::info;

use crate::agent::Agent;
use crate::prompt::{InputType, Prompt};

/// Interactive loop: read a line, answer it, repeat until `exit` or an interrupt.
pub struct Session<P: Prompt> {
    agent: Agent,
    prompt: P,
}

impl<P: Prompt> Session<P> {
    pub fn new(agent: Agent, prompt: P) -> Self {
        Session { agent, prompt }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// Failed requests are answered with a message; only input errors end the loop early.
    pub fn start(&mut self) -> Result<()> {
        info!("Session started");
        self.prompt.welcome();

        loop {
            let input = self.prompt.get_input()?;
            let content = match input.input_type {
                InputType::Exit => break,
                InputType::AskAgain => continue,
                InputType::Message => match input.content {
                    Some(content) => content,
                    None => continue,
                },
            };

            self.prompt.show_busy();
            let response = self.agent.reply(&content, &mut self.prompt);
            self.prompt.hide_busy();
            self.prompt.render(&response);
        }

        info!("Session ended");
        self.prompt.close();
        Ok(())
    }
}
