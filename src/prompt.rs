use anyhow::Result;
use console::style;

pub mod cliclack;
#[cfg(test)]
pub mod mock;

/// The console surface the session talks to.
pub trait Prompt {
    /// Show a Markdown block to the user
    fn render(&mut self, content: &str);
    fn get_input(&mut self) -> Result<Input>;
    /// Ask a yes/no question. Anything but an explicit yes is `false`.
    fn confirm(&mut self, question: &str) -> Result<bool>;
    fn show_busy(&mut self);
    fn hide_busy(&mut self);
    fn close(&self);

    fn welcome(&self) {
        println!("{}", style("Welcome to the Calendar AI Agent!").green().bold());
        println!("I can help you manage your emails and calendar through natural language commands.\n");

        println!("{}", style("Email Commands:").yellow().bold());
        print_examples(
            "Summarize emails",
            &["Summarize my last 3 unread emails", "What's in my inbox?"],
        );
        print_examples(
            "Send emails",
            &["Send an email to john@example.com about the project update"],
        );
        print_examples("Get specific emails", &["Get email with ID abc123"]);

        println!("\n{}", style("Calendar Commands:").yellow().bold());
        print_examples(
            "Schedule events",
            &[
                "Schedule a meeting tomorrow at 2 PM",
                "Create a 1-hour event for team sync",
            ],
        );
        print_examples(
            "View calendar",
            &["What's on my calendar for next week?", "List my events for tomorrow"],
        );
        print_examples(
            "Check availability",
            &["When am I free tomorrow?", "Find a 30-minute slot for a meeting"],
        );

        println!("\n{}\n", style("Type 'exit' to quit.").red().bold());
    }
}

fn print_examples(title: &str, examples: &[&str]) {
    println!("• {}", style(format!("{}:", title)).cyan());
    for example in examples {
        println!("  - '{}'", example);
    }
}

pub struct Input {
    pub input_type: InputType,
    pub content: Option<String>, // None for control commands such as Exit
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    AskAgain, // Blank line, prompt again
    Message,  // User sent a request
    Exit,     // `exit` or an interrupt
}

impl Input {
    /// Classify one line of user text.
    pub fn from_line(line: &str) -> Input {
        let text = line.trim();
        if text.eq_ignore_ascii_case("exit") {
            Input {
                input_type: InputType::Exit,
                content: None,
            }
        } else if text.is_empty() {
            Input {
                input_type: InputType::AskAgain,
                content: None,
            }
        } else {
            Input {
                input_type: InputType::Message,
                content: Some(text.to_string()),
            }
        }
    }

    pub fn exit() -> Input {
        Input {
            input_type: InputType::Exit,
            content: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_is_case_insensitive() {
        assert_eq!(Input::from_line("exit").input_type, InputType::Exit);
        assert_eq!(Input::from_line("  EXIT \n").input_type, InputType::Exit);
        assert_eq!(Input::from_line("exit now").input_type, InputType::Message);
    }

    #[test]
    fn test_blank_line_asks_again() {
        let input = Input::from_line("   ");
        assert_eq!(input.input_type, InputType::AskAgain);
        assert!(input.content.is_none());
    }

    #[test]
    fn test_message_is_trimmed() {
        let input = Input::from_line("  show my week ");
        assert_eq!(input.input_type, InputType::Message);
        assert_eq!(input.content.as_deref(), Some("show my week"));
    }
}
