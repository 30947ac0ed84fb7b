use std::io::{self, Write};

use ::cliclack::{confirm, input, spinner, ProgressBar};
use anyhow::Result;
use bat::WrappingMode;

use super::{Input, Prompt};

const THEME: &str = "zenburn";

pub struct CliclackPrompt {
    spinner: Option<ProgressBar>,
}

impl CliclackPrompt {
    pub fn new() -> Self {
        CliclackPrompt { spinner: None }
    }
}

impl Default for CliclackPrompt {
    fn default() -> Self {
        Self::new()
    }
}

fn print(content: &str) {
    let printed = bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(THEME)
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print();
    // Fall back to plain text when highlighting is unavailable
    if printed.is_err() {
        println!("{}", content);
    }
}

fn interrupted(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Interrupted
}

impl Prompt for CliclackPrompt {
    fn render(&mut self, content: &str) {
        print(content);
        println!();
        let _ = io::stdout().flush();
    }

    fn get_input(&mut self) -> Result<Input> {
        match input("You").placeholder("").interact::<String>() {
            Ok(line) => Ok(Input::from_line(&line)),
            Err(err) if interrupted(&err) => Ok(Input::exit()),
            Err(err) => Err(err.into()),
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        match confirm(question).initial_value(false).interact() {
            Ok(answer) => Ok(answer),
            Err(err) if interrupted(&err) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn show_busy(&mut self) {
        let spin = spinner();
        spin.start("awaiting reply");
        self.spinner = Some(spin);
    }

    fn hide_busy(&mut self) {
        if let Some(spin) = self.spinner.take() {
            spin.stop("");
        }
    }

    fn close(&self) {
        println!("{}", console::style("Goodbye!").green().bold());
    }
}
