use anyhow::Result;
use std::collections::VecDeque;

use super::{Input, Prompt};

/// Scripted console: replays lines and confirmation answers, records output.
#[derive(Default)]
pub struct MockPrompt {
    lines: VecDeque<String>,
    answers: VecDeque<bool>,
    pub rendered: Vec<String>,
    pub questions: Vec<String>,
    pub busy: bool,
}

impl MockPrompt {
    pub fn new(lines: Vec<&str>) -> Self {
        Self {
            lines: lines.into_iter().map(str::to_string).collect(),
            ..Default::default()
        }
    }

    pub fn with_answers(mut self, answers: Vec<bool>) -> Self {
        self.answers = answers.into();
        self
    }
}

impl Prompt for MockPrompt {
    fn render(&mut self, content: &str) {
        self.rendered.push(content.to_string());
    }

    /// Running out of lines behaves like an interrupt.
    fn get_input(&mut self) -> Result<Input> {
        Ok(match self.lines.pop_front() {
            Some(line) => Input::from_line(&line),
            None => Input::exit(),
        })
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.questions.push(question.to_string());
        Ok(self.answers.pop_front().unwrap_or(false))
    }

    fn show_busy(&mut self) {
        self.busy = true;
    }

    fn hide_busy(&mut self) {
        self.busy = false;
    }

    fn close(&self) {}

    fn welcome(&self) {}
}
