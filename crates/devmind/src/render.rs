//! Terminal rendering of turns and responses.

use devmind_core::segment::segment;
use devmind_core::{CapabilitySet, Role, SegmentedResponse, Turn};
use owo_colors::{OwoColorize, Style};

use crate::catalog::QUICK_TIPS;
use crate::command::Command;

const BAR_CHAR: &str = "▎";

/// Formats output for the terminal, with or without ANSI colors.
#[derive(Clone, Copy, Debug)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    /// Creates a renderer. Colors are only emitted when `color` is set.
    #[inline]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_owned()
        }
    }

    fn block(
        &self,
        out: &mut String,
        bar_style: Style,
        text: &str,
        style: Style,
    ) {
        let bar = self.paint(BAR_CHAR, bar_style);
        for line in text.lines() {
            out.push_str(&bar);
            out.push_str(&self.paint(line, style));
            out.push('\n');
        }
    }

    /// Title and greeting shown at startup.
    pub fn banner(&self, model: &str) -> String {
        let mut out = String::new();
        out.push_str(&self.paint("DevMind Chatbot", Style::new().bold()));
        out.push('\n');
        out.push_str("Hi! I'm DevMind Chatbot. How can I assist you today?\n");
        out.push_str(&self.paint(
            &format!("model: {model} · type /help for commands"),
            Style::new().dimmed(),
        ));
        out.push('\n');
        out
    }

    /// A segmented response: the thought process first, then the answer.
    pub fn response(&self, resp: &SegmentedResponse) -> String {
        let mut out = String::new();
        if let Some(reasoning) = &resp.reasoning {
            let bar = Style::new().bright_black();
            let heading = "💭 AI Thought Process";
            self.block(&mut out, bar, heading, Style::new().italic());
            self.block(&mut out, bar, reasoning, Style::new().dimmed());
        }
        self.block(
            &mut out,
            Style::new().bright_cyan(),
            &format!("🤖 {}", resp.answer),
            Style::new().bright_white(),
        );
        out
    }

    /// One turn of the transcript. Assistant turns are segmented.
    pub fn turn(&self, turn: &Turn) -> String {
        match turn.role() {
            Role::Assistant => self.response(&segment(turn.text())),
            Role::User => {
                let mut out = String::new();
                self.block(
                    &mut out,
                    Style::new().bright_green(),
                    &format!("🧑 {}", turn.text()),
                    Style::new(),
                );
                out
            }
            Role::System => String::new(),
        }
    }

    /// Notice shown after a response cut off by the token limit.
    pub fn truncation_notice(&self) -> String {
        let mut out = String::new();
        self.block(
            &mut out,
            Style::new().yellow(),
            "✂️  The answer was cut off by the model's token limit.",
            Style::new().dimmed(),
        );
        out
    }

    /// An error that ended a cycle.
    pub fn error(&self, err: &dyn std::error::Error) -> String {
        let mut out = String::new();
        self.block(
            &mut out,
            Style::new().bright_red(),
            &format!("⚠️  {err}"),
            Style::new().red(),
        );
        out
    }

    /// The quick tips.
    pub fn tips(&self) -> String {
        QUICK_TIPS
            .iter()
            .map(|(title, tip)| {
                format!("- {}: {tip}\n", self.paint(title, Style::new().bold()))
            })
            .collect()
    }

    /// The capability checklist.
    pub fn capabilities(&self, caps: &CapabilitySet) -> String {
        caps.labels()
            .iter()
            .map(|label| {
                let check = self.paint("✔", Style::new().green());
                format!("{check} {label}\n")
            })
            .collect()
    }

    /// The command list.
    pub fn help(&self) -> String {
        Command::ALL
            .iter()
            .map(|(cmd, desc)| {
                let name = format!("{:<14}", format!("/{}", cmd.name()));
                format!("{} {desc}\n", self.paint(&name, Style::new().bold()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_with_reasoning() {
        let renderer = Renderer::new(false);
        let resp = SegmentedResponse {
            reasoning: Some("step one\nstep two".to_owned()),
            answer: "Use a Vec.".to_owned(),
        };
        assert_eq!(
            renderer.response(&resp),
            "▎💭 AI Thought Process\n▎step one\n▎step two\n▎🤖 Use a Vec.\n"
        );
    }

    #[test]
    fn test_history_segments_assistant_turns() {
        let renderer = Renderer::new(false);
        let user = Turn::new(Role::User, "Hi");
        let assistant =
            Turn::new(Role::Assistant, "<think>greet</think> Hello");
        assert_eq!(renderer.turn(&user), "▎🧑 Hi\n");
        assert_eq!(
            renderer.turn(&assistant),
            "▎💭 AI Thought Process\n▎greet\n▎🤖 > Hello\n"
        );
    }

    #[test]
    fn test_truncation_notice() {
        let renderer = Renderer::new(false);
        assert_eq!(
            renderer.truncation_notice(),
            "▎✂️  The answer was cut off by the model's token limit.\n"
        );
    }

    #[test]
    fn test_plain_output_has_no_escapes() {
        let renderer = Renderer::new(false);
        let caps = CapabilitySet::from_labels(["Python Expert"]);
        assert_eq!(renderer.capabilities(&caps), "✔ Python Expert\n");
        assert!(!renderer.tips().contains('\u{1b}'));
        assert!(renderer.help().contains("/reset"));

        let colored = Renderer::new(true);
        assert!(colored.capabilities(&caps).contains('\u{1b}'));
    }
}
