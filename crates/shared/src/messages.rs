//! Message types exchanged over a player connection.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Removing or renaming variants is a breaking change

use serde::{Deserialize, Serialize};

/// The style tags the engine may embed in output text. Adapters map
/// them to their own styling; the engine itself never interprets them.
pub const STYLE_TAGS: &[&str] = &[
    "<dim>",
    "<normal>",
    "<bright>",
    "<ul>",
    "<it>",
    "<rev>",
    "<clear>",
    "</>",
    "<living>",
    "<player>",
    "<item>",
    "<exit>",
    "<location>",
    "<monospaced>",
    "</monospaced>",
];

/// Remove all style tags from a piece of text, leaving the prose.
pub fn strip_style_tags(text: &str) -> String {
    let mut result = text.to_string();
    for tag in STYLE_TAGS {
        result = result.replace(tag, "");
    }
    result
}

/// A paragraph of output text. Formatted paragraphs may be reflowed
/// and whitespace-normalized by the adapter; unformatted ones are
/// rendered exactly as-is (used for tracebacks and ASCII art).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub lines: Vec<String>,
    pub formatted: bool,
}

impl Paragraph {
    pub fn new(formatted: bool) -> Self {
        Self {
            lines: Vec::new(),
            formatted,
        }
    }

    pub fn add(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// The buffered output of one command: an ordered sequence of
/// paragraphs rendered as one contiguous region.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputRegion {
    pub paragraphs: Vec<Paragraph>,
}

impl OutputRegion {
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// The whole region as plain text with style tags removed.
    pub fn plain_text(&self) -> String {
        strip_style_tags(
            &self
                .paragraphs
                .iter()
                .map(Paragraph::text)
                .collect::<String>(),
        )
    }
}

/// How a dialog prompt treats the player's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptMode {
    /// Normal input; the adapter may echo it.
    Input,
    /// Sensitive input (passwords); the adapter must not echo it.
    InputNoEcho,
}

/// Messages from the engine to the I/O adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// A rendered output region to display.
    Output { region: OutputRegion },
    /// Draw the regular turn prompt.
    InputPrompt,
    /// Draw a dialog prompt (login question, confirmation, ...).
    DialogPrompt { mode: PromptMode, prompt: String },
    /// Clear the screen, if the adapter can.
    ClearScreen,
    /// The session has ended; the adapter should shut down.
    SessionEnded,
}

/// Messages from the I/O adapter to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// One line of player input. The engine trims it.
    Line { text: String },
    /// The player pressed the break key.
    Break,
    /// The adapter lost its peer; the connection should be destroyed.
    Disconnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_tags_strip_cleanly() {
        let text = "<bright>Welcome.</> You see <item>a lamp</>.";
        assert_eq!(strip_style_tags(text), "Welcome. You see a lamp.");
    }

    #[test]
    fn stripping_styles_equals_styleless_render() {
        let mut region = OutputRegion::default();
        let mut p = Paragraph::new(true);
        p.add("<living>Julie</> grins <it>evilly</>.");
        region.paragraphs.push(p);
        let mut plain = Paragraph::new(true);
        plain.add("Julie grins evilly.");
        assert_eq!(region.plain_text(), plain.text());
    }

    #[test]
    fn events_round_trip_through_json() {
        let event = ServerEvent::DialogPrompt {
            mode: PromptMode::InputNoEcho,
            prompt: "Please type in your password.".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("input-no-echo"));
        let back: ServerEvent = serde_json::from_str(&json).unwrap();
        match back {
            ServerEvent::DialogPrompt { mode, prompt } => {
                assert_eq!(mode, PromptMode::InputNoEcho);
                assert_eq!(prompt, "Please type in your password.");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
