//! Player session state: the output paragraph buffer, the input
//! queue flags, hints/recap state, and the coupling of a world living
//! to its I/O connection.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use storyloom_domain::LivingId;
use storyloom_domain::LocationId;
use storyloom_shared::{ClientEvent, OutputRegion, Paragraph, PromptMode, ServerEvent};

use crate::hints::HintSystem;
use crate::ports::ConnectionIo;
use crate::pubsub::{Listen, Listener, TopicEvent, TopicName};

/// Buffered output for the text a player will see. Output accumulates
/// in paragraphs; one command produces one contiguous output region.
#[derive(Debug, Default)]
pub struct TextBuffer {
    paragraphs: Vec<Paragraph>,
    in_paragraph: bool,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paragraph terminator: start a new paragraph on the next line.
    pub fn p(&mut self) {
        if !self.in_paragraph {
            self.new_paragraph(false);
        }
        self.in_paragraph = false;
    }

    fn new_paragraph(&mut self, formatted: bool) {
        self.paragraphs.push(Paragraph::new(formatted));
        self.in_paragraph = true;
    }

    /// Write a line of text. When `formatted`, the line is trimmed and
    /// the adapter may reflow it; `end` closes the paragraph.
    pub fn print(&mut self, line: &str, end: bool, formatted: bool) {
        if line.is_empty() && formatted && !end {
            return;
        }
        let need_new = !self.in_paragraph
            || self
                .paragraphs
                .last()
                .map(|p| p.formatted != formatted)
                .unwrap_or(true);
        if need_new {
            self.new_paragraph(formatted);
        }
        if let Some(paragraph) = self.paragraphs.last_mut() {
            if formatted {
                paragraph.add(line.trim());
            } else {
                paragraph.add(line);
            }
        }
        if end {
            self.in_paragraph = false;
        }
    }

    /// Take the buffered region, clearing the buffer.
    pub fn take_region(&mut self) -> OutputRegion {
        let paragraphs = std::mem::take(&mut self.paragraphs);
        self.in_paragraph = false;
        OutputRegion { paragraphs }
    }

    /// Peek at the buffered paragraphs without clearing (tests).
    pub fn peek_region(&self) -> OutputRegion {
        OutputRegion {
            paragraphs: self.paragraphs.clone(),
        }
    }
}

/// Sink for wiretap events. The player connection holds the only
/// strong reference; topics keep weak ones, so a disconnect cleanly
/// ends all taps.
#[derive(Default)]
pub struct WiretapSink {
    events: Mutex<Vec<(String, String)>>,
}

impl WiretapSink {
    pub fn drain(&self) -> Vec<(String, String)> {
        std::mem::take(&mut self.events.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl Listener for WiretapSink {
    fn pubsub_event(&self, _topic: &TopicName, event: &TopicEvent) -> Listen {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
        Listen::Consumed
    }
}

/// Per-player session state beyond the world living itself.
pub struct Player {
    pub living: LivingId,
    buffer: TextBuffer,
    pub turns: u64,
    /// 0 = off, 1 = short descriptions for known locations,
    /// 2 = short descriptions everywhere.
    pub brief: u8,
    pub known_locations: HashSet<LocationId>,
    pub hints: HintSystem,
    pub story_complete: bool,
    pub screen_styles_enabled: bool,
    last_input_time: Instant,
}

impl Player {
    pub fn new(living: LivingId) -> Self {
        Self {
            living,
            buffer: TextBuffer::new(),
            turns: 0,
            brief: 0,
            known_locations: HashSet::new(),
            hints: HintSystem::default(),
            story_complete: false,
            screen_styles_enabled: true,
            last_input_time: Instant::now(),
        }
    }

    /// Buffer a message for the player's screen.
    pub fn tell(&mut self, message: &str) {
        if message == "\n" {
            self.buffer.p();
        } else {
            self.buffer.print(message, false, true);
        }
    }

    /// Buffer a message and end the paragraph.
    pub fn tell_end(&mut self, message: &str) {
        self.buffer.print(message, true, true);
    }

    /// Buffer text exactly as-is (tracebacks, banners).
    pub fn tell_unformatted(&mut self, message: &str) {
        for line in message.lines() {
            self.buffer.print(line, false, false);
        }
        self.buffer.p();
    }

    pub fn take_output(&mut self) -> OutputRegion {
        self.buffer.take_region()
    }

    pub fn peek_output(&self) -> OutputRegion {
        self.buffer.peek_region()
    }

    pub fn note_input(&mut self) {
        self.last_input_time = Instant::now();
    }

    pub fn idle_seconds(&self) -> f64 {
        self.last_input_time.elapsed().as_secs_f64()
    }
}

/// A player and the I/O connection used for them. All higher level
/// output/input operations go through here; nothing else talks to the
/// adapter.
pub struct PlayerConnection {
    /// Connection key: the player name ("julie") or a placeholder
    /// while still connecting.
    pub name: String,
    pub player: Player,
    pub io: Box<dyn ConnectionIo>,
    pub need_new_input_prompt: bool,
    pub wiretap_sink: Arc<WiretapSink>,
    pub break_requested: bool,
    pub disconnected: bool,
}

impl PlayerConnection {
    pub fn new(name: impl Into<String>, living: LivingId, io: Box<dyn ConnectionIo>) -> Self {
        Self {
            name: name.into(),
            player: Player::new(living),
            io,
            need_new_input_prompt: true,
            wiretap_sink: Arc::new(WiretapSink::default()),
            break_requested: false,
            disconnected: false,
        }
    }

    pub fn living(&self) -> LivingId {
        self.player.living
    }

    /// Flush any wiretapped messages, then the buffered output.
    pub fn write_output(&mut self) {
        for (sender, message) in self.wiretap_sink.drain() {
            self.player
                .tell_end(&format!("[wiretapped from '{}': {}]", sender, message));
        }
        let styles = self.player.screen_styles_enabled;
        let mut region = self.player.take_output();
        if !styles {
            for paragraph in &mut region.paragraphs {
                for line in &mut paragraph.lines {
                    *line = storyloom_shared::strip_style_tags(line);
                }
            }
        }
        if !region.is_empty() {
            self.io.send(ServerEvent::Output { region });
        }
    }

    /// Write the turn prompt, once per processed input.
    pub fn write_input_prompt(&mut self) {
        if self.need_new_input_prompt {
            self.io.send(ServerEvent::InputPrompt);
            self.need_new_input_prompt = false;
        }
    }

    pub fn write_dialog_prompt(&mut self, mode: PromptMode, prompt: &str) {
        self.io.send(ServerEvent::DialogPrompt {
            mode,
            prompt: prompt.to_string(),
        });
    }

    pub fn clear_screen(&mut self) {
        self.io.send(ServerEvent::ClearScreen);
    }

    /// Drain pending input lines (trimmed). Break/disconnect events
    /// set their flags instead.
    pub fn pending_input(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        for event in self.io.drain_input() {
            match event {
                ClientEvent::Line { text } => lines.push(text.trim().to_string()),
                ClientEvent::Break => self.break_requested = true,
                ClientEvent::Disconnected => self.disconnected = true,
            }
        }
        if !lines.is_empty() {
            self.player.note_input();
        }
        lines
    }

    pub fn idle_seconds(&self) -> f64 {
        self.player.idle_seconds()
    }

    pub fn destroy(&mut self) {
        self.io.destroy();
    }
}

/// The connection map: player name -> connection. Mutated only by
/// login/logout; readers tolerate missing entries.
#[derive(Default)]
pub struct Sessions {
    connections: std::collections::HashMap<String, PlayerConnection>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, conn: PlayerConnection) {
        self.connections.insert(conn.name.clone(), conn);
    }

    pub fn remove(&mut self, name: &str) -> Option<PlayerConnection> {
        self.connections.remove(name)
    }

    /// Re-key a connection after the player assumed their real name.
    pub fn rename(&mut self, old: &str, new: &str) {
        if let Some(mut conn) = self.connections.remove(old) {
            conn.name = new.to_string();
            self.connections.insert(new.to_string(), conn);
        }
    }

    pub fn get(&self, name: &str) -> Option<&PlayerConnection> {
        self.connections.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PlayerConnection> {
        self.connections.get_mut(name)
    }

    pub fn by_living(&mut self, living: LivingId) -> Option<&mut PlayerConnection> {
        self.connections
            .values_mut()
            .find(|c| c.living() == living)
    }

    pub fn names(&self) -> Vec<String> {
        self.connections.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PlayerConnection> {
        self.connections.values_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerConnection> {
        self.connections.values()
    }
}
