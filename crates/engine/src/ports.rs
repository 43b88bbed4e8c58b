//! Connection port: the engine's view of one player's I/O adapter.
//!
//! The driver is the single writer of the world; adapters live on
//! their own tasks and talk to the driver through channels. The
//! adapter side signals a shared [`Notify`] whenever input arrives so
//! the driver loop can wait on "any connection has input".

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::Notify;

use storyloom_shared::{ClientEvent, ServerEvent};

/// One player's connection, as seen from the driver.
pub trait ConnectionIo: Send {
    /// Queue an event towards the adapter. Never blocks.
    fn send(&self, event: ServerEvent);

    /// Drain any input events queued by the adapter.
    fn drain_input(&mut self) -> Vec<ClientEvent>;

    /// Tell the adapter the session is over and drop the channel.
    fn destroy(&self);
}

/// Channel-backed [`ConnectionIo`]; the standard transport for all
/// adapters (console task, web session, tests).
pub struct ChannelIo {
    events_tx: mpsc::UnboundedSender<ServerEvent>,
    input_rx: mpsc::UnboundedReceiver<ClientEvent>,
}

impl ConnectionIo for ChannelIo {
    fn send(&self, event: ServerEvent) {
        // the adapter may already be gone during shutdown
        let _ = self.events_tx.send(event);
    }

    fn drain_input(&mut self) -> Vec<ClientEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.input_rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn destroy(&self) {
        let _ = self.events_tx.send(ServerEvent::SessionEnded);
    }
}

/// The adapter's end of a [`ChannelIo`].
pub struct AdapterHandle {
    pub events: mpsc::UnboundedReceiver<ServerEvent>,
    input_tx: mpsc::UnboundedSender<ClientEvent>,
    signal: Arc<Notify>,
}

impl AdapterHandle {
    /// Queue one line of player input and wake the driver.
    pub fn send_line(&self, text: impl Into<String>) {
        self.send(ClientEvent::Line { text: text.into() });
    }

    pub fn send(&self, event: ClientEvent) {
        if self.input_tx.send(event).is_ok() {
            self.signal.notify_one();
        }
    }
}

/// Create a connected (driver side, adapter side) pair. `signal` is
/// the driver's shared input signal.
pub fn channel_io(signal: Arc<Notify>) -> (ChannelIo, AdapterHandle) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    (
        ChannelIo {
            events_tx,
            input_rx,
        },
        AdapterHandle {
            events: events_rx,
            input_tx,
            signal,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lines_flow_from_adapter_to_driver() {
        let signal = Arc::new(Notify::new());
        let (mut io, adapter) = channel_io(signal.clone());
        let notified = signal.notified();
        adapter.send_line("look");
        notified.await;
        let events = io.drain_input();
        assert_eq!(events.len(), 1);
        match &events[0] {
            ClientEvent::Line { text } => assert_eq!(text, "look"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn destroy_reaches_the_adapter() {
        let signal = Arc::new(Notify::new());
        let (io, mut adapter) = channel_io(signal);
        io.destroy();
        match adapter.events.recv().await {
            Some(ServerEvent::SessionEnded) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
