//! Storyloom Shared - the contract between the engine and its I/O
//! adapters.
//!
//! The engine never talks to a terminal, GUI or browser directly; it
//! exchanges these message types with an adapter over channels. The
//! adapter renders [`ServerEvent`]s however it likes and feeds player
//! input back as [`ClientEvent`]s.

pub mod messages;

pub use messages::{
    strip_style_tags, ClientEvent, OutputRegion, Paragraph, PromptMode, ServerEvent, STYLE_TAGS,
};
