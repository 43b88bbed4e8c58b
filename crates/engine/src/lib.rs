//! Storyloom Engine - the driver for the interactive-world engine.
//!
//! This crate contains all server-side machinery:
//!
//! - `driver/` - the tick engine and the two loop variants
//! - `commands/` - the normal and wizard command sets
//! - `dialog` - async dialogs (login, character creation, confirms)
//! - `scheduler` - the deferred-action heap
//! - `pubsub` - topics with weakly referenced subscribers (wiretaps)
//! - `accounts` - the SQLite accounts store for multiuser mode
//! - `player` - session state and output buffering
//! - `ports` - the connection contract towards I/O adapters

pub mod accounts;
pub mod charbuilder;
pub mod commands;
pub mod context;
pub mod demo;
pub mod dialog;
pub mod driver;
pub mod hints;
pub mod limbo;
pub mod player;
pub mod ports;
pub mod pubsub;
pub mod savegame;
pub mod scheduler;
pub mod story;

/// End-to-end tests against the built-in demo story.
#[cfg(test)]
mod e2e_tests;

pub use driver::Driver;
pub use story::{GameMode, Story, StoryConfig, TickMethod};
