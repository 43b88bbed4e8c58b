//! Storyloom Domain - the world model of the interactive-world engine.
//!
//! This crate holds everything about the simulated world that does not
//! touch I/O: the entity graph (locations, livings, items, exits), the
//! game clock, the language utilities, and the "soul" - the natural
//! language emote parser and the three-viewpoint message renderer.
//!
//! The engine crate drives this model from its server loop; adapters
//! never see these types directly.

pub mod adverbs;
pub mod entities;
pub mod error;
pub mod game_time;
pub mod ids;
pub mod lang;
pub mod soul;
pub mod value_objects;

pub use entities::{
    Containment, Door, Exit, ExitTarget, Item, Living, Location, World,
};
pub use error::WorldError;
pub use game_time::GameClock;
pub use ids::{AccountId, ExitId, ItemId, LivingId, LocationId};
pub use value_objects::{Gender, MoneyFormatter, MoneyKind, Stats};
