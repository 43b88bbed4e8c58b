//! The world entity graph: locations, items, livings and exits,
//! owned by the [`World`] arena.

mod exit;
mod item;
mod living;
mod location;
mod world;

pub use exit::{Door, Exit, ExitTarget};
pub use item::{Containment, Item};
pub use living::Living;
pub use location::Location;
pub use world::World;
