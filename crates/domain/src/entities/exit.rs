use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::ids::LocationId;

/// Where an exit leads. An unbound target names a location by its
/// name; it is resolved to an id when the world is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitTarget {
    Bound(LocationId),
    Unbound(String),
}

/// Door state on an exit that can be opened, closed and locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub opened: bool,
    pub locked: bool,
}

/// A one-way edge from one location to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exit {
    direction: String,
    short_description: String,
    long_description: String,
    target: ExitTarget,
    door: Option<Door>,
}

impl Exit {
    pub fn new(
        direction: impl Into<String>,
        short_description: impl Into<String>,
        target: ExitTarget,
    ) -> Self {
        let short_description = short_description.into();
        Self {
            direction: direction.into(),
            long_description: short_description.clone(),
            short_description,
            target,
            door: None,
        }
    }

    pub fn with_long_description(mut self, text: impl Into<String>) -> Self {
        self.long_description = text.into();
        self
    }

    /// Turn this exit into a door.
    pub fn as_door(mut self, opened: bool, locked: bool) -> Self {
        self.door = Some(Door { opened, locked });
        self
    }

    pub fn direction(&self) -> &str {
        &self.direction
    }

    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    /// The long description; for doors the open/locked status is
    /// appended.
    pub fn long_description(&self) -> String {
        match self.door {
            None => self.long_description.clone(),
            Some(door) => {
                let status = match (door.opened, door.locked) {
                    (true, true) => "It is open and locked.",
                    (true, false) => "It is open and unlocked.",
                    (false, true) => "It is closed and locked.",
                    (false, false) => "It is closed and unlocked.",
                };
                format!("{} {}", self.long_description, status)
            }
        }
    }

    pub fn target(&self) -> &ExitTarget {
        &self.target
    }

    pub fn target_location(&self) -> Option<LocationId> {
        match &self.target {
            ExitTarget::Bound(id) => Some(*id),
            ExitTarget::Unbound(_) => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.target, ExitTarget::Bound(_))
    }

    pub fn door(&self) -> Option<Door> {
        self.door
    }

    pub(crate) fn bind(&mut self, location: LocationId) {
        self.target = ExitTarget::Bound(location);
    }

    /// Is passage through this exit currently possible?
    pub fn allow_passage(&self) -> Result<(), WorldError> {
        if let Some(door) = self.door {
            if !door.opened {
                return Err(WorldError::refused("You can't go there; it's closed."));
            }
        }
        Ok(())
    }

    pub fn open(&mut self) -> Result<(), WorldError> {
        match self.door {
            None => Err(WorldError::refused("You can't open that.")),
            Some(door) if door.opened => Err(WorldError::refused("It's already open.")),
            Some(door) if door.locked => Err(WorldError::refused("You can't open it; it's locked.")),
            Some(mut door) => {
                door.opened = true;
                self.door = Some(door);
                Ok(())
            }
        }
    }

    pub fn close(&mut self) -> Result<(), WorldError> {
        match self.door {
            None => Err(WorldError::refused("You can't close that.")),
            Some(door) if !door.opened => Err(WorldError::refused("It's already closed.")),
            Some(mut door) => {
                door.opened = false;
                self.door = Some(door);
                Ok(())
            }
        }
    }

    pub fn lock(&mut self) -> Result<(), WorldError> {
        match self.door {
            None => Err(WorldError::refused("You can't lock that.")),
            Some(door) if door.locked => Err(WorldError::refused("It's already locked.")),
            Some(mut door) => {
                door.locked = true;
                self.door = Some(door);
                Ok(())
            }
        }
    }

    pub fn unlock(&mut self) -> Result<(), WorldError> {
        match self.door {
            None => Err(WorldError::refused("You can't unlock that.")),
            Some(door) if !door.locked => Err(WorldError::refused("It's not locked.")),
            Some(mut door) => {
                door.locked = false;
                self.door = Some(door);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_doors_refuse_passage() {
        let exit = Exit::new("north", "A door to the north.", ExitTarget::Unbound("hall".into()))
            .as_door(false, false);
        assert_eq!(
            exit.allow_passage().unwrap_err(),
            WorldError::refused("You can't go there; it's closed.")
        );
    }

    #[test]
    fn door_open_close_lock_cycle() {
        let mut exit = Exit::new("south", "A sturdy door.", ExitTarget::Unbound("cellar".into()))
            .as_door(false, true);
        assert!(exit.open().is_err()); // locked
        exit.unlock().unwrap();
        exit.open().unwrap();
        assert!(exit.allow_passage().is_ok());
        assert_eq!(
            exit.open().unwrap_err(),
            WorldError::refused("It's already open.")
        );
        exit.close().unwrap();
        assert!(exit.long_description().ends_with("It is closed and unlocked."));
    }

    #[test]
    fn plain_exits_cannot_be_opened() {
        let mut exit = Exit::new("east", "A path.", ExitTarget::Unbound("field".into()));
        assert!(exit.allow_passage().is_ok());
        assert_eq!(
            exit.open().unwrap_err(),
            WorldError::refused("You can't open that.")
        );
    }
}
