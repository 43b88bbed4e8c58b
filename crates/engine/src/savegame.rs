//! Savegame snapshots: `{version, player, deferreds, clock, config}`
//! serialized as one opaque record. A version mismatch is a hard load
//! failure (exit code 10). Saving only exists in single-player mode.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use storyloom_domain::entities::{Containment, Item, Living};
use storyloom_domain::{GameClock, LivingId};

use crate::driver::Driver;
use crate::hints::HintSystem;
use crate::scheduler::Deferred;
use crate::story::StoryConfig;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("no saved game data found")]
    NotFound,

    #[error(
        "this saved game data was from a different version of the game and cannot be used \
         (current: {current}, saved: {saved})"
    )]
    VersionMismatch { current: String, saved: String },

    #[error("problem with the saved game data: {0}")]
    Malformed(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("there is no player to save")]
    NoPlayer,
}

/// An item carried by the player, with whatever it contains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedItem {
    pub item: Item,
    pub contents: Vec<SavedItem>,
}

/// The player's complete persisted state. The location is stored by
/// name; ids are not stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub living: Living,
    pub location_name: String,
    pub inventory: Vec<SavedItem>,
    pub turns: u64,
    pub brief: u8,
    pub known_location_names: Vec<String>,
    pub hints: HintSystem,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveGame {
    pub version: String,
    pub player: PlayerSnapshot,
    pub deferreds: Vec<Deferred>,
    pub clock: GameClock,
    pub config: StoryConfig,
}

fn capture_item(driver: &Driver, item_id: storyloom_domain::ItemId) -> Option<SavedItem> {
    let item = driver.world.item(item_id)?.clone();
    let contents = item
        .contents()
        .iter()
        .filter_map(|id| capture_item(driver, *id))
        .collect();
    Some(SavedItem { item, contents })
}

/// Build a snapshot of the given connection's player.
pub fn snapshot(driver: &Driver, conn_name: &str) -> Result<SaveGame, SaveError> {
    let conn = driver.sessions.get(conn_name).ok_or(SaveError::NoPlayer)?;
    let living_id = conn.living();
    let living = driver
        .world
        .living(living_id)
        .cloned()
        .ok_or(SaveError::NoPlayer)?;
    let location_name = driver
        .world
        .location(living.location())
        .map(|l| l.name().to_string())
        .unwrap_or_default();
    let inventory = living
        .inventory()
        .iter()
        .filter_map(|id| capture_item(driver, *id))
        .collect();
    let known_location_names = conn
        .player
        .known_locations
        .iter()
        .filter_map(|id| driver.world.location(*id).map(|l| l.name().to_string()))
        .collect();
    Ok(SaveGame {
        version: driver.config.version.clone(),
        player: PlayerSnapshot {
            living,
            location_name,
            inventory,
            turns: conn.player.turns,
            brief: conn.player.brief,
            known_location_names,
            hints: conn.player.hints.clone(),
        },
        deferreds: driver.scheduler.snapshot(),
        clock: driver.clock.clone(),
        config: driver.config.clone(),
    })
}

/// Write the snapshot for the connection to the driver's savegame
/// path.
pub fn save(driver: &Driver, conn_name: &str) -> Result<(), SaveError> {
    let snapshot = snapshot(driver, conn_name)?;
    let data = serde_json::to_vec(&snapshot).map_err(|err| SaveError::Malformed(err.to_string()))?;
    std::fs::write(&driver.savegame_path, data)?;
    tracing::info!(path = %driver.savegame_path.display(), "game saved");
    Ok(())
}

/// Read a snapshot back; the version must match the running story.
pub fn load(driver: &Driver) -> Result<SaveGame, SaveError> {
    let data = match std::fs::read(&driver.savegame_path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(SaveError::NotFound)
        }
        Err(err) => return Err(err.into()),
    };
    let saved: SaveGame =
        serde_json::from_slice(&data).map_err(|err| SaveError::Malformed(err.to_string()))?;
    if saved.version != driver.config.version {
        return Err(SaveError::VersionMismatch {
            current: driver.config.version.clone(),
            saved: saved.version,
        });
    }
    Ok(saved)
}

fn restore_item(driver: &mut Driver, saved: SavedItem, containment: Containment) {
    let SavedItem { item, contents } = saved;
    if let Ok(item_id) = driver.world.add_item(item, containment) {
        for child in contents {
            restore_item(driver, child, Containment::Item(item_id));
        }
    }
}

/// Apply a loaded snapshot to the (freshly initialized) world: the
/// connecting player takes over the saved identity, inventory and
/// position, and the clock and deferred queue are replaced.
pub fn apply(driver: &mut Driver, conn_name: &str, saved: SaveGame) -> Result<LivingId, SaveError> {
    let living_id = driver
        .sessions
        .get(conn_name)
        .map(|c| c.living())
        .ok_or(SaveError::NoPlayer)?;
    driver.clock = saved.clock;
    driver.scheduler.restore(saved.deferreds);
    driver.config = saved.config;

    let snapshot = saved.player;
    let target_location = driver
        .world
        .find_location(&snapshot.location_name)
        .or_else(|| driver.world.find_location(&driver.config.startlocation_player))
        .unwrap_or_else(|| driver.world.limbo());
    {
        let living = driver
            .world
            .living_mut(living_id)
            .ok_or(SaveError::NoPlayer)?;
        living.set_identity(
            snapshot.living.name(),
            snapshot.living.title(),
            snapshot.living.stats().clone(),
        );
        living.set_money(snapshot.living.money());
        living.set_privileges(snapshot.living.privileges().clone());
        living.set_player(true);
    }
    driver
        .world
        .move_living(living_id, target_location)
        .map_err(|err| SaveError::Malformed(err.to_string()))?;
    for item in snapshot.inventory {
        restore_item(driver, item, Containment::Living(living_id));
    }
    let known: Vec<_> = snapshot
        .known_location_names
        .iter()
        .filter_map(|name| driver.world.find_location(name))
        .collect();
    if let Some(conn) = driver.sessions.get_mut(conn_name) {
        conn.player.turns = snapshot.turns;
        conn.player.brief = snapshot.brief;
        conn.player.known_locations = known.into_iter().collect();
        conn.player.hints = snapshot.hints;
    }
    let name = snapshot.living.name().to_string();
    driver.sessions.rename(conn_name, &name);
    Ok(living_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use storyloom_domain::value_objects::Gender;

    #[test]
    fn snapshot_round_trips_structurally() {
        let living = Living::new("julie", Gender::Female, "human")
            .unwrap()
            .with_title("Julie")
            .as_player();
        let save = SaveGame {
            version: "1.0".into(),
            player: PlayerSnapshot {
                living,
                location_name: "town square".into(),
                inventory: vec![SavedItem {
                    item: Item::new("satchel").as_container(),
                    contents: vec![SavedItem {
                        item: Item::new("coin"),
                        contents: vec![],
                    }],
                }],
                turns: 42,
                brief: 1,
                known_location_names: vec!["town square".into()],
                hints: HintSystem::default(),
            },
            deferreds: Vec::new(),
            clock: GameClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(), 2),
            config: StoryConfig::default(),
        };
        let json = serde_json::to_string(&save).unwrap();
        let restored: SaveGame = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.version, save.version);
        assert_eq!(restored.clock, save.clock);
        assert_eq!(restored.config, save.config);
        assert_eq!(restored.player.turns, 42);
        assert_eq!(restored.player.inventory.len(), 1);
        assert_eq!(restored.player.inventory[0].contents.len(), 1);
        assert_eq!(restored.deferreds, save.deferreds);
    }
}
