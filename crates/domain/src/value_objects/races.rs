//! Race definitions: body size, language capability, and the base
//! stats a living of that race starts with.

use serde::{Deserialize, Serialize};

/// The size of a creature's body. Sizes are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BodySize {
    Tiny,
    Small,
    SomewhatSmall,
    HumanSized,
    SomewhatLarge,
    Large,
    Huge,
    Gigantic,
}

impl BodySize {
    pub fn text(&self) -> &'static str {
        match self {
            BodySize::Tiny => "tiny",
            BodySize::Small => "small",
            BodySize::SomewhatSmall => "somewhat small",
            BodySize::HumanSized => "human sized",
            BodySize::SomewhatLarge => "somewhat large",
            BodySize::Large => "large",
            BodySize::Huge => "huge",
            BodySize::Gigantic => "gigantic",
        }
    }
}

/// Base stat block of a race, in the order
/// (agi, cha, int, lck, spd, sta, str, wis).
pub type BaseStats = [i64; 8];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaceDef {
    pub name: &'static str,
    pub size: BodySize,
    pub mass_kg: f64,
    /// Can members of this race speak?
    pub language: bool,
    /// May a player character be created with this race?
    pub playable: bool,
    pub base_stats: BaseStats,
}

const RACES: &[RaceDef] = &[
    RaceDef { name: "human",     size: BodySize::HumanSized,    mass_kg: 72.0,  language: true,  playable: true,  base_stats: [10, 10, 10, 10, 10, 10, 10, 10] },
    RaceDef { name: "elf",       size: BodySize::HumanSized,    mass_kg: 60.0,  language: true,  playable: true,  base_stats: [12, 12, 12, 10, 11, 8, 8, 12] },
    RaceDef { name: "half-elf",  size: BodySize::HumanSized,    mass_kg: 65.0,  language: true,  playable: true,  base_stats: [11, 11, 11, 10, 10, 9, 9, 11] },
    RaceDef { name: "dwarf",     size: BodySize::SomewhatSmall, mass_kg: 60.0,  language: true,  playable: true,  base_stats: [8, 8, 10, 10, 8, 13, 12, 11] },
    RaceDef { name: "halfling",  size: BodySize::Small,         mass_kg: 35.0,  language: true,  playable: true,  base_stats: [13, 10, 10, 13, 10, 8, 6, 10] },
    RaceDef { name: "orc",       size: BodySize::HumanSized,    mass_kg: 80.0,  language: true,  playable: true,  base_stats: [9, 6, 7, 9, 10, 12, 13, 7] },
    RaceDef { name: "goblin",    size: BodySize::SomewhatSmall, mass_kg: 40.0,  language: true,  playable: true,  base_stats: [11, 6, 8, 11, 11, 9, 8, 7] },
    RaceDef { name: "gnome",     size: BodySize::Small,         mass_kg: 30.0,  language: true,  playable: false, base_stats: [11, 9, 13, 11, 9, 8, 6, 12] },
    RaceDef { name: "troll",     size: BodySize::Large,         mass_kg: 300.0, language: true,  playable: false, base_stats: [6, 4, 5, 8, 7, 14, 15, 4] },
    RaceDef { name: "giant",     size: BodySize::Huge,          mass_kg: 600.0, language: true,  playable: false, base_stats: [5, 6, 6, 8, 8, 15, 16, 6] },
    RaceDef { name: "wolf",      size: BodySize::SomewhatLarge, mass_kg: 45.0,  language: false, playable: false, base_stats: [13, 6, 4, 10, 14, 11, 10, 4] },
    RaceDef { name: "cat",       size: BodySize::Small,         mass_kg: 5.0,   language: false, playable: false, base_stats: [15, 8, 4, 13, 14, 7, 4, 4] },
    RaceDef { name: "bird",      size: BodySize::Tiny,          mass_kg: 0.5,   language: false, playable: false, base_stats: [14, 8, 3, 12, 15, 5, 2, 3] },
    RaceDef { name: "rat",       size: BodySize::Tiny,          mass_kg: 0.3,   language: false, playable: false, base_stats: [13, 4, 3, 11, 13, 6, 2, 3] },
    // The race of entities that are not really of this world, such as
    // players that are still connecting, and the limbo reaper.
    RaceDef { name: "elemental", size: BodySize::HumanSized,    mass_kg: 1.0,   language: true,  playable: false, base_stats: [10, 10, 10, 10, 10, 10, 10, 10] },
];

/// Look up a race definition by name.
pub fn race(name: &str) -> Option<&'static RaceDef> {
    RACES.iter().find(|r| r.name == name)
}

/// The names of all races a player character may be created with.
pub fn playable_races() -> Vec<&'static str> {
    RACES.iter().filter(|r| r.playable).map(|r| r.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_races_resolve() {
        assert!(race("human").is_some());
        assert!(race("elemental").is_some());
        assert!(race("balrog").is_none());
    }

    #[test]
    fn playable_races_are_a_proper_subset() {
        let playable = playable_races();
        assert!(playable.contains(&"human"));
        assert!(!playable.contains(&"elemental"));
        assert!(playable.len() < RACES.len());
    }

    #[test]
    fn body_sizes_are_comparable() {
        assert!(BodySize::Tiny < BodySize::HumanSized);
        assert!(BodySize::Gigantic > BodySize::Large);
        assert_eq!(BodySize::SomewhatSmall.text(), "somewhat small");
    }
}
