use serde::{Deserialize, Serialize};

use super::gender::Gender;
use super::races;
use crate::error::WorldError;

/// Character statistics, as carried by every living and persisted per
/// account. The eight ability scores are copied from the race's base
/// stats at creation time and evolve from there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub gender: Gender,
    pub race: String,
    pub level: i64,
    pub xp: i64,
    pub hp: i64,
    pub ac: i64,
    pub maxhp_dice: Option<String>,
    pub attack_dice: Option<String>,
    pub agi: i64,
    pub cha: i64,
    pub int: i64,
    pub lck: i64,
    pub spd: i64,
    pub sta: i64,
    pub str: i64,
    pub wis: i64,
    pub alignment: i64,
}

impl Stats {
    /// Create stats for a living of the given race, with the race's
    /// base ability scores.
    pub fn from_race(race_name: &str, gender: Gender) -> Result<Self, WorldError> {
        let race = races::race(race_name)
            .ok_or_else(|| WorldError::parse(format!("Unknown race: {}", race_name)))?;
        let [agi, cha, int, lck, spd, sta, str_, wis] = race.base_stats;
        Ok(Self {
            gender,
            race: race.name.to_string(),
            level: 1,
            xp: 0,
            hp: 10,
            ac: 0,
            maxhp_dice: None,
            attack_dice: None,
            agi,
            cha,
            int,
            lck,
            spd,
            sta,
            str: str_,
            wis,
            alignment: 0,
        })
    }

    /// Re-derive the static, race-bound attributes (size, language)
    /// after loading persisted stats.
    pub fn race_def(&self) -> Option<&'static races::RaceDef> {
        races::race(&self.race)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_start_from_race_base() {
        let stats = Stats::from_race("elf", Gender::Female).unwrap();
        assert_eq!(stats.race, "elf");
        assert_eq!(stats.agi, 12);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.race_def().unwrap().language, true);
    }

    #[test]
    fn unknown_race_is_rejected() {
        assert!(Stats::from_race("dragonfly", Gender::Neuter).is_err());
    }
}
