//! Character creation: the naming/stats bundle a finished builder
//! dialog produces, and the answer validators the dialogs use.

use storyloom_domain::value_objects::races;
use storyloom_domain::{lang, Gender, Stats, WorldError};

/// The result of character creation, applied to the connecting
/// player's living.
#[derive(Debug, Clone)]
pub struct PlayerNaming {
    pub name: String,
    pub title: Option<String>,
    pub gender: Gender,
    pub race: String,
    pub description: String,
    pub money: f64,
    pub wizard: bool,
}

impl PlayerNaming {
    pub fn new(name: impl Into<String>, gender: Gender, race: impl Into<String>) -> Self {
        let name = name.into().to_lowercase();
        Self {
            name,
            title: None,
            gender,
            race: race.into(),
            description: "A regular person.".to_string(),
            money: 0.0,
            wizard: false,
        }
    }

    pub fn wizard(mut self) -> Self {
        self.wizard = true;
        self.title = Some(format!("arch wizard {}", lang::capital(&self.name)));
        self
    }

    /// The title the player's living gets: an explicit one, or the
    /// capitalized name.
    pub fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| lang::capital(&self.name))
    }

    pub fn stats(&self) -> Result<Stats, WorldError> {
        Stats::from_race(&self.race, self.gender)
    }
}

/// Validate a playable race answer.
pub fn valid_playable_race(value: &str) -> Result<String, WorldError> {
    let value = value.trim().to_lowercase();
    if races::playable_races().contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(WorldError::parse("That is not a valid race."))
    }
}

/// Validate a character name for single-player mode: at least three
/// letters, nothing else.
pub fn valid_if_name(value: &str) -> Result<String, WorldError> {
    let value = value.trim();
    if value.len() >= 3 && value.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(value.to_lowercase())
    } else {
        Err(WorldError::parse(
            "Name needs to be 3 or more letters (a-z, A-Z, no spaces).",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wizard_builder_gets_a_title() {
        let naming = PlayerNaming::new("Rinzwind", Gender::Male, "human").wizard();
        assert_eq!(naming.name, "rinzwind");
        assert_eq!(naming.title(), "arch wizard Rinzwind");
        assert!(naming.wizard);
        assert_eq!(naming.stats().unwrap().race, "human");
    }

    #[test]
    fn plain_players_are_titled_by_name() {
        let naming = PlayerNaming::new("joe", Gender::Male, "human");
        assert_eq!(naming.title(), "Joe");
        assert!(!naming.wizard);
    }

    #[test]
    fn race_and_name_validators() {
        assert_eq!(valid_playable_race(" Elf ").unwrap(), "elf");
        assert!(valid_playable_race("elemental").is_err());
        assert_eq!(valid_if_name("Julie").unwrap(), "julie");
        assert!(valid_if_name("jo").is_err());
        assert!(valid_if_name("julie2").is_err());
    }
}
