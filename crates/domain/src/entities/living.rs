use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, LocationId};
use crate::value_objects::{Gender, Stats};
use crate::WorldError;

/// An animate entity: an NPC, or a player when a session is attached.
///
/// A living is always in exactly one location (Limbo when homeless).
/// It exclusively owns the items in its inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Living {
    name: String,
    title: String,
    aliases: BTreeSet<String>,
    description: String,
    short_description: String,
    stats: Stats,
    privileges: BTreeSet<String>,
    aggressive: bool,
    money: f64,
    location: LocationId,
    inventory: Vec<ItemId>,
    /// True when a player session drives this living.
    player: bool,
}

impl Living {
    /// Create a living of the given race. The name is stored
    /// lowercased; the title defaults to the name.
    pub fn new(name: impl Into<String>, gender: Gender, race: &str) -> Result<Self, WorldError> {
        let name = name.into().to_lowercase();
        Ok(Self {
            title: name.clone(),
            name,
            aliases: BTreeSet::new(),
            description: String::new(),
            short_description: String::new(),
            stats: Stats::from_race(race, gender)?,
            privileges: BTreeSet::new(),
            aggressive: false,
            money: 0.0,
            location: LocationId::from_uuid(uuid::Uuid::nil()),
            inventory: Vec::new(),
            player: false,
        })
    }

    // Read accessors

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn aliases(&self) -> &BTreeSet<String> {
        &self.aliases
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    pub fn gender(&self) -> Gender {
        self.stats.gender
    }

    pub fn race(&self) -> &str {
        &self.stats.race
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }

    pub fn privileges(&self) -> &BTreeSet<String> {
        &self.privileges
    }

    pub fn is_wizard(&self) -> bool {
        self.privileges.contains("wizard")
    }

    pub fn aggressive(&self) -> bool {
        self.aggressive
    }

    pub fn money(&self) -> f64 {
        self.money
    }

    pub fn location(&self) -> LocationId {
        self.location
    }

    pub fn inventory(&self) -> &[ItemId] {
        &self.inventory
    }

    pub fn is_player(&self) -> bool {
        self.player
    }

    /// he / she / it
    pub fn subjective(&self) -> &'static str {
        self.gender().subjective()
    }

    /// his / her / its
    pub fn possessive(&self) -> &'static str {
        self.gender().possessive()
    }

    /// him / her / it
    pub fn objective(&self) -> &'static str {
        self.gender().objective()
    }

    // Builder methods

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into().to_lowercase());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_short_description(mut self, text: impl Into<String>) -> Self {
        self.short_description = text.into();
        self
    }

    pub fn aggressive_living(mut self) -> Self {
        self.aggressive = true;
        self
    }

    pub fn as_player(mut self) -> Self {
        self.player = true;
        self
    }

    // Mutation

    pub fn set_money(&mut self, money: f64) {
        self.money = money;
    }

    pub fn add_money(&mut self, amount: f64) {
        self.money += amount;
    }

    pub fn grant_privilege(&mut self, privilege: impl Into<String>) {
        self.privileges.insert(privilege.into());
    }

    pub fn revoke_privilege(&mut self, privilege: &str) {
        self.privileges.remove(privilege);
    }

    pub fn set_privileges(&mut self, privileges: BTreeSet<String>) {
        self.privileges = privileges;
    }

    /// Rename the living (and retitle it). Used when a connecting
    /// player assumes their account identity.
    pub fn set_identity(&mut self, name: &str, title: impl Into<String>, stats: Stats) {
        self.name = name.to_lowercase();
        self.title = title.into();
        self.stats = stats;
    }

    pub fn set_player(&mut self, player: bool) {
        self.player = player;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub(crate) fn set_location(&mut self, location: LocationId) {
        self.location = location;
    }

    pub(crate) fn add_inventory(&mut self, item: ItemId) {
        if !self.inventory.contains(&item) {
            self.inventory.push(item);
        }
    }

    pub(crate) fn remove_inventory(&mut self, item: ItemId) {
        self.inventory.retain(|i| *i != item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_lowercased_and_title_defaults_to_name() {
        let living = Living::new("Julie", Gender::Female, "human").unwrap();
        assert_eq!(living.name(), "julie");
        assert_eq!(living.title(), "julie");
        assert_eq!(living.subjective(), "she");
    }

    #[test]
    fn wizard_privilege_is_detected() {
        let mut living = Living::new("merlin", Gender::Male, "human").unwrap();
        assert!(!living.is_wizard());
        living.grant_privilege("wizard");
        assert!(living.is_wizard());
    }
}
