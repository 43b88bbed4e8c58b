use std::collections::HashMap;

use crate::error::WorldError;
use crate::ids::{ExitId, ItemId, LivingId, LocationId};
use crate::lang;

use super::exit::{Exit, ExitTarget};
use super::item::{Containment, Item};
use super::living::Living;
use super::location::Location;

/// The world graph. Owns every location, living, item and exit, keyed
/// by typed ids, plus the Limbo sentinel location that catches
/// homeless livings.
///
/// All mutation goes through the world so that both sides of a
/// containment relation stay in sync.
#[derive(Debug)]
pub struct World {
    locations: HashMap<LocationId, Location>,
    livings: HashMap<LivingId, Living>,
    items: HashMap<ItemId, Item>,
    exits: HashMap<ExitId, Exit>,
    limbo: LocationId,
    unbound_exits: Vec<ExitId>,
}

impl World {
    pub fn new() -> Self {
        let mut locations = HashMap::new();
        let limbo = LocationId::new();
        locations.insert(
            limbo,
            Location::new(
                "Limbo",
                "The intermediate or transitional place or state. There's only nothingness. \
                 Livings end up here if they're not inside a proper location yet.",
            ),
        );
        Self {
            locations,
            livings: HashMap::new(),
            items: HashMap::new(),
            exits: HashMap::new(),
            limbo,
            unbound_exits: Vec::new(),
        }
    }

    /// The sentinel location for homeless livings.
    pub fn limbo(&self) -> LocationId {
        self.limbo
    }

    // Accessors

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(&id)
    }

    pub fn location_mut(&mut self, id: LocationId) -> Option<&mut Location> {
        self.locations.get_mut(&id)
    }

    pub fn living(&self, id: LivingId) -> Option<&Living> {
        self.livings.get(&id)
    }

    pub fn living_mut(&mut self, id: LivingId) -> Option<&mut Living> {
        self.livings.get_mut(&id)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn exit(&self, id: ExitId) -> Option<&Exit> {
        self.exits.get(&id)
    }

    pub fn exit_mut(&mut self, id: ExitId) -> Option<&mut Exit> {
        self.exits.get_mut(&id)
    }

    pub fn all_locations(&self) -> impl Iterator<Item = (LocationId, &Location)> {
        self.locations.iter().map(|(id, loc)| (*id, loc))
    }

    pub fn all_livings(&self) -> impl Iterator<Item = (LivingId, &Living)> {
        self.livings.iter().map(|(id, living)| (*id, living))
    }

    pub fn find_location(&self, name: &str) -> Option<LocationId> {
        self.locations
            .iter()
            .find(|(_, loc)| loc.name().eq_ignore_ascii_case(name))
            .map(|(id, _)| *id)
    }

    pub fn find_living(&self, name: &str) -> Option<LivingId> {
        let name = name.to_lowercase();
        self.livings
            .iter()
            .find(|(_, living)| living.name() == name)
            .map(|(id, _)| *id)
    }

    // Construction

    pub fn add_location(&mut self, location: Location) -> LocationId {
        let id = LocationId::new();
        self.locations.insert(id, location);
        id
    }

    pub fn add_living(&mut self, living: Living, location: LocationId) -> Result<LivingId, WorldError> {
        if !self.locations.contains_key(&location) {
            return Err(WorldError::refused("That place doesn't exist."));
        }
        let id = LivingId::new();
        let mut living = living;
        living.set_location(location);
        self.livings.insert(id, living);
        if let Some(loc) = self.locations.get_mut(&location) {
            loc.add_living(id);
        }
        Ok(id)
    }

    pub fn add_item(&mut self, item: Item, containment: Containment) -> Result<ItemId, WorldError> {
        let id = ItemId::new();
        let mut item = item;
        // a freshly added item cannot have placement or contents yet
        // (clones would otherwise alias the original's contents)
        item.set_containment(Containment::Nowhere);
        item.clear_contents();
        self.items.insert(id, item);
        self.attach_item(id, containment)?;
        Ok(id)
    }

    pub fn add_exit(&mut self, from: LocationId, exit: Exit) -> Result<ExitId, WorldError> {
        if !self.locations.contains_key(&from) {
            return Err(WorldError::refused("That place doesn't exist."));
        }
        let id = ExitId::new();
        let direction = exit.direction().to_string();
        let bound = exit.is_bound();
        self.exits.insert(id, exit);
        if let Some(loc) = self.locations.get_mut(&from) {
            loc.add_exit(direction, id);
        }
        if !bound {
            self.unbound_exits.push(id);
        }
        Ok(id)
    }

    /// Resolve every textual exit target to a location id. Called once
    /// after world load; a dangling target name is an error.
    pub fn bind_exits(&mut self) -> Result<(), WorldError> {
        let pending = std::mem::take(&mut self.unbound_exits);
        for exit_id in pending {
            let target_name = match self.exits.get(&exit_id).map(|e| e.target().clone()) {
                Some(ExitTarget::Unbound(name)) => name,
                _ => continue,
            };
            let location = self.find_location(&target_name).ok_or_else(|| {
                WorldError::refused(format!("exit leads to unknown location: {}", target_name))
            })?;
            if let Some(exit) = self.exits.get_mut(&exit_id) {
                exit.bind(location);
            }
        }
        Ok(())
    }

    // Movement

    /// Move a living to another location. Atomic; returns the origin
    /// location for the caller's narration.
    pub fn move_living(
        &mut self,
        living_id: LivingId,
        target: LocationId,
    ) -> Result<LocationId, WorldError> {
        if !self.locations.contains_key(&target) {
            return Err(WorldError::refused("That place doesn't exist."));
        }
        let origin = self
            .livings
            .get(&living_id)
            .map(|l| l.location())
            .ok_or_else(|| WorldError::refused("They are no longer here."))?;
        if let Some(loc) = self.locations.get_mut(&origin) {
            loc.remove_living(living_id);
        }
        if let Some(loc) = self.locations.get_mut(&target) {
            loc.add_living(living_id);
        }
        if let Some(living) = self.livings.get_mut(&living_id) {
            living.set_location(target);
        }
        Ok(origin)
    }

    /// Move an item to a new containment. The move is transactional:
    /// when insertion at the destination is refused the item stays
    /// where it was.
    pub fn move_item(
        &mut self,
        item_id: ItemId,
        to: Containment,
        actor: LivingId,
        wiz_force: bool,
    ) -> Result<(), WorldError> {
        let item = self
            .items
            .get(&item_id)
            .ok_or_else(|| WorldError::refused("It's no longer there."))?;
        let actor_is_wizard = self
            .livings
            .get(&actor)
            .map(|l| l.is_wizard())
            .unwrap_or(false);
        if !item.takeable() && !(wiz_force && actor_is_wizard) {
            return Err(WorldError::refused(format!(
                "You can't move {}.",
                item.title()
            )));
        }
        // Validate the destination before detaching, so a refusal
        // leaves the item at its origin.
        match to {
            Containment::Location(target) => {
                if !self.locations.contains_key(&target) {
                    return Err(WorldError::refused("That place doesn't exist."));
                }
            }
            Containment::Living(target) => {
                let Some(receiver) = self.livings.get(&target) else {
                    return Err(WorldError::refused("They are no longer here."));
                };
                // another player must consent, which isn't a thing; NPCs
                // simply accept what they're handed
                if target != actor && receiver.is_player() && !actor_is_wizard {
                    return Err(WorldError::refused("You can't do that."));
                }
            }
            Containment::Item(container) => {
                if container == item_id {
                    return Err(WorldError::refused("You can't put it inside itself."));
                }
                match self.items.get(&container) {
                    None => return Err(WorldError::refused("It's no longer there.")),
                    Some(c) if !c.is_container() => {
                        return Err(WorldError::refused("You can't put things in there."))
                    }
                    Some(_) => {}
                }
            }
            Containment::Nowhere => {}
        }
        self.detach_item(item_id);
        self.attach_item(item_id, to)
    }

    fn detach_item(&mut self, item_id: ItemId) {
        let containment = match self.items.get(&item_id) {
            Some(item) => item.containment(),
            None => return,
        };
        match containment {
            Containment::Location(loc) => {
                if let Some(location) = self.locations.get_mut(&loc) {
                    location.remove_item(item_id);
                }
            }
            Containment::Living(living) => {
                if let Some(living) = self.livings.get_mut(&living) {
                    living.remove_inventory(item_id);
                }
            }
            Containment::Item(container) => {
                if let Some(container) = self.items.get_mut(&container) {
                    container.remove_content(item_id);
                }
            }
            Containment::Nowhere => {}
        }
        if let Some(item) = self.items.get_mut(&item_id) {
            item.set_containment(Containment::Nowhere);
        }
    }

    fn attach_item(&mut self, item_id: ItemId, to: Containment) -> Result<(), WorldError> {
        match to {
            Containment::Location(loc) => {
                let location = self
                    .locations
                    .get_mut(&loc)
                    .ok_or_else(|| WorldError::refused("That place doesn't exist."))?;
                location.add_item(item_id);
            }
            Containment::Living(living_id) => {
                let living = self
                    .livings
                    .get_mut(&living_id)
                    .ok_or_else(|| WorldError::refused("They are no longer here."))?;
                living.add_inventory(item_id);
            }
            Containment::Item(container_id) => {
                let container = self
                    .items
                    .get_mut(&container_id)
                    .ok_or_else(|| WorldError::refused("It's no longer there."))?;
                if !container.is_container() {
                    return Err(WorldError::refused("You can't put things in there."));
                }
                container.add_content(item_id);
            }
            Containment::Nowhere => {}
        }
        if let Some(item) = self.items.get_mut(&item_id) {
            item.set_containment(to);
        }
        Ok(())
    }

    // Destruction

    /// Destroy an item, transitively destroying any contents.
    pub fn destroy_item(&mut self, item_id: ItemId) {
        self.detach_item(item_id);
        if let Some(item) = self.items.remove(&item_id) {
            for content in item.contents().to_vec() {
                self.destroy_item(content);
            }
        }
    }

    /// Destroy a living; its inventory is destroyed with it.
    pub fn destroy_living(&mut self, living_id: LivingId) {
        if let Some(living) = self.livings.remove(&living_id) {
            if let Some(location) = self.locations.get_mut(&living.location()) {
                location.remove_living(living_id);
            }
            for item in living.inventory().to_vec() {
                self.destroy_item(item);
            }
        }
    }

    /// Destroy a location. Its items are destroyed; its livings are
    /// sent to Limbo and returned so the caller can notify them.
    pub fn destroy_location(&mut self, location_id: LocationId) -> Vec<LivingId> {
        if location_id == self.limbo {
            return Vec::new();
        }
        let Some(location) = self.locations.get(&location_id) else {
            return Vec::new();
        };
        let livings = location.livings().to_vec();
        let items = location.items().to_vec();
        let exits: Vec<ExitId> = location.exits().values().copied().collect();
        for item in items {
            self.destroy_item(item);
        }
        let limbo = self.limbo;
        for living in &livings {
            let _ = self.move_living(*living, limbo);
        }
        for exit in exits {
            self.exits.remove(&exit);
        }
        self.locations.remove(&location_id);
        livings
    }

    // Searching

    /// Search for a living in a location by name. Priority: exact
    /// name, then alias, then lowercased title.
    pub fn search_living(&self, location_id: LocationId, name: &str) -> Option<LivingId> {
        let name = name.to_lowercase();
        let location = self.locations.get(&location_id)?;
        let residents: Vec<(LivingId, &Living)> = location
            .livings()
            .iter()
            .filter_map(|id| self.livings.get(id).map(|living| (*id, living)))
            .collect();
        residents
            .iter()
            .find(|(_, living)| living.name() == name)
            .or_else(|| {
                residents.iter().find(|(_, living)| {
                    living.aliases().contains(&name) || living.title().to_lowercase() == name
                })
            })
            .map(|(id, _)| *id)
    }

    fn search_item_in<'a, I>(&self, ids: I, name: &str) -> Option<ItemId>
    where
        I: Iterator<Item = &'a ItemId> + Clone,
    {
        let matches_exact = |id: &&ItemId| {
            self.items
                .get(id)
                .map(|item| item.name() == name)
                .unwrap_or(false)
        };
        let matches_loose = |id: &&ItemId| {
            self.items
                .get(id)
                .map(|item| {
                    item.aliases().contains(name) || item.title().to_lowercase() == name
                })
                .unwrap_or(false)
        };
        ids.clone()
            .find(matches_exact)
            .or_else(|| ids.clone().find(matches_loose))
            .copied()
    }

    /// Search an item in the world visible to the living, returning
    /// the item and where it was found. Resolution order: own
    /// inventory, the location, then containers carried in the
    /// inventory (only when requested).
    pub fn locate_item(
        &self,
        living_id: LivingId,
        name: &str,
        include_inventory: bool,
        include_location: bool,
        include_containers: bool,
    ) -> Option<(ItemId, Containment)> {
        let name = name.to_lowercase();
        let living = self.livings.get(&living_id)?;
        if include_inventory {
            if let Some(found) = self.search_item_in(living.inventory().iter(), &name) {
                return Some((found, Containment::Living(living_id)));
            }
        }
        if include_location {
            if let Some(location) = self.locations.get(&living.location()) {
                if let Some(found) = self.search_item_in(location.items().iter(), &name) {
                    return Some((found, Containment::Location(living.location())));
                }
            }
        }
        if include_containers {
            for container_id in living.inventory() {
                let Some(container) = self.items.get(container_id) else {
                    continue;
                };
                if !container.is_container() {
                    continue;
                }
                if let Some(found) = self.search_item_in(container.contents().iter(), &name) {
                    return Some((found, Containment::Item(*container_id)));
                }
            }
        }
        None
    }

    /// Search the extra descriptions visible to a living: the
    /// location itself, items and livings in it, then the inventory.
    pub fn search_extradesc(&self, living_id: LivingId, keyword: &str) -> Option<String> {
        let keyword = keyword.to_lowercase();
        let living = self.livings.get(&living_id)?;
        let location = self.locations.get(&living.location())?;
        if let Some(desc) = location.extra_desc(&keyword) {
            return Some(desc.to_string());
        }
        for item_id in location.items() {
            if let Some(desc) = self.items.get(item_id).and_then(|i| i.extra_desc(&keyword)) {
                return Some(desc.to_string());
            }
        }
        for item_id in living.inventory() {
            if let Some(desc) = self.items.get(item_id).and_then(|i| i.extra_desc(&keyword)) {
                return Some(desc.to_string());
            }
        }
        None
    }

    // Rendering

    /// Describe the surroundings of a location as a list of
    /// paragraphs, excluding one living (the onlooker) from the list
    /// of present livings.
    pub fn look(
        &self,
        location_id: LocationId,
        exclude: Option<LivingId>,
        short: bool,
        show_exits: bool,
    ) -> Vec<String> {
        let Some(location) = self.locations.get(&location_id) else {
            return vec!["You see nothing.".to_string()];
        };
        let mut paragraphs = vec![format!("[{}]", location.name())];
        if !short && !location.description().is_empty() {
            paragraphs.push(location.description().to_string());
        }
        if show_exits && !location.exits().is_empty() {
            if short {
                let directions: Vec<&str> = location.exits().keys().map(String::as_str).collect();
                paragraphs.push(format!("Exits: {}", directions.join(", ")));
            } else {
                let mut seen = Vec::new();
                for exit_id in location.exits().values() {
                    if seen.contains(exit_id) {
                        continue;
                    }
                    seen.push(*exit_id);
                    if let Some(exit) = self.exits.get(exit_id) {
                        paragraphs.push(exit.short_description().to_string());
                    }
                }
            }
        }
        if !location.items().is_empty() {
            if short {
                let mut names: Vec<&str> = location
                    .items()
                    .iter()
                    .filter_map(|id| self.items.get(id).map(|i| i.name()))
                    .collect();
                names.sort_unstable();
                paragraphs.push(format!("You see: {}", names.join(", ")));
            } else {
                let mut titles: Vec<String> = location
                    .items()
                    .iter()
                    .filter_map(|id| self.items.get(id).map(|i| lang::a(i.title())))
                    .collect();
                titles.sort_unstable();
                paragraphs.push(format!("You see {}.", lang::join_and(titles)));
            }
        }
        let present: Vec<&Living> = location
            .livings()
            .iter()
            .filter(|id| Some(**id) != exclude)
            .filter_map(|id| self.livings.get(id))
            .collect();
        if !present.is_empty() {
            if short {
                let mut names: Vec<&str> = present.iter().map(|l| l.name()).collect();
                names.sort_unstable();
                paragraphs.push(format!("Present: {}", names.join(", ")));
            } else {
                let mut titles: Vec<&str> = present.iter().map(|l| l.title()).collect();
                titles.sort_unstable();
                let suffix = if titles.len() > 1 { " are here." } else { " is here." };
                paragraphs.push(lang::capital(&format!(
                    "{}{}",
                    lang::join_and(titles),
                    suffix
                )));
            }
        }
        paragraphs
    }

    // Integrity

    /// Check the structural invariants of the graph. Used by tests.
    pub fn validate_invariants(&self) -> Result<(), String> {
        for (id, living) in &self.livings {
            let location = self
                .locations
                .get(&living.location())
                .ok_or_else(|| format!("living {} is in a nonexistent location", living.name()))?;
            if !location.contains_living(*id) {
                return Err(format!(
                    "living {} not listed in its location {}",
                    living.name(),
                    location.name()
                ));
            }
        }
        for (id, location) in &self.locations {
            for living_id in location.livings() {
                let living = self
                    .livings
                    .get(living_id)
                    .ok_or_else(|| format!("location {} lists a dead living", location.name()))?;
                if living.location() != *id {
                    return Err(format!(
                        "living {} listed in {} but located elsewhere",
                        living.name(),
                        location.name()
                    ));
                }
            }
        }
        for (id, item) in &self.items {
            let mut placements = 0;
            if let Containment::Location(loc) = item.containment() {
                let location = self
                    .locations
                    .get(&loc)
                    .ok_or_else(|| format!("item {} is in a nonexistent location", item.name()))?;
                if !location.contains_item(*id) {
                    return Err(format!("item {} not listed in its location", item.name()));
                }
                placements += 1;
            }
            if let Containment::Living(living_id) = item.containment() {
                let living = self
                    .livings
                    .get(&living_id)
                    .ok_or_else(|| format!("item {} carried by nobody", item.name()))?;
                if !living.inventory().contains(id) {
                    return Err(format!("item {} not in its carrier's inventory", item.name()));
                }
                placements += 1;
            }
            if let Containment::Item(container_id) = item.containment() {
                let container = self
                    .items
                    .get(&container_id)
                    .ok_or_else(|| format!("item {} inside a nonexistent container", item.name()))?;
                if !container.contents().contains(id) {
                    return Err(format!("item {} not in its container", item.name()));
                }
                placements += 1;
            }
            if placements > 1 {
                return Err(format!("item {} is in more than one place", item.name()));
            }
        }
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Gender;

    fn world_with_room() -> (World, LocationId) {
        let mut world = World::new();
        let room = world.add_location(Location::new("somewhere", "A test room."));
        (world, room)
    }

    #[test]
    fn livings_are_in_exactly_one_location() {
        let (mut world, room) = world_with_room();
        let julie = world
            .add_living(Living::new("julie", Gender::Female, "human").unwrap(), room)
            .unwrap();
        world.validate_invariants().unwrap();
        let other = world.add_location(Location::new("elsewhere", ""));
        let origin = world.move_living(julie, other).unwrap();
        assert_eq!(origin, room);
        assert!(!world.location(room).unwrap().contains_living(julie));
        assert!(world.location(other).unwrap().contains_living(julie));
        world.validate_invariants().unwrap();
    }

    #[test]
    fn item_moves_are_transactional() {
        let (mut world, room) = world_with_room();
        let julie = world
            .add_living(Living::new("julie", Gender::Female, "human").unwrap(), room)
            .unwrap();
        let paper = world
            .add_item(Item::new("newspaper"), Containment::Location(room))
            .unwrap();
        let rock = world
            .add_item(Item::new("rock"), Containment::Location(room))
            .unwrap();
        // a plain item is not a container; insertion is refused and the
        // newspaper stays in the room
        let err = world
            .move_item(paper, Containment::Item(rock), julie, false)
            .unwrap_err();
        assert_eq!(err, WorldError::refused("You can't put things in there."));
        assert_eq!(
            world.item(paper).unwrap().containment(),
            Containment::Location(room)
        );
        assert!(world.location(room).unwrap().contains_item(paper));
        world.validate_invariants().unwrap();
    }

    #[test]
    fn taking_and_bagging_items() {
        let (mut world, room) = world_with_room();
        let julie = world
            .add_living(Living::new("julie", Gender::Female, "human").unwrap(), room)
            .unwrap();
        let bag = world
            .add_item(Item::new("bag").as_container(), Containment::Living(julie))
            .unwrap();
        let paper = world
            .add_item(Item::new("newspaper"), Containment::Location(room))
            .unwrap();
        world
            .move_item(paper, Containment::Living(julie), julie, false)
            .unwrap();
        world
            .move_item(paper, Containment::Item(bag), julie, false)
            .unwrap();
        assert_eq!(world.item(paper).unwrap().containment(), Containment::Item(bag));
        assert!(world.item(bag).unwrap().contents().contains(&paper));
        assert!(!world.location(room).unwrap().contains_item(paper));
        world.validate_invariants().unwrap();
    }

    #[test]
    fn non_takeable_items_refuse_to_move() {
        let (mut world, room) = world_with_room();
        let julie = world
            .add_living(Living::new("julie", Gender::Female, "human").unwrap(), room)
            .unwrap();
        let statue = world
            .add_item(Item::new("statue").fixed(), Containment::Location(room))
            .unwrap();
        assert!(world
            .move_item(statue, Containment::Living(julie), julie, false)
            .is_err());
    }

    #[test]
    fn giving_to_players_needs_wizardry_but_npcs_accept() {
        let (mut world, room) = world_with_room();
        let julie = world
            .add_living(
                Living::new("julie", Gender::Female, "human").unwrap().as_player(),
                room,
            )
            .unwrap();
        let max = world
            .add_living(
                Living::new("max", Gender::Male, "human").unwrap().as_player(),
                room,
            )
            .unwrap();
        let npc = world
            .add_living(Living::new("cat", Gender::Neuter, "cat").unwrap(), room)
            .unwrap();
        let paper = world
            .add_item(Item::new("newspaper"), Containment::Location(room))
            .unwrap();
        let err = world
            .move_item(paper, Containment::Living(max), julie, false)
            .unwrap_err();
        assert_eq!(err, WorldError::refused("You can't do that."));
        world
            .move_item(paper, Containment::Living(npc), julie, false)
            .unwrap();
        let coin = world
            .add_item(Item::new("coin"), Containment::Location(room))
            .unwrap();
        world.living_mut(julie).unwrap().grant_privilege("wizard");
        world
            .move_item(coin, Containment::Living(max), julie, false)
            .unwrap();
    }

    #[test]
    fn destroying_a_location_sends_livings_to_limbo() {
        let (mut world, room) = world_with_room();
        let julie = world
            .add_living(Living::new("julie", Gender::Female, "human").unwrap(), room)
            .unwrap();
        let paper = world
            .add_item(Item::new("newspaper"), Containment::Location(room))
            .unwrap();
        let evicted = world.destroy_location(room);
        assert_eq!(evicted, vec![julie]);
        assert_eq!(world.living(julie).unwrap().location(), world.limbo());
        assert!(world.item(paper).is_none());
        world.validate_invariants().unwrap();
    }

    #[test]
    fn destroying_a_living_cascades_to_inventory() {
        let (mut world, room) = world_with_room();
        let julie = world
            .add_living(Living::new("julie", Gender::Female, "human").unwrap(), room)
            .unwrap();
        let bag = world
            .add_item(Item::new("bag").as_container(), Containment::Living(julie))
            .unwrap();
        let coin = world
            .add_item(Item::new("coin"), Containment::Item(bag))
            .unwrap();
        world.destroy_living(julie);
        assert!(world.living(julie).is_none());
        assert!(world.item(bag).is_none());
        assert!(world.item(coin).is_none());
        world.validate_invariants().unwrap();
    }

    #[test]
    fn search_living_prefers_exact_name_over_title() {
        let (mut world, room) = world_with_room();
        let cat = world
            .add_living(
                Living::new("cat", Gender::Neuter, "cat")
                    .unwrap()
                    .with_title("the hairy cat")
                    .with_alias("feline"),
                room,
            )
            .unwrap();
        assert_eq!(world.search_living(room, "cat"), Some(cat));
        assert_eq!(world.search_living(room, "feline"), Some(cat));
        assert_eq!(world.search_living(room, "the hairy cat"), Some(cat));
        assert_eq!(world.search_living(room, "dog"), None);
    }

    #[test]
    fn locate_item_searches_inventory_then_location_then_containers() {
        let (mut world, room) = world_with_room();
        let julie = world
            .add_living(Living::new("julie", Gender::Female, "human").unwrap(), room)
            .unwrap();
        let bag = world
            .add_item(Item::new("bag").as_container(), Containment::Living(julie))
            .unwrap();
        let gem = world
            .add_item(Item::new("gem"), Containment::Item(bag))
            .unwrap();
        // not found without container search
        assert_eq!(world.locate_item(julie, "gem", true, true, false), None);
        assert_eq!(
            world.locate_item(julie, "gem", true, true, true),
            Some((gem, Containment::Item(bag)))
        );
    }

    #[test]
    fn look_describes_the_surroundings() {
        let (mut world, room) = world_with_room();
        let julie = world
            .add_living(Living::new("julie", Gender::Female, "human").unwrap(), room)
            .unwrap();
        world
            .add_living(
                Living::new("max", Gender::Male, "human").unwrap(),
                room,
            )
            .unwrap();
        world
            .add_item(Item::new("newspaper"), Containment::Location(room))
            .unwrap();
        let paragraphs = world.look(room, Some(julie), false, true);
        assert_eq!(paragraphs[0], "[somewhere]");
        assert!(paragraphs.contains(&"You see a newspaper.".to_string()));
        assert!(paragraphs.contains(&"Max is here.".to_string()));
    }
}
