use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, LivingId, LocationId};

/// Where an item currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Containment {
    /// Lying in a location.
    Location(LocationId),
    /// Carried by a living.
    Living(LivingId),
    /// Inside a container item.
    Item(ItemId),
    /// Not placed anywhere (being constructed or destroyed).
    Nowhere,
}

/// An inanimate object. A subset of items are containers and hold an
/// inventory of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    name: String,
    title: String,
    description: String,
    aliases: BTreeSet<String>,
    extra_desc: HashMap<String, String>,
    containment: Containment,
    /// Whether the item can be picked up and moved at all.
    takeable: bool,
    /// Whether this item can contain other items.
    container: bool,
    contents: Vec<ItemId>,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            description: String::new(),
            aliases: BTreeSet::new(),
            extra_desc: HashMap::new(),
            containment: Containment::Nowhere,
            takeable: true,
            container: false,
            contents: Vec::new(),
        }
    }

    // Read accessors

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn aliases(&self) -> &BTreeSet<String> {
        &self.aliases
    }

    pub fn extra_desc(&self, keyword: &str) -> Option<&str> {
        self.extra_desc.get(keyword).map(String::as_str)
    }

    pub fn containment(&self) -> Containment {
        self.containment
    }

    pub fn takeable(&self) -> bool {
        self.takeable
    }

    pub fn is_container(&self) -> bool {
        self.container
    }

    pub fn contents(&self) -> &[ItemId] {
        &self.contents
    }

    // Builder methods

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into());
        self
    }

    pub fn with_extra_desc(mut self, keyword: impl Into<String>, text: impl Into<String>) -> Self {
        self.extra_desc.insert(keyword.into(), text.into());
        self
    }

    /// Make this item a container that can hold other items.
    pub fn as_container(mut self) -> Self {
        self.container = true;
        self
    }

    /// Fixed in place; take/move attempts are refused.
    pub fn fixed(mut self) -> Self {
        self.takeable = false;
        self
    }

    // Mutation (crate-internal; the world keeps both sides in sync)

    pub(crate) fn set_containment(&mut self, containment: Containment) {
        self.containment = containment;
    }

    pub(crate) fn add_content(&mut self, item: ItemId) {
        if !self.contents.contains(&item) {
            self.contents.push(item);
        }
    }

    pub(crate) fn remove_content(&mut self, item: ItemId) {
        self.contents.retain(|i| *i != item);
    }

    pub(crate) fn clear_contents(&mut self) {
        self.contents.clear();
    }
}
