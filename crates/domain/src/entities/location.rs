use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ids::{ExitId, ItemId, LivingId};

/// A place in the world. Holds the livings and items currently in it
/// and the exits leading out of it.
///
/// Insertion order of livings and items is preserved; it determines
/// the order in which "everyone" targets are addressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    name: String,
    description: String,
    livings: Vec<LivingId>,
    items: Vec<ItemId>,
    exits: BTreeMap<String, ExitId>,
    extra_desc: HashMap<String, String>,
}

impl Location {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            livings: Vec::new(),
            items: Vec::new(),
            exits: BTreeMap::new(),
            extra_desc: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn livings(&self) -> &[LivingId] {
        &self.livings
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    /// direction -> exit, sorted by direction name
    pub fn exits(&self) -> &BTreeMap<String, ExitId> {
        &self.exits
    }

    pub fn exit(&self, direction: &str) -> Option<ExitId> {
        self.exits.get(direction).copied()
    }

    pub fn extra_desc(&self, keyword: &str) -> Option<&str> {
        self.extra_desc.get(keyword).map(String::as_str)
    }

    pub fn with_extra_desc(mut self, keyword: impl Into<String>, text: impl Into<String>) -> Self {
        self.extra_desc.insert(keyword.into(), text.into());
        self
    }

    pub fn contains_living(&self, living: LivingId) -> bool {
        self.livings.contains(&living)
    }

    pub fn contains_item(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    pub(crate) fn add_living(&mut self, living: LivingId) {
        if !self.livings.contains(&living) {
            self.livings.push(living);
        }
    }

    pub(crate) fn remove_living(&mut self, living: LivingId) {
        self.livings.retain(|l| *l != living);
    }

    pub(crate) fn add_item(&mut self, item: ItemId) {
        if !self.items.contains(&item) {
            self.items.push(item);
        }
    }

    pub(crate) fn remove_item(&mut self, item: ItemId) {
        self.items.retain(|i| *i != item);
    }

    pub(crate) fn add_exit(&mut self, direction: impl Into<String>, exit: ExitId) {
        self.exits.insert(direction.into(), exit);
    }
}
