//! The command registry: normal and wizard verbs, their aliases,
//! privilege gating, behavior flags, and the abbreviation map the
//! dispatcher expands before parsing.

pub mod normal;
pub mod wizard;

use std::collections::{BTreeSet, HashMap, HashSet};

use storyloom_domain::soul::ParseResult;
use storyloom_domain::{LivingId, WorldError};

use crate::context::Context;
use crate::dialog::DialogState;
use crate::story::GameMode;

/// Errors and control signals a command can raise. The driver gives
/// each its defined recovery (see the dispatch loop).
#[derive(Debug)]
pub enum CommandError {
    /// Parse errors, refusals, security violations, unknown verbs.
    World(WorldError),
    /// Re-run this parse as a soul emote instead.
    RetrySoul,
    /// Re-dispatch a different command string.
    Retry(String),
    /// Clean session termination (quit).
    SessionExit,
    /// The player completed the story.
    StoryCompleted,
}

impl From<WorldError> for CommandError {
    fn from(err: WorldError) -> Self {
        CommandError::World(err)
    }
}

/// An account store operation requested by a wizard command. The
/// driver performs it (the store is asynchronous) and reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountOp {
    List { having_privilege: Option<String> },
    Ban { name: String },
    Unban { name: String },
    SetPrivileges { name: String, privileges: Vec<String> },
}

/// What a command asks the driver to do after it returns.
pub enum CommandOutcome {
    Ok,
    /// Start an async dialog on the player's connection.
    Dialog(DialogState),
    /// Perform an account store operation.
    Account(AccountOp),
    /// Write a savegame snapshot.
    Save,
    /// Let the given amount of game time pass (ticks run).
    Wait(chrono::Duration),
}

pub type CommandFn =
    fn(&mut Context<'_>, LivingId, &ParseResult) -> Result<CommandOutcome, CommandError>;

pub struct CommandDef {
    pub verb: &'static str,
    pub aliases: &'static [&'static str],
    /// Required privilege; the dispatcher refuses callers without it.
    pub privilege: Option<&'static str>,
    pub func: CommandFn,
    pub help: &'static str,
    /// Whether the location is notified after the command ran.
    pub enable_notify_action: bool,
    pub disabled_in_mode: Option<GameMode>,
    /// Remove the soul verb of the same name.
    pub overrides_soul: bool,
    /// Skip the soul parser; the command receives the raw remainder.
    pub no_soul_parse: bool,
}

/// Abbreviations expanded before parsing.
pub static ABBREVIATIONS: &[(&str, &str)] = &[
    ("n", "north"),
    ("e", "east"),
    ("s", "south"),
    ("w", "west"),
    ("ne", "northeast"),
    ("nw", "northwest"),
    ("se", "southeast"),
    ("sw", "southwest"),
    ("u", "up"),
    ("d", "down"),
    ("?", "help"),
    ("i", "inventory"),
    ("l", "look"),
    ("x", "examine"),
    ("exa", "examine"),
    ("inv", "inventory"),
    ("'", "say"),
];

pub fn abbreviation(word: &str) -> Option<&'static str> {
    ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == word)
        .map(|(_, full)| *full)
}

/// The assembled command table for one game mode.
pub struct CommandRegistry {
    commands: HashMap<String, &'static CommandDef>,
    no_soul_parsing: HashSet<String>,
    overridden_souls: HashSet<String>,
}

impl CommandRegistry {
    /// Build the registry. A verb registered twice within the same
    /// privilege scope is a configuration error.
    pub fn create(mode: GameMode) -> Result<Self, String> {
        let mut registry = Self {
            commands: HashMap::new(),
            no_soul_parsing: HashSet::new(),
            overridden_souls: HashSet::new(),
        };
        for def in normal::COMMANDS {
            registry.add(def.verb.to_string(), def, mode)?;
            for alias in def.aliases {
                registry.add(alias.to_string(), def, mode)?;
            }
        }
        for def in wizard::COMMANDS {
            // wizard commands stand out with a "!" prefix
            registry.add(format!("!{}", def.verb), def, mode)?;
            for alias in def.aliases {
                registry.add(format!("!{}", alias), def, mode)?;
            }
        }
        Ok(registry)
    }

    fn add(
        &mut self,
        verb: String,
        def: &'static CommandDef,
        mode: GameMode,
    ) -> Result<(), String> {
        if def.disabled_in_mode == Some(mode) {
            return Ok(());
        }
        if self.commands.contains_key(&verb) {
            return Err(format!("command defined more than once: {}", verb));
        }
        if def.no_soul_parse {
            self.no_soul_parsing.insert(verb.clone());
        }
        if def.overrides_soul {
            self.overridden_souls.insert(verb.clone());
        }
        self.commands.insert(verb, def);
        Ok(())
    }

    /// Look up a verb for a caller with the given privileges.
    /// Unprivileged callers do not see privileged commands at all.
    pub fn lookup(
        &self,
        verb: &str,
        privileges: &BTreeSet<String>,
    ) -> Option<&'static CommandDef> {
        let def = *self.commands.get(verb)?;
        match def.privilege {
            Some(required) if !privileges.contains(required) => None,
            _ => Some(def),
        }
    }

    /// All verbs (and aliases) available to the given privileges; fed
    /// to the soul parser as external verbs.
    pub fn verbs_for(&self, privileges: &BTreeSet<String>) -> HashSet<String> {
        self.commands
            .iter()
            .filter(|(_, def)| match def.privilege {
                Some(required) => privileges.contains(required),
                None => true,
            })
            .map(|(verb, _)| verb.clone())
            .collect()
    }

    /// verb -> help text, for the help command.
    pub fn help_entries(&self, privileges: &BTreeSet<String>) -> Vec<(String, &'static str)> {
        let mut entries: Vec<(String, &'static str)> = self
            .commands
            .iter()
            .filter(|(_, def)| match def.privilege {
                Some(required) => privileges.contains(required),
                None => true,
            })
            .map(|(verb, def)| (verb.clone(), def.help))
            .collect();
        entries.sort();
        entries
    }

    pub fn is_no_soul_parse(&self, verb: &str) -> bool {
        self.no_soul_parsing.contains(verb)
    }

    /// Is the soul verb of this name shadowed by a command?
    pub fn overrides_soul(&self, verb: &str) -> bool {
        self.overridden_souls.contains(verb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard_privileges() -> BTreeSet<String> {
        ["wizard".to_string()].into()
    }

    #[test]
    fn registry_builds_and_gates_wizard_commands() {
        let registry = CommandRegistry::create(GameMode::Mud).expect("registry");
        assert!(registry.lookup("look", &BTreeSet::new()).is_some());
        assert!(registry.lookup("!teleport", &BTreeSet::new()).is_none());
        assert!(registry.lookup("!teleport", &wizard_privileges()).is_some());
        let verbs = registry.verbs_for(&BTreeSet::new());
        assert!(verbs.contains("look"));
        assert!(!verbs.contains("!teleport"));
        let verbs = registry.verbs_for(&wizard_privileges());
        assert!(verbs.contains("!teleport"));
    }

    #[test]
    fn aliases_resolve_to_the_same_command() {
        let registry = CommandRegistry::create(GameMode::If).expect("registry");
        let a = registry.lookup("inventory", &BTreeSet::new()).expect("verb");
        let b = registry.lookup("inv", &BTreeSet::new()).expect("alias");
        assert_eq!(a.verb, b.verb);
    }

    #[test]
    fn say_skips_the_soul_parser() {
        let registry = CommandRegistry::create(GameMode::If).expect("registry");
        assert!(registry.is_no_soul_parse("say"));
        assert!(!registry.is_no_soul_parse("look"));
    }

    #[test]
    fn mode_disabled_commands_are_absent() {
        let if_registry = CommandRegistry::create(GameMode::If).expect("registry");
        let mud_registry = CommandRegistry::create(GameMode::Mud).expect("registry");
        // saving is a single-player affair
        assert!(if_registry.lookup("save", &BTreeSet::new()).is_some());
        assert!(mud_registry.lookup("save", &BTreeSet::new()).is_none());
    }

    #[test]
    fn abbreviations_expand() {
        assert_eq!(abbreviation("l"), Some("look"));
        assert_eq!(abbreviation("'"), Some("say"));
        assert_eq!(abbreviation("zz"), None);
    }
}
