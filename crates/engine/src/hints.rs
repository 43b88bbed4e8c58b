//! Hints and recap: per-player story guidance state.
//!
//! A story defines hints bound to checkpoints (and optionally to a
//! location); as the player reaches checkpoints, the active hint and
//! the recap log follow along.

use serde::{Deserialize, Serialize};

use storyloom_domain::LocationId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    /// The checkpoint this hint belongs to.
    pub checkpoint: String,
    /// Only applicable in this location, when set.
    pub location: Option<LocationId>,
    pub text: String,
}

/// The hint/recap state carried by a player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HintSystem {
    hints: Vec<Hint>,
    active_checkpoint: Option<String>,
    recap_log: Vec<String>,
}

impl HintSystem {
    pub fn init(&mut self, hints: Vec<Hint>) {
        self.hints = hints;
        self.active_checkpoint = None;
        self.recap_log.clear();
    }

    pub fn has_hints(&self) -> bool {
        !self.hints.is_empty()
    }

    /// The player reached a checkpoint; `recap` is added to the recap
    /// log when given.
    pub fn checkpoint(&mut self, name: impl Into<String>, recap: Option<String>) {
        self.active_checkpoint = Some(name.into());
        if let Some(text) = recap {
            self.recap_log.push(text);
        }
    }

    /// The most applicable hint for the player's current situation:
    /// a location-bound hint for the active checkpoint wins over a
    /// general one.
    pub fn hint(&self, location: LocationId) -> Option<&str> {
        let checkpoint = self.active_checkpoint.as_deref()?;
        let applicable = self.hints.iter().filter(|h| h.checkpoint == checkpoint);
        let mut general = None;
        for hint in applicable {
            match hint.location {
                Some(loc) if loc == location => return Some(&hint.text),
                None => general = general.or(Some(hint.text.as_str())),
                _ => {}
            }
        }
        general
    }

    pub fn recap(&self) -> &[String] {
        &self.recap_log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_bound_hints_win_over_general_ones() {
        let here = LocationId::new();
        let elsewhere = LocationId::new();
        let mut hints = HintSystem::default();
        hints.init(vec![
            Hint {
                checkpoint: "start".into(),
                location: None,
                text: "Find the key.".into(),
            },
            Hint {
                checkpoint: "start".into(),
                location: Some(here),
                text: "Look under the rug.".into(),
            },
        ]);
        assert_eq!(hints.hint(here), None, "no checkpoint reached yet");
        hints.checkpoint("start", Some("You woke up.".into()));
        assert_eq!(hints.hint(here), Some("Look under the rug."));
        assert_eq!(hints.hint(elsewhere), Some("Find the key."));
        assert_eq!(hints.recap(), &["You woke up.".to_string()]);
    }
}
